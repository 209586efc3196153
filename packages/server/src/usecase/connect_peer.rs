//! UseCase: ピア接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - ピア ID の発行（新規 / 再接続時の指定）と登録、挨拶メッセージの送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続、以前のピア ID での再接続
//! - 異常系：接続中のピア ID での接続試行

use std::sync::Arc;

use tandem_shared::time::Clock;

use crate::domain::{
    MessagePushError, MessagePusher, PeerId, PeerIdFactory, PusherChannel, ServerEvent, Timestamp,
};

use super::error::ConnectError;

/// ピア接続のユースケース
pub struct ConnectPeerUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// ピア接続を実行
    ///
    /// # Arguments
    ///
    /// * `requested` - 再接続時に指定されたピア ID（なければ新規発行）
    /// * `sender` - ピアへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(PeerId)` - 登録されたピア ID（`welcome` 送信済み）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        requested: Option<PeerId>,
        sender: PusherChannel,
    ) -> Result<PeerId, ConnectError> {
        let peer_id = requested.unwrap_or_else(PeerIdFactory::generate);
        let now = Timestamp::new(self.clock.now_millis());

        self.message_pusher
            .register_client(peer_id.clone(), sender, now)
            .await
            .map_err(|e| match e {
                MessagePushError::AlreadyConnected(id) => ConnectError::DuplicatePeerId(id),
                other => ConnectError::GreetingFailed(other.to_string()),
            })?;

        let welcome = ServerEvent::Welcome {
            peer_id: peer_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&peer_id, &welcome).await {
            self.message_pusher.unregister_client(&peer_id).await;
            return Err(ConnectError::GreetingFailed(e.to_string()));
        }

        tracing::info!("Peer '{}' connected", peer_id);
        Ok(peer_id)
    }
}
