//! MessagePusher trait 定義
//!
//! ピアへのメッセージ送信（通知）のインターフェース。
//! 接続中のピアの登録・最終アクティビティの記録もここで扱う（Connection Registry）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, PeerId, ServerEvent, Timestamp};

/// ピアへの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// ピアを登録。同じ ID が接続中なら `AlreadyConnected`
    async fn register_client(
        &self,
        peer_id: PeerId,
        sender: PusherChannel,
        now: Timestamp,
    ) -> Result<(), MessagePushError>;

    /// ピアの登録を解除（送信チャンネルも閉じる）
    async fn unregister_client(&self, peer_id: &PeerId);

    /// 最終アクティビティ時刻を更新
    async fn touch(&self, peer_id: &PeerId, now: Timestamp);

    /// 最終アクティビティ時刻を取得
    async fn last_active_at(&self, peer_id: &PeerId) -> Option<Timestamp>;

    /// 特定のピアに送信
    async fn push_to(&self, peer_id: &PeerId, event: &ServerEvent)
    -> Result<(), MessagePushError>;

    /// 複数のピアに送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<PeerId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
