//! UseCase: ピア切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//! - 切断時にルームの退出経路を通り、その後ピアの登録が解除されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム所属中のホストの切断（移譲が起きる）
//! - 正常系：ルーム未所属のピアの切断

use std::sync::Arc;

use crate::domain::{Departure, MessagePusher, PeerId, RoomId};

use super::leave_room::LeaveRoomUseCase;

/// ピア切断のユースケース
pub struct DisconnectPeerUseCase {
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectPeerUseCase {
    pub fn new(
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            leave_room_usecase,
            message_pusher,
        }
    }

    /// ピア切断を実行
    ///
    /// ルーム所属中なら退出処理（通知・ホスト移譲・空ルーム削除）を行ってから
    /// ピアの登録を解除する。切断はエラーではない。
    pub async fn execute(&self, peer_id: &PeerId, room_id: Option<&RoomId>) -> Option<Departure> {
        let departure = match room_id {
            Some(room_id) => self.leave_room_usecase.execute(peer_id, room_id).await,
            None => None,
        };

        self.message_pusher.unregister_client(peer_id).await;
        tracing::info!("Peer '{}' disconnected", peer_id);

        departure
    }
}
