//! UseCase: 入力の中継（ゲスト → ホスト）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayInputUseCase::execute() メソッド
//! - 入力が現在のホストにのみ届き、送信者や他のゲストには届かないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ゲストからホストへの中継
//! - 異常系（黙って破棄）：ルームが存在しない、メンバーでない、送信者がホスト自身

use std::sync::Arc;

use crate::domain::{MessagePusher, Payload, PeerId, RoomId, RoomRepository, ServerEvent};

/// 中継を行わなかった理由
///
/// 高頻度のゲームプレイメッセージは送信者にエラーを返さず、ログにのみ残す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDrop {
    RoomNotFound,
    NotMember,
    NoHost,
    SenderIsHost,
    NotHost,
    DeliveryFailed,
}

/// 中継の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered(Vec<PeerId>),
    Dropped(RelayDrop),
}

/// 入力中継のユースケース
pub struct RelayInputUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayInputUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 入力をルームの現在のホストへ中継する
    ///
    /// ホストは毎回 Room Store から解決する（移譲直後でも古いホストに送らない）。
    pub async fn execute(
        &self,
        peer_id: &PeerId,
        room_id: &RoomId,
        seq: Option<Payload>,
        input: Option<Payload>,
    ) -> RelayOutcome {
        let Some(room) = self.repository.get_room(room_id).await else {
            return RelayOutcome::Dropped(RelayDrop::RoomNotFound);
        };
        let Some(sender) = room.member(peer_id) else {
            return RelayOutcome::Dropped(RelayDrop::NotMember);
        };
        let Some(host) = room.current_host() else {
            return RelayOutcome::Dropped(RelayDrop::NoHost);
        };
        if &host.peer_id == peer_id {
            return RelayOutcome::Dropped(RelayDrop::SenderIsHost);
        }

        let event = ServerEvent::Input {
            room_id: room_id.clone(),
            peer_id: peer_id.clone(),
            seat: sender.seat,
            seq,
            input,
        };
        match self.message_pusher.push_to(&host.peer_id, &event).await {
            Ok(()) => RelayOutcome::Delivered(vec![host.peer_id.clone()]),
            Err(e) => {
                tracing::debug!("Failed to relay input to host '{}': {}", host.peer_id, e);
                RelayOutcome::Dropped(RelayDrop::DeliveryFailed)
            }
        }
    }
}
