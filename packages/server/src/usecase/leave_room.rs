//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 残りメンバーへの `playerLeft` と、ホスト移譲時の `hostPromoted` の送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：ゲストの退出、ホストの退出（移譲あり）
//! - エッジケース：最後のメンバーの退出（ルーム削除、通知対象なし）
//! - エッジケース：メンバーでないピアの退出（何もしない）

use std::sync::Arc;

use crate::domain::{Departure, MessagePusher, PeerId, RoomId, RoomRepository};
use crate::usecase::MembershipBroadcaster;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: MembershipBroadcaster,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            broadcaster: MembershipBroadcaster::new(message_pusher),
        }
    }

    /// ルーム退出を実行
    ///
    /// 残りのメンバー全員に `playerLeft` を送り、ホストが変わった場合は続けて
    /// `hostPromoted` を送る。退出者本人への `left` は呼び出し側の責務。
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 退出した
    /// * `None` - ルームが存在しない、またはメンバーでない
    pub async fn execute(&self, peer_id: &PeerId, room_id: &RoomId) -> Option<Departure> {
        let departure = self
            .repository
            .leave(room_id, peer_id, &self.broadcaster)
            .await?;
        tracing::info!(
            "Peer '{}' left room '{}' ({} remaining)",
            peer_id,
            room_id,
            departure.remaining.len()
        );

        Some(departure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SilentNotifier;
    use crate::domain::{Capacity, GameMode, Password, Role, Timestamp};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    };
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn peer(id: &str) -> PeerId {
        PeerId::new(id.to_string()).unwrap()
    }

    fn room_id() -> RoomId {
        RoomId::new("r1").unwrap()
    }

    async fn setup(
        members: &[&str],
    ) -> (
        LeaveRoomUseCase,
        Arc<InMemoryRoomRepository>,
        Vec<mpsc::UnboundedReceiver<String>>,
    ) {
        let repository = Arc::new(InMemoryRoomRepository::new(Capacity::new(3).unwrap()));
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let mut receivers = Vec::new();
        for (i, name) in members.iter().enumerate() {
            let (tx, rx) = mpsc::unbounded_channel();
            pusher
                .register_client(peer(name), tx, Timestamp::new(0))
                .await
                .unwrap();
            receivers.push(rx);
            if i == 0 {
                repository
                    .create_room(
                        room_id(),
                        Password::default(),
                        GameMode::Pvp,
                        peer(name),
                        None,
                        Timestamp::new(0),
                        &SilentNotifier,
                    )
                    .await
                    .unwrap();
            } else {
                repository
                    .join_room(
                        &room_id(),
                        "",
                        peer(name),
                        None,
                        None,
                        Timestamp::new(0),
                        &SilentNotifier,
                    )
                    .await
                    .unwrap();
            }
        }
        let usecase = LeaveRoomUseCase::new(repository.clone(), pusher);
        (usecase, repository, receivers)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn test_host_leave_sends_player_left_then_host_promoted() {
        // テスト項目: ホスト退出時、残りのメンバーに playerLeft → hostPromoted の順で届く
        // given (前提条件):
        let (usecase, repository, mut receivers) = setup(&["alice", "bob", "carol"]).await;

        // when (操作):
        let departure = usecase.execute(&peer("alice"), &room_id()).await.unwrap();

        // then (期待する結果):
        assert_eq!(departure.promoted, Some(peer("bob")));
        for rx in receivers.iter_mut().skip(1) {
            let frames = drain(rx);
            assert_eq!(frames.len(), 2);
            assert_eq!(frames[0]["type"], "playerLeft");
            assert_eq!(frames[0]["peerId"], "alice");
            assert_eq!(frames[0]["seat"], 1);
            assert_eq!(frames[1]["type"], "hostPromoted");
            assert_eq!(frames[1]["peerId"], "bob");
        }
        assert!(drain(&mut receivers[0]).is_empty());
        let room = repository.get_room(&room_id()).await.unwrap();
        let host = room.current_host().unwrap();
        assert_eq!(host.peer_id, peer("bob"));
        assert_eq!(host.role, Role::Host);
    }

    #[tokio::test]
    async fn test_guest_leave_sends_only_player_left() {
        // テスト項目: ゲスト退出時は playerLeft のみ届く
        // given (前提条件):
        let (usecase, _repository, mut receivers) = setup(&["alice", "bob"]).await;

        // when (操作):
        let departure = usecase.execute(&peer("bob"), &room_id()).await.unwrap();

        // then (期待する結果):
        assert_eq!(departure.promoted, None);
        let frames = drain(&mut receivers[0]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "playerLeft");
    }

    #[tokio::test]
    async fn test_last_member_leave_removes_room() {
        // テスト項目: 最後のメンバーが退出するとルームが削除される
        // given (前提条件):
        let (usecase, repository, _receivers) = setup(&["alice"]).await;

        // when (操作):
        let departure = usecase.execute(&peer("alice"), &room_id()).await.unwrap();

        // then (期待する結果):
        assert!(departure.room_emptied());
        assert!(repository.get_room(&room_id()).await.is_none());
    }

    #[tokio::test]
    async fn test_leave_by_non_member_is_noop() {
        // テスト項目: メンバーでないピアの退出は何もしない
        // given (前提条件):
        let (usecase, repository, mut receivers) = setup(&["alice"]).await;

        // when (操作):
        let result = usecase.execute(&peer("mallory"), &room_id()).await;

        // then (期待する結果):
        assert!(result.is_none());
        assert!(drain(&mut receivers[0]).is_empty());
        assert_eq!(repository.get_room(&room_id()).await.unwrap().len(), 1);
    }
}
