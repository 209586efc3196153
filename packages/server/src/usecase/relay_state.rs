//! UseCase: 状態スナップショットの中継（ホスト → 他の全メンバー）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayStateUseCase::execute() メソッド
//! - 現在のホストからのみ受け付け、ホスト以外の全メンバーに届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストからのブロードキャスト
//! - 異常系（黙って破棄）：ゲストからの送信（移譲の競合を含む）

use std::sync::Arc;

use crate::domain::{MessagePusher, Payload, PeerId, RoomId, RoomRepository, ServerEvent};

use super::relay_input::{RelayDrop, RelayOutcome};

/// 状態中継のユースケース
pub struct RelayStateUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayStateUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 状態をホスト以外の全メンバーへブロードキャストする
    ///
    /// 送信者が現在のホストでなければ破棄する。
    pub async fn execute(
        &self,
        peer_id: &PeerId,
        room_id: &RoomId,
        tick: Option<Payload>,
        snapshot: Option<Payload>,
    ) -> RelayOutcome {
        let Some(room) = self.repository.get_room(room_id).await else {
            return RelayOutcome::Dropped(RelayDrop::RoomNotFound);
        };
        if room.member(peer_id).is_none() {
            return RelayOutcome::Dropped(RelayDrop::NotMember);
        }
        if room.current_host().map(|host| &host.peer_id) != Some(peer_id) {
            return RelayOutcome::Dropped(RelayDrop::NotHost);
        }

        let targets = room.other_member_ids(peer_id);
        if targets.is_empty() {
            return RelayOutcome::Delivered(targets);
        }

        let event = ServerEvent::State {
            room_id: room_id.clone(),
            tick,
            snapshot,
        };
        match self.message_pusher.broadcast(targets.clone(), &event).await {
            Ok(()) => RelayOutcome::Delivered(targets),
            Err(e) => {
                tracing::debug!("Failed to relay state in room '{}': {}", room_id, e);
                RelayOutcome::Dropped(RelayDrop::DeliveryFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SilentNotifier;
    use crate::domain::{Capacity, GameMode, MockMessagePusher, Password, Timestamp};
    use crate::infrastructure::repository::InMemoryRoomRepository;

    fn peer(id: &str) -> PeerId {
        PeerId::new(id.to_string()).unwrap()
    }

    fn room_id() -> RoomId {
        RoomId::new("r1").unwrap()
    }

    async fn create_repository() -> Arc<InMemoryRoomRepository> {
        let repository = Arc::new(InMemoryRoomRepository::new(Capacity::new(3).unwrap()));
        repository
            .create_room(
                room_id(),
                Password::default(),
                GameMode::Pvp,
                peer("alice"),
                None,
                Timestamp::new(0),
                &SilentNotifier,
            )
            .await
            .unwrap();
        for name in ["bob", "carol"] {
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
        repository
    }

    #[tokio::test]
    async fn test_state_broadcast_to_everyone_but_host() {
        // テスト項目: ホストの状態はホスト以外の全メンバーに届き、ホスト自身には返らない
        // given (前提条件):
        let repository = create_repository().await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, event| {
                targets == &vec![peer("bob"), peer("carol")]
                    && matches!(
                        event,
                        ServerEvent::State { tick: Some(tick), snapshot: Some(snapshot), .. }
                            if tick.get() == "10" && snapshot.get() == r#"{"ball":[3,4]}"#
                    )
            })
            .times(1)
            .returning(|_, _| Ok(()));
        pusher.expect_push_to().never();
        let usecase = RelayStateUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        let outcome = usecase
            .execute(
                &peer("alice"),
                &room_id(),
                Some(Payload::from_json("10").unwrap()),
                Some(Payload::from_json(r#"{"ball":[3,4]}"#).unwrap()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            RelayOutcome::Delivered(vec![peer("bob"), peer("carol")])
        );
    }

    #[tokio::test]
    async fn test_state_from_guest_is_dropped() {
        // テスト項目: ゲストからの状態は破棄され、誰にも送られない
        // given (前提条件):
        let repository = create_repository().await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        pusher.expect_push_to().never();
        let usecase = RelayStateUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        let outcome = usecase.execute(&peer("bob"), &room_id(), None, None).await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(RelayDrop::NotHost));
    }

    #[tokio::test]
    async fn test_promoted_guest_can_send_state() {
        // テスト項目: ホスト移譲後は新しいホストの状態が受け付けられ、旧ホストの状態は破棄される
        // given (前提条件):
        let repository = create_repository().await;
        repository
            .leave(&room_id(), &peer("alice"), &SilentNotifier)
            .await
            .unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, _| targets == &vec![peer("carol")])
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = RelayStateUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        let from_new_host = usecase.execute(&peer("bob"), &room_id(), None, None).await;
        let from_old_host = usecase.execute(&peer("alice"), &room_id(), None, None).await;

        // then (期待する結果):
        assert_eq!(from_new_host, RelayOutcome::Delivered(vec![peer("carol")]));
        assert_eq!(from_old_host, RelayOutcome::Dropped(RelayDrop::NotMember));
    }
}
