//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - ルーム ID の正規化、重複チェック、作成者への `created` 送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成者が座席 1 のホストになる
//! - 異常系：空のルーム ID、既存のルーム ID

use std::sync::Arc;

use tandem_shared::time::Clock;

use crate::domain::{
    GameMode, Member, MessagePusher, Nickname, Password, PeerId, RoomError, RoomId,
    RoomRepository, Timestamp,
};
use crate::usecase::MembershipBroadcaster;

/// ルーム作成の入力
#[derive(Debug, Clone, Default)]
pub struct CreateRoomCommand {
    pub room_id: String,
    pub password: String,
    pub mode: Option<String>,
    pub nickname: Option<Nickname>,
}

/// ルーム作成の結果
#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub room_id: RoomId,
    pub member: Member,
    pub mode: GameMode,
}

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: MembershipBroadcaster,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            broadcaster: MembershipBroadcaster::new(message_pusher),
            clock,
        }
    }

    /// ルーム作成を実行し、作成者に `created` を送信する
    ///
    /// `created` はルームのロック内で送信キューに積まれる。エラーの通知は呼び出し側（Router）の責務。
    pub async fn execute(
        &self,
        peer_id: &PeerId,
        command: CreateRoomCommand,
    ) -> Result<CreatedRoom, RoomError> {
        let room_id = RoomId::new(&command.room_id)?;
        let mode = GameMode::from_wire(command.mode.as_deref());
        let now = Timestamp::new(self.clock.now_millis());

        let room = self
            .repository
            .create_room(
                room_id.clone(),
                Password::new(command.password),
                mode,
                peer_id.clone(),
                command.nickname,
                now,
                &self.broadcaster,
            )
            .await?;
        let member = room
            .member(peer_id)
            .cloned()
            .ok_or(RoomError::RoomNotFound)?;

        tracing::info!(
            "Room '{}' created by '{}' (mode: {})",
            room_id,
            peer_id,
            mode.as_str()
        );

        Ok(CreatedRoom {
            room_id,
            member,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capacity, MockMessagePusher, Role, ServerEvent};
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use tandem_shared::time::FixedClock;

    fn peer(id: &str) -> PeerId {
        PeerId::new(id.to_string()).unwrap()
    }

    fn command(room_id: &str) -> CreateRoomCommand {
        CreateRoomCommand {
            room_id: room_id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_room_replies_created_to_creator() {
        // テスト項目: 作成者にのみ created（座席 1、host）が送られる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Capacity::DUEL));
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .withf(|to, event| {
                to.as_str() == "alice"
                    && matches!(
                        event,
                        ServerEvent::Created { room_id, seat, role: Role::Host, mode: GameMode::Coop, .. }
                            if room_id.as_str() == "r1" && seat.value() == 1
                    )
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = CreateRoomUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let result = usecase
            .execute(
                &peer("alice"),
                CreateRoomCommand {
                    room_id: "  r1 ".to_string(),
                    mode: Some("coop".to_string()),
                    ..Default::default()
                },
            )
            .await;

        // then (期待する結果):
        let created = result.unwrap();
        assert_eq!(created.room_id.as_str(), "r1");
        assert_eq!(created.member.role, Role::Host);
        assert!(repository.get_room(&created.room_id).await.is_some());
    }

    #[tokio::test]
    async fn test_create_room_errors_send_nothing() {
        // テスト項目: 空のルーム ID・重複 ID はエラーを返し、何も送信しない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(Capacity::DUEL));
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = CreateRoomUseCase::new(
            repository,
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );
        usecase.execute(&peer("alice"), command("r1")).await.unwrap();

        // when (操作):
        let empty = usecase.execute(&peer("bob"), command("   ")).await;
        let duplicate = usecase.execute(&peer("bob"), command("r1")).await;

        // then (期待する結果):
        assert!(matches!(empty, Err(RoomError::EmptyRoomId)));
        assert!(matches!(duplicate, Err(RoomError::RoomExists)));
    }
}
