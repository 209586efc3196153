//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者への `joined` と既存メンバー分の `playerJoined` の送信
//! - 既存メンバーへの `playerJoined` のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人目の参加
//! - 正常系：既存メンバーの再参加（ブロードキャストしない）
//! - 異常系：存在しない・パスワード不一致・満室

use std::sync::Arc;

use tandem_shared::time::Clock;

use crate::domain::{
    JoinOutcome, MessagePusher, Nickname, PeerId, Role, RoomError, RoomId, RoomRepository,
    Timestamp,
};
use crate::usecase::MembershipBroadcaster;

/// ルーム参加の入力
#[derive(Debug, Clone, Default)]
pub struct JoinRoomCommand {
    pub room_id: String,
    pub password: String,
    pub nickname: Option<Nickname>,
    pub requested_role: Option<Role>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: MembershipBroadcaster,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// 成功時の通知（`joined` と `playerJoined`）はルームのロック内で送信キューに積まれるため、
    /// 直後の退出やホスト移譲の通知より先に届く。送信順は [`MembershipBroadcaster`] を参照。
    pub async fn execute(
        &self,
        peer_id: &PeerId,
        command: JoinRoomCommand,
    ) -> Result<JoinOutcome, RoomError> {
        let room_id = RoomId::new(&command.room_id).map_err(|_| RoomError::RoomNotFound)?;
        let now = Timestamp::new(self.clock.now_millis());

        let outcome = self
            .repository
            .join_room(
                &room_id,
                &command.password,
                peer_id.clone(),
                command.nickname,
                command.requested_role,
                now,
                &self.broadcaster,
            )
            .await?;
        let member = &outcome.admission.member;

        if outcome.admission.rejoined {
            tracing::info!("Peer '{}' rejoined room '{}'", peer_id, room_id);
        } else {
            tracing::info!(
                "Peer '{}' joined room '{}' (seat {})",
                peer_id,
                room_id,
                member.seat.value()
            );
        }

        Ok(outcome)
    }
}
