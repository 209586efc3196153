//! UseCase: ルーム一覧・詳細の取得

use std::{collections::HashMap, sync::Arc};

use crate::domain::{MessagePusher, PeerId, Room, RoomId, RoomRepository, Timestamp};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

/// ルーム詳細
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: Room,
    /// メンバーごとの最終アクティビティ時刻（接続中のメンバーのみ）
    pub last_active_at: HashMap<PeerId, Timestamp>,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetRoomDetailUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, room_id: String) -> Result<RoomDetail, GetRoomDetailError> {
        let room_id = RoomId::new(&room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        let room = self
            .repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;

        let mut last_active_at = HashMap::new();
        for member in room.members() {
            if let Some(at) = self.message_pusher.last_active_at(&member.peer_id).await {
                last_active_at.insert(member.peer_id.clone(), at);
            }
        }

        Ok(RoomDetail {
            room,
            last_active_at,
        })
    }
}
