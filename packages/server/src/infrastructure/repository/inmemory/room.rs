//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの構成
//!
//! - 外側: ルーム ID → スロットのマップ（`Mutex<HashMap<..>>`）。検索・挿入・削除の間だけ保持する
//! - 内側: ルームごとの `Mutex<RoomSlot>`。ルームの変更と、その変更の通知はすべてこのロックの中で行う
//!
//! 取得順は「ルーム → マップ」のみ許可。マップを保持したままルームのロックを
//! 待つことはせず、必要な場合は `try_lock` を使う。これにより無関係なルーム同士が
//! 直列化されず、デッドロックも起きない。
//!
//! 空になったルームは、そのルームのロックを保持したまま `closed` を立ててマップから外す。
//! そのため `closed` なスロットは、ロック待ちをしていた操作からしか観測されない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Capacity, Departure, GameMode, JoinOutcome, MembershipNotifier, Nickname, Password, PeerId,
    Role, Room, RoomError, RoomId, RoomRepository, Timestamp,
};

/// ルーム 1 つ分の格納領域
struct RoomSlot {
    room: Room,
    /// 空になりマップから外された。以後の操作はルームが存在しないものとして扱う
    closed: bool,
}

type SharedSlot = Arc<Mutex<RoomSlot>>;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, SharedSlot>>,
    capacity: Capacity,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(capacity: Capacity) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// 指定したルームを格納済みの状態で作成
    #[cfg(test)]
    pub fn with_rooms(capacity: Capacity, rooms: Vec<Room>) -> Self {
        let rooms = rooms
            .into_iter()
            .map(|room| {
                let slot = RoomSlot {
                    room,
                    closed: false,
                };
                (slot.room.id.clone(), Arc::new(Mutex::new(slot)))
            })
            .collect();
        Self {
            rooms: Mutex::new(rooms),
            capacity,
        }
    }

    async fn slot(&self, room_id: &RoomId) -> Option<SharedSlot> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    /// スロットがまだマップ上の同じ実体であれば削除する
    async fn remove_slot(&self, room_id: &RoomId, slot: &SharedSlot) {
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            rooms.remove(room_id);
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        room_id: RoomId,
        password: Password,
        mode: GameMode,
        creator: PeerId,
        nickname: Option<Nickname>,
        now: Timestamp,
        notifier: &dyn MembershipNotifier,
    ) -> Result<Room, RoomError> {
        let room = Room::create(
            room_id.clone(),
            password,
            mode,
            self.capacity,
            creator,
            nickname,
            now,
        );
        let shared = Arc::new(Mutex::new(RoomSlot {
            room: room.clone(),
            closed: false,
        }));
        // 公開前に自分でロックしておき、通知が終わるまで他の操作を待たせる
        let guard = shared.clone().lock_owned().await;

        loop {
            let mut rooms = self.rooms.lock().await;
            let in_flight = match rooms.get(&room_id) {
                None => None,
                Some(existing) => match existing.try_lock() {
                    Ok(_) => return Err(RoomError::RoomExists),
                    Err(_) => Some(existing.clone()),
                },
            };

            match in_flight {
                None => {
                    rooms.insert(room_id.clone(), shared.clone());
                    break;
                }
                Some(existing) => {
                    // 進行中の操作（最後の退出かもしれない）が終わるのを待って再確認する
                    drop(rooms);
                    drop(existing.lock().await);
                }
            }
        }

        notifier.room_created(&guard.room).await;
        Ok(room)
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        password: &str,
        peer_id: PeerId,
        nickname: Option<Nickname>,
        requested_role: Option<Role>,
        now: Timestamp,
        notifier: &dyn MembershipNotifier,
    ) -> Result<JoinOutcome, RoomError> {
        let slot = self.slot(room_id).await.ok_or(RoomError::RoomNotFound)?;
        let mut slot = slot.lock().await;
        if slot.closed {
            return Err(RoomError::RoomNotFound);
        }

        let admission = slot
            .room
            .admit(peer_id, password, nickname, requested_role, now)?;
        let outcome = JoinOutcome {
            room: slot.room.clone(),
            admission,
        };

        notifier.member_admitted(&outcome).await;
        Ok(outcome)
    }

    async fn leave(
        &self,
        room_id: &RoomId,
        peer_id: &PeerId,
        notifier: &dyn MembershipNotifier,
    ) -> Option<Departure> {
        let shared = self.slot(room_id).await?;
        let mut slot = shared.lock().await;
        if slot.closed {
            return None;
        }

        let departure = slot.room.remove_member(peer_id)?;
        notifier.member_departed(&departure).await;

        if slot.room.is_empty() {
            slot.closed = true;
            // ルームのロックを保持したままマップから外す（ルーム → マップの順）
            self.remove_slot(room_id, &shared).await;
            tracing::info!("Room '{}' is empty and has been removed", room_id);
        }

        Some(departure)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let slot = self.slot(room_id).await?;
        let slot = slot.lock().await;
        (!slot.closed).then(|| slot.room.clone())
    }

    async fn sweep(&self, now: Timestamp, idle_timeout_millis: i64) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().await;
        let mut removed = Vec::new();

        rooms.retain(|room_id, slot| {
            // 使用中のルームは今回は対象外
            let Ok(mut slot) = slot.try_lock() else {
                return true;
            };
            let idle = slot.room.is_empty()
                && slot.room.created_at.millis_until(now) > idle_timeout_millis;
            if idle {
                slot.closed = true;
                removed.push(room_id.clone());
                false
            } else {
                true
            }
        });

        removed.sort();
        removed
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let slots: Vec<SharedSlot> = self.rooms.lock().await.values().cloned().collect();

        let mut rooms = Vec::with_capacity(slots.len());
        for slot in slots {
            let slot = slot.lock().await;
            if !slot.closed {
                rooms.push(slot.room.clone());
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
