//! エンティティ: Room と Member
//!
//! Room は Room Store が所有し、ピアはルーム ID 経由でのみ参照する。
//! ここにあるメソッドはすべて同期的な純粋ロジックで、排他制御は Repository 側の責務。

use super::{
    error::RoomError,
    value_object::{Capacity, GameMode, Nickname, Password, PeerId, Role, RoomId, Seat, Timestamp},
};

/// ルームのメンバー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub peer_id: PeerId,
    pub seat: Seat,
    pub role: Role,
    pub nickname: Option<Nickname>,
    pub joined_at: Timestamp,
}

/// `Room::admit` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// 参加した（または再参加した）メンバー
    pub member: Member,
    /// 既存メンバーによる再参加かどうか
    pub rejoined: bool,
}

/// `Room::remove_member` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    /// 退出したメンバー
    pub member: Member,
    /// 残りのメンバー（座席順）
    pub remaining: Vec<PeerId>,
    /// ホストが移譲された場合、新しいホスト
    pub promoted: Option<PeerId>,
}

impl Departure {
    /// True when nobody is left and the room must be deleted.
    pub fn room_emptied(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// ルーム
///
/// 不変条件:
/// - メンバー数は `capacity` を超えない
/// - 空でない限り、ちょうど 1 人が `Role::Host` であり、`host_id` はそのメンバーを指す
/// - 座席番号はルーム内で一意
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub mode: GameMode,
    pub capacity: Capacity,
    pub created_at: Timestamp,
    password: Password,
    host_id: Option<PeerId>,
    /// 座席番号の昇順で保持する
    members: Vec<Member>,
}

impl Room {
    /// 作成者を唯一のメンバー（ホスト、座席 1）としてルームを作成
    pub fn create(
        id: RoomId,
        password: Password,
        mode: GameMode,
        capacity: Capacity,
        creator: PeerId,
        nickname: Option<Nickname>,
        created_at: Timestamp,
    ) -> Self {
        let host = Member {
            peer_id: creator.clone(),
            seat: Seat::FIRST,
            role: Role::Host,
            nickname,
            joined_at: created_at,
        };
        Self {
            id,
            mode,
            capacity,
            created_at,
            password,
            host_id: Some(creator),
            members: vec![host],
        }
    }

    /// メンバーのいないルームを作成（スイープ対象の検証用）
    #[cfg(test)]
    pub fn empty(
        id: RoomId,
        password: Password,
        mode: GameMode,
        capacity: Capacity,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            mode,
            capacity,
            created_at,
            password,
            host_id: None,
            members: Vec::new(),
        }
    }

    /// 参加を試みる
    ///
    /// チェック順: パスワード → 既存メンバー（再参加） → 容量。
    /// 既存メンバーの再参加は満室でも成功し、座席と役割を維持する。
    /// 新規メンバーは空いている最小の座席を得る。`host` の要求はホストが既に
    /// いるため `guest` に格下げされる。
    pub fn admit(
        &mut self,
        peer_id: PeerId,
        password_attempt: &str,
        nickname: Option<Nickname>,
        requested_role: Option<Role>,
        now: Timestamp,
    ) -> Result<Admission, RoomError> {
        if !self.password.matches(password_attempt) {
            return Err(RoomError::WrongPassword);
        }

        if let Some(existing) = self.members.iter_mut().find(|m| m.peer_id == peer_id) {
            if nickname.is_some() {
                existing.nickname = nickname;
            }
            return Ok(Admission {
                member: existing.clone(),
                rejoined: true,
            });
        }

        let seat = self.next_free_seat().ok_or(RoomError::RoomFull)?;
        // ホスト不在のルームに入った場合のみホストになる
        let role = match (&self.host_id, requested_role) {
            (None, _) => Role::Host,
            (Some(_), Some(Role::Host)) => Role::Guest,
            (Some(_), _) => Role::Guest,
        };
        let member = Member {
            peer_id: peer_id.clone(),
            seat,
            role,
            nickname,
            joined_at: now,
        };
        if role == Role::Host {
            self.host_id = Some(peer_id);
        }
        let index = self.members.partition_point(|m| m.seat < seat);
        self.members.insert(index, member.clone());

        Ok(Admission {
            member,
            rejoined: false,
        })
    }

    /// メンバーを削除し、必要ならホストを移譲する
    ///
    /// メンバーでなければ `None`。ホストが退出した場合は座席番号が最小の
    /// 残りメンバーが新しいホストになる。
    pub fn remove_member(&mut self, peer_id: &PeerId) -> Option<Departure> {
        let index = self.members.iter().position(|m| &m.peer_id == peer_id)?;
        let member = self.members.remove(index);

        let mut promoted = None;
        if self.host_id.as_ref() == Some(peer_id) {
            self.host_id = None;
            // members は座席順なので先頭が最小の座席
            if let Some(next) = self.members.first_mut() {
                next.role = Role::Host;
                self.host_id = Some(next.peer_id.clone());
                promoted = Some(next.peer_id.clone());
            }
        }

        Some(Departure {
            room_id: self.id.clone(),
            member,
            remaining: self.member_ids(),
            promoted,
        })
    }

    /// 現在のホスト
    ///
    /// ホストの解決は必ずここを通す（中継経路ごとにホストを覚えておかない）。
    pub fn current_host(&self) -> Option<&Member> {
        let host_id = self.host_id.as_ref()?;
        self.member(host_id)
    }

    pub fn host_id(&self) -> Option<&PeerId> {
        self.host_id.as_ref()
    }

    pub fn member(&self, peer_id: &PeerId) -> Option<&Member> {
        self.members.iter().find(|m| &m.peer_id == peer_id)
    }

    /// 座席順のメンバー
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_ids(&self) -> Vec<PeerId> {
        self.members.iter().map(|m| m.peer_id.clone()).collect()
    }

    /// `exclude` 以外のメンバー ID（座席順）
    pub fn other_member_ids(&self, exclude: &PeerId) -> Vec<PeerId> {
        self.members
            .iter()
            .filter(|m| &m.peer_id != exclude)
            .map(|m| m.peer_id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_password_protected(&self) -> bool {
        self.password.is_protected()
    }

    fn next_free_seat(&self) -> Option<Seat> {
        self.capacity
            .seats()
            .find(|seat| self.members.iter().all(|m| m.seat != *seat))
    }
}
