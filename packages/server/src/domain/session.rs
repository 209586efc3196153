//! ピアごとのセッション状態機械
//!
//! `Unbound → InRoom` の 2 状態。受信メッセージの種別と現在の状態から、
//! 取るべきアクションを純粋関数 `decide` で決める。
//! ホスト／ゲストの役割はここでは保持せず、中継のたびに Room Store から解決する。

use super::value_object::{Nickname, PeerId, RoomId, Seat};

/// 受信メッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    Create,
    Join,
    Leave,
    Input,
    State,
    Ping,
}

/// セッションの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 接続済みだがルーム未所属
    Unbound,
    /// ルーム所属中
    InRoom { room_id: RoomId, seat: Seat },
}

/// 破棄の理由（ログ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NotInRoom,
}

/// `decide` が返すアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateRoom,
    JoinRoom,
    LeaveRoom,
    RelayInput,
    RelayState,
    Pong,
    Drop(DropReason),
}

/// 状態と受信種別からアクションを決める
pub fn decide(state: &SessionState, kind: InboundKind) -> Action {
    match (state, kind) {
        (_, InboundKind::Create) => Action::CreateRoom,
        (_, InboundKind::Join) => Action::JoinRoom,
        (_, InboundKind::Leave) => Action::LeaveRoom,
        (_, InboundKind::Ping) => Action::Pong,
        (SessionState::Unbound, InboundKind::Input | InboundKind::State) => {
            Action::Drop(DropReason::NotInRoom)
        }
        (SessionState::InRoom { .. }, InboundKind::Input) => Action::RelayInput,
        (SessionState::InRoom { .. }, InboundKind::State) => Action::RelayState,
    }
}

/// 1 接続分のセッション
#[derive(Debug, Clone)]
pub struct PeerSession {
    peer_id: PeerId,
    nickname: Option<Nickname>,
    state: SessionState,
}

impl PeerSession {
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            nickname: None,
            state: SessionState::Unbound,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn set_nickname(&mut self, nickname: Option<Nickname>) {
        if nickname.is_some() {
            self.nickname = nickname;
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::InRoom { room_id, .. } => Some(room_id),
            SessionState::Unbound => None,
        }
    }

    pub fn bind(&mut self, room_id: RoomId, seat: Seat) {
        self.state = SessionState::InRoom { room_id, seat };
    }

    /// Clear the room binding, returning the room the peer was in.
    pub fn unbind(&mut self) -> Option<RoomId> {
        match std::mem::replace(&mut self.state, SessionState::Unbound) {
            SessionState::InRoom { room_id, .. } => Some(room_id),
            SessionState::Unbound => None,
        }
    }
}
