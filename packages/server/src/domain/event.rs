//! サーバーからピアへ送るイベント
//!
//! UseCase 層はこの型でメッセージを組み立て、`MessagePusher` がワイヤ形式に変換する。

use super::value_object::{GameMode, Nickname, Payload, PeerId, Role, RoomId, Seat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 接続直後の挨拶
    Welcome { peer_id: PeerId },
    Created {
        room_id: RoomId,
        peer_id: PeerId,
        seat: Seat,
        role: Role,
        mode: GameMode,
    },
    Joined {
        room_id: RoomId,
        peer_id: PeerId,
        seat: Seat,
        role: Role,
        host_id: Option<PeerId>,
        mode: GameMode,
    },
    PlayerJoined {
        room_id: RoomId,
        peer_id: PeerId,
        seat: Seat,
        nickname: Option<Nickname>,
    },
    PlayerLeft {
        room_id: RoomId,
        peer_id: PeerId,
        seat: Seat,
    },
    HostPromoted { room_id: RoomId, peer_id: PeerId },
    Left { room_id: Option<RoomId> },
    Input {
        room_id: RoomId,
        peer_id: PeerId,
        seat: Seat,
        seq: Option<Payload>,
        input: Option<Payload>,
    },
    State {
        room_id: RoomId,
        tick: Option<Payload>,
        snapshot: Option<Payload>,
    },
    Pong { t: Option<Payload> },
    Error { message: String },
}

impl ServerEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::Created { .. } => "created",
            Self::Joined { .. } => "joined",
            Self::PlayerJoined { .. } => "playerJoined",
            Self::PlayerLeft { .. } => "playerLeft",
            Self::HostPromoted { .. } => "hostPromoted",
            Self::Left { .. } => "left",
            Self::Input { .. } => "input",
            Self::State { .. } => "state",
            Self::Pong { .. } => "pong",
            Self::Error { .. } => "error",
        }
    }
}
