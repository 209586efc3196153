//! ドメイン層
//!
//! ルーム・メンバー・セッションのモデルと、Infrastructure 層が実装する trait。

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{Admission, Departure, Member, Room};
pub use error::{MessagePushError, RoomError, ValueObjectError};
pub use event::ServerEvent;
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use repository::SilentNotifier;
pub use repository::{JoinOutcome, MembershipNotifier, RoomRepository};
pub use session::{Action, DropReason, InboundKind, PeerSession, SessionState, decide};
pub use value_object::{
    Capacity, GameMode, Nickname, Password, Payload, PeerId, PeerIdFactory, Role, RoomId, Seat,
    Timestamp,
};
