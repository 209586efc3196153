//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース。Repository と MessagePusher の trait にのみ依存する。

pub mod broadcast_membership;
pub mod connect_peer;
pub mod create_room;
pub mod disconnect_peer;
pub mod error;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod relay_input;
pub mod relay_state;
pub mod sweep_rooms;

pub use broadcast_membership::MembershipBroadcaster;
pub use connect_peer::ConnectPeerUseCase;
pub use create_room::{CreateRoomCommand, CreateRoomUseCase, CreatedRoom};
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::{ConnectError, GetRoomDetailError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase, RoomDetail};
pub use join_room::{JoinRoomCommand, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use relay_input::{RelayDrop, RelayInputUseCase, RelayOutcome};
pub use relay_state::RelayStateUseCase;
pub use sweep_rooms::{DEFAULT_ROOM_IDLE_TIMEOUT, SweepRoomsUseCase};
