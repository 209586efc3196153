//! Server state shared by every connection task.

use std::sync::Arc;

use tandem_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{
        ConnectPeerUseCase, CreateRoomUseCase, DisconnectPeerUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RelayInputUseCase, RelayStateUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectPeerUseCase（ピア接続のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// DisconnectPeerUseCase（ピア切断のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// RelayInputUseCase（入力中継のユースケース）
    pub relay_input_usecase: Arc<RelayInputUseCase>,
    /// RelayStateUseCase（状態配信のユースケース）
    pub relay_state_usecase: Arc<RelayStateUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire every use case on top of one repository and one pusher.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_peer_usecase: Arc::new(ConnectPeerUseCase::new(
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_peer_usecase: Arc::new(DisconnectPeerUseCase::new(
                leave_room_usecase.clone(),
                message_pusher.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            leave_room_usecase,
            relay_input_usecase: Arc::new(RelayInputUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            relay_state_usecase: Arc::new(RelayStateUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(
                repository,
                message_pusher.clone(),
            )),
            message_pusher,
            clock,
        }
    }
}
