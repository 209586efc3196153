//! Message Router
//!
//! 1 フレーム分の受信メッセージをデコードし、セッションの状態に応じてユースケースへ振り分ける。
//! ルーム操作のエラーを `error{message}` に変換するのはここだけ。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - dispatch() 関数
//! - セッションの状態遷移（Unbound → InRoom → Unbound）と返信・中継の宛先
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成・参加・入力中継・状態配信・退出・ping
//! - 異常系：パスワード不一致、壊れたフレーム、未所属ピアの input
//! - エッジケース：別ルームへの参加（先に退出）、roomId 不一致の中継

use crate::{
    domain::{
        Action, Nickname, PeerId, PeerSession, Role, RoomId, ServerEvent, Timestamp, decide,
    },
    infrastructure::dto::websocket::{
        ClientMessage, CreateRequest, InputRequest, JoinRequest, PingRequest, StateRequest,
        decode_client_message,
    },
    usecase::{CreateRoomCommand, JoinRoomCommand, RelayOutcome},
};

use super::state::AppState;

/// Handle one inbound text frame from `session`'s peer.
pub async fn dispatch(state: &AppState, session: &mut PeerSession, text: &str) {
    let message = match decode_client_message(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropped frame from '{}': {}", session.peer_id(), e);
            return;
        }
    };

    let now = Timestamp::new(state.clock.now_millis());
    state.message_pusher.touch(session.peer_id(), now).await;

    match (decide(session.state(), message.kind()), message) {
        (Action::CreateRoom, ClientMessage::Create(request)) => {
            create(state, session, request).await
        }
        (Action::JoinRoom, ClientMessage::Join(request)) => join(state, session, request).await,
        (Action::LeaveRoom, ClientMessage::Leave) => leave(state, session).await,
        (Action::RelayInput, ClientMessage::Input(request)) => {
            relay_input(state, session, request).await
        }
        (Action::RelayState, ClientMessage::State(request)) => {
            relay_state(state, session, request).await
        }
        (Action::Pong, ClientMessage::Ping(request)) => pong(state, session, request).await,
        (Action::Drop(reason), message) => {
            tracing::debug!(
                "Dropped {:?} from '{}': {:?}",
                message.kind(),
                session.peer_id(),
                reason
            );
        }
        (action, message) => {
            tracing::warn!(
                "No route for {:?} with action {:?} from '{}'",
                message.kind(),
                action,
                session.peer_id()
            );
        }
    }
}

async fn create(state: &AppState, session: &mut PeerSession, request: CreateRequest) {
    session.set_nickname(request.nickname.as_deref().and_then(Nickname::parse));
    leave_current_room(state, session).await;

    let command = CreateRoomCommand {
        room_id: request.room_id.unwrap_or_default(),
        password: request.password.unwrap_or_default(),
        mode: request.mode,
        nickname: session.nickname().cloned(),
    };
    match state
        .create_room_usecase
        .execute(session.peer_id(), command)
        .await
    {
        Ok(created) => session.bind(created.room_id, created.member.seat),
        Err(e) => {
            tracing::info!("Create rejected for '{}': {:?}", session.peer_id(), e);
            reply(state, session.peer_id(), ServerEvent::Error { message: e.to_string() }).await;
        }
    }
}

async fn join(state: &AppState, session: &mut PeerSession, request: JoinRequest) {
    session.set_nickname(request.nickname.as_deref().and_then(Nickname::parse));

    let raw_room_id = request.room_id.unwrap_or_default();
    let rejoining = RoomId::new(&raw_room_id)
        .is_ok_and(|room_id| session.room_id() == Some(&room_id));
    if !rejoining {
        leave_current_room(state, session).await;
    }

    let command = JoinRoomCommand {
        room_id: raw_room_id,
        password: request.password.unwrap_or_default(),
        nickname: session.nickname().cloned(),
        requested_role: request.role.as_deref().and_then(Role::from_wire),
    };
    match state
        .join_room_usecase
        .execute(session.peer_id(), command)
        .await
    {
        Ok(outcome) => session.bind(outcome.room.id, outcome.admission.member.seat),
        Err(e) => {
            tracing::info!("Join rejected for '{}': {:?}", session.peer_id(), e);
            reply(state, session.peer_id(), ServerEvent::Error { message: e.to_string() }).await;
        }
    }
}

async fn leave(state: &AppState, session: &mut PeerSession) {
    let room_id = leave_current_room(state, session).await;
    reply(state, session.peer_id(), ServerEvent::Left { room_id }).await;
}

async fn relay_input(state: &AppState, session: &PeerSession, request: InputRequest) {
    let Some(room_id) = bound_target(session, request.room_id.as_deref()) else {
        return;
    };
    let outcome = state
        .relay_input_usecase
        .execute(session.peer_id(), room_id, request.seq, request.input)
        .await;
    if let RelayOutcome::Dropped(reason) = outcome {
        tracing::debug!("Input from '{}' dropped: {:?}", session.peer_id(), reason);
    }
}

async fn relay_state(state: &AppState, session: &PeerSession, request: StateRequest) {
    let Some(room_id) = bound_target(session, request.room_id.as_deref()) else {
        return;
    };
    let outcome = state
        .relay_state_usecase
        .execute(session.peer_id(), room_id, request.tick, request.snapshot)
        .await;
    if let RelayOutcome::Dropped(reason) = outcome {
        tracing::debug!("State from '{}' dropped: {:?}", session.peer_id(), reason);
    }
}

async fn pong(state: &AppState, session: &PeerSession, request: PingRequest) {
    reply(state, session.peer_id(), ServerEvent::Pong { t: request.t }).await;
}

/// Run the leave path for the peer's current room, if any.
async fn leave_current_room(state: &AppState, session: &mut PeerSession) -> Option<RoomId> {
    let room_id = session.unbind()?;
    state
        .leave_room_usecase
        .execute(session.peer_id(), &room_id)
        .await;
    Some(room_id)
}

/// The room a relay message should go to: the bound room, unless the frame names another one.
fn bound_target<'a>(session: &'a PeerSession, requested: Option<&str>) -> Option<&'a RoomId> {
    let room_id = session.room_id()?;
    match requested {
        Some(requested) if requested.trim() != room_id.as_str() => {
            tracing::debug!(
                "Relay from '{}' names room '{}' but peer is in '{}'",
                session.peer_id(),
                requested,
                room_id
            );
            None
        }
        _ => Some(room_id),
    }
}

async fn reply(state: &AppState, peer_id: &PeerId, event: ServerEvent) {
    if let Err(e) = state.message_pusher.push_to(peer_id, &event).await {
        tracing::warn!("Failed to send '{}' to '{}': {}", event.kind(), peer_id, e);
    }
}
