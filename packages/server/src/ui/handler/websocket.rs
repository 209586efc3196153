//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{PeerId, PeerSession},
    ui::{router, state::AppState},
    usecase::ConnectError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    /// Peer id to resume after a reconnect
    pub peer_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let requested = match query.peer_id {
        Some(raw) => match PeerId::try_from(raw.clone()) {
            Ok(peer_id) => Some(peer_id),
            Err(e) => {
                tracing::warn!("Invalid peerId '{}': {}", raw, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => None,
    };

    // Outbound frames for this peer are queued here and drained by `pusher_loop`
    let (tx, rx) = mpsc::unbounded_channel();

    match state.connect_peer_usecase.execute(requested, tx).await {
        Ok(peer_id) => {
            tracing::info!("Peer '{}' connected", peer_id);
            let pusher = state.message_pusher.clone();
            let failed_peer_id = peer_id.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!("WebSocket upgrade for '{}' failed: {}", failed_peer_id, e);
                    tokio::spawn(async move {
                        pusher.unregister_client(&failed_peer_id).await;
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, peer_id, rx)))
        }
        Err(ConnectError::DuplicatePeerId(peer_id)) => {
            tracing::warn!(
                "Peer '{}' is already connected. Rejecting connection.",
                peer_id
            );
            Err(StatusCode::CONFLICT)
        }
        Err(ConnectError::GreetingFailed(e)) => {
            tracing::error!("Failed to greet new peer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this peer
/// * `sender` - WebSocket sink to send messages to this peer
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    peer_id: PeerId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut session = PeerSession::new(peer_id);

    // Frames are dispatched one at a time, in arrival order. Only the wait for the
    // next frame races the writer, so a dispatch is never cut off halfway.
    loop {
        let frame = tokio::select! {
            frame = receiver.next() => frame,
            _ = &mut send_task => {
                tracing::debug!("Writer for '{}' finished", session.peer_id());
                break;
            }
        };

        let msg = match frame {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error from '{}': {}", session.peer_id(), e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::trace!("Received from '{}': {}", session.peer_id(), text.as_str());
                router::dispatch(&state, &mut session, text.as_str()).await;
            }
            Message::Binary(_) => {
                tracing::debug!("Ignored binary frame from '{}'", session.peer_id());
            }
            Message::Close(_) => {
                tracing::info!("Peer '{}' requested close", session.peer_id());
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            _ => {}
        }
    }
    send_task.abort();

    state
        .disconnect_peer_usecase
        .execute(session.peer_id(), session.room_id())
        .await;
}
