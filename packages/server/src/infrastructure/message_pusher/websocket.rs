//! WebSocket を使った MessagePusher 実装（Connection Registry）
//!
//! ## 責務
//!
//! - 接続中のピアと `UnboundedSender` の対応を管理
//! - ピアごとの接続時刻・最終アクティビティ時刻の記録
//! - ドメインイベントをワイヤ形式にエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの投入のみで、ネットワーク I/O を待つことはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, PeerId, PusherChannel, ServerEvent, Timestamp},
    infrastructure::dto::conversion::encode_event,
};

/// 接続中のピアの情報
pub struct PeerEntry {
    /// 送信チャンネル
    pub sender: PusherChannel,
    /// 接続時刻
    pub connected_at: Timestamp,
    /// 最後にフレームを受信した時刻
    pub last_active_at: Timestamp,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&peer_id, &ServerEvent::Pong { t: None }).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// Key: peer_id
    clients: Arc<Mutex<HashMap<PeerId, PeerEntry>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<PeerId, PeerEntry>>>) -> Self {
        Self { clients }
    }

    /// 接続中のピア数
    pub async fn count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
    encode_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        peer_id: PeerId,
        sender: PusherChannel,
        now: Timestamp,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(&peer_id) {
            return Err(MessagePushError::AlreadyConnected(peer_id.into_string()));
        }
        tracing::debug!("Peer '{}' registered to MessagePusher", peer_id);
        clients.insert(
            peer_id,
            PeerEntry {
                sender,
                connected_at: now,
                last_active_at: now,
            },
        );
        Ok(())
    }

    async fn unregister_client(&self, peer_id: &PeerId) {
        let mut clients = self.clients.lock().await;
        if let Some(entry) = clients.remove(peer_id) {
            tracing::debug!(
                "Peer '{}' unregistered from MessagePusher (connected for {} ms)",
                peer_id,
                entry.connected_at.millis_until(entry.last_active_at)
            );
        }
    }

    async fn touch(&self, peer_id: &PeerId, now: Timestamp) {
        let mut clients = self.clients.lock().await;
        if let Some(entry) = clients.get_mut(peer_id) {
            entry.last_active_at = now;
        }
    }

    async fn last_active_at(&self, peer_id: &PeerId) -> Option<Timestamp> {
        let clients = self.clients.lock().await;
        clients.get(peer_id).map(|entry| entry.last_active_at)
    }

    async fn push_to(
        &self,
        peer_id: &PeerId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let entry = clients
            .get(peer_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(peer_id.to_string()))?;
        entry
            .sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to peer '{}'", event.kind(), peer_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<PeerId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            let Some(entry) = clients.get(&target) else {
                tracing::warn!("Peer '{}' not found during broadcast, skipping", target);
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = entry.sender.send(content.clone()) {
                tracing::warn!("Failed to push '{}' to peer '{}': {}", event.kind(), target, e);
            } else {
                tracing::debug!("Broadcasted '{}' to peer '{}'", event.kind(), target);
            }
        }

        Ok(())
    }
}
