//! メンバーの増減の通知
//!
//! Room Store がルームのロックを保持したまま呼び出す `MembershipNotifier` の実装。
//! 送信は各ピアの送信キューへの投入だけなので、ロック内で行ってもネットワーク I/O は待たない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 参加直後にホストが退出しても、参加者が最後に受け取る情報が Room Store と一致すること
//!
//! ### どのような状況を想定しているか
//! - エッジケース：`join_room` の完了直後（通知の前後）にホストが退出する

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Departure, JoinOutcome, MembershipNotifier, MessagePusher, Room, ServerEvent,
};

/// メンバーの増減をルームの参加者へ送る
pub struct MembershipBroadcaster {
    message_pusher: Arc<dyn MessagePusher>,
}

impl MembershipBroadcaster {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }
}

#[async_trait]
impl MembershipNotifier for MembershipBroadcaster {
    /// 作成者へ `created`
    async fn room_created(&self, room: &Room) {
        let Some(creator) = room.current_host() else {
            return;
        };
        let created = ServerEvent::Created {
            room_id: room.id.clone(),
            peer_id: creator.peer_id.clone(),
            seat: creator.seat,
            role: creator.role,
            mode: room.mode,
        };
        if let Err(e) = self.message_pusher.push_to(&creator.peer_id, &created).await {
            tracing::warn!("Failed to send 'created' to '{}': {}", creator.peer_id, e);
        }
    }

    /// 送信順:
    /// 1. 参加者へ `joined`
    /// 2. 参加者へ、既存メンバー 1 人ずつの `playerJoined`（状態同期）
    /// 3. 既存メンバーへ、参加者の `playerJoined`（再参加の場合は送らない）
    async fn member_admitted(&self, outcome: &JoinOutcome) {
        let room = &outcome.room;
        let member = &outcome.admission.member;
        let peer_id = &member.peer_id;

        let joined = ServerEvent::Joined {
            room_id: room.id.clone(),
            peer_id: peer_id.clone(),
            seat: member.seat,
            role: member.role,
            host_id: room.host_id().cloned(),
            mode: room.mode,
        };
        if let Err(e) = self.message_pusher.push_to(peer_id, &joined).await {
            tracing::warn!("Failed to send 'joined' to '{}': {}", peer_id, e);
        }

        for existing in room.members().iter().filter(|m| &m.peer_id != peer_id) {
            let sync = ServerEvent::PlayerJoined {
                room_id: room.id.clone(),
                peer_id: existing.peer_id.clone(),
                seat: existing.seat,
                nickname: existing.nickname.clone(),
            };
            if let Err(e) = self.message_pusher.push_to(peer_id, &sync).await {
                tracing::warn!("Failed to sync member list to '{}': {}", peer_id, e);
            }
        }

        if !outcome.admission.rejoined {
            let announcement = ServerEvent::PlayerJoined {
                room_id: room.id.clone(),
                peer_id: peer_id.clone(),
                seat: member.seat,
                nickname: member.nickname.clone(),
            };
            if let Err(e) = self
                .message_pusher
                .broadcast(room.other_member_ids(peer_id), &announcement)
                .await
            {
                tracing::warn!("Failed to broadcast 'playerJoined': {}", e);
            }
        }
    }

    /// 残りのメンバー全員に `playerLeft`、ホストが変わった場合は続けて `hostPromoted`
    async fn member_departed(&self, departure: &Departure) {
        if departure.room_emptied() {
            return;
        }

        let left = ServerEvent::PlayerLeft {
            room_id: departure.room_id.clone(),
            peer_id: departure.member.peer_id.clone(),
            seat: departure.member.seat,
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(departure.remaining.clone(), &left)
            .await
        {
            tracing::warn!("Failed to broadcast 'playerLeft': {}", e);
        }

        if let Some(new_host) = &departure.promoted {
            tracing::info!(
                "Peer '{}' promoted to host of room '{}'",
                new_host,
                departure.room_id
            );
            let promoted = ServerEvent::HostPromoted {
                room_id: departure.room_id.clone(),
                peer_id: new_host.clone(),
            };
            if let Err(e) = self
                .message_pusher
                .broadcast(departure.remaining.clone(), &promoted)
                .await
            {
                tracing::warn!("Failed to broadcast 'hostPromoted': {}", e);
            }
        }
    }
}
