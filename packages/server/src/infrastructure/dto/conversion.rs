//! Conversion logic between domain values and DTOs.

use tandem_shared::time::timestamp_to_rfc3339;

use crate::domain::{Member, Room, ServerEvent, Timestamp};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Event → WebSocket frame
// ========================================

/// Encode a domain event as one outbound text frame.
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    match event {
        ServerEvent::Welcome { peer_id } => serde_json::to_string(&dto::WelcomeMessage {
            r#type: dto::MessageType::Welcome,
            peer_id: peer_id.to_string(),
        }),
        ServerEvent::Created {
            room_id,
            peer_id,
            seat,
            role,
            mode,
        } => serde_json::to_string(&dto::CreatedMessage {
            r#type: dto::MessageType::Created,
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            seat: seat.value(),
            role: role.as_str().to_string(),
            mode: mode.as_str().to_string(),
        }),
        ServerEvent::Joined {
            room_id,
            peer_id,
            seat,
            role,
            host_id,
            mode,
        } => serde_json::to_string(&dto::JoinedMessage {
            r#type: dto::MessageType::Joined,
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            seat: seat.value(),
            role: role.as_str().to_string(),
            host_id: host_id.as_ref().map(ToString::to_string),
            mode: mode.as_str().to_string(),
        }),
        ServerEvent::PlayerJoined {
            room_id,
            peer_id,
            seat,
            nickname,
        } => serde_json::to_string(&dto::PlayerJoinedMessage {
            r#type: dto::MessageType::PlayerJoined,
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            seat: seat.value(),
            nickname: nickname.as_ref().map(|n| n.as_str().to_string()),
        }),
        ServerEvent::PlayerLeft {
            room_id,
            peer_id,
            seat,
        } => serde_json::to_string(&dto::PlayerLeftMessage {
            r#type: dto::MessageType::PlayerLeft,
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            seat: seat.value(),
        }),
        ServerEvent::HostPromoted { room_id, peer_id } => {
            serde_json::to_string(&dto::HostPromotedMessage {
                r#type: dto::MessageType::HostPromoted,
                room_id: room_id.to_string(),
                peer_id: peer_id.to_string(),
            })
        }
        ServerEvent::Left { room_id } => serde_json::to_string(&dto::LeftMessage {
            r#type: dto::MessageType::Left,
            room_id: room_id.as_ref().map(ToString::to_string),
        }),
        ServerEvent::Input {
            room_id,
            peer_id,
            seat,
            seq,
            input,
        } => serde_json::to_string(&dto::InputMessage {
            r#type: dto::MessageType::Input,
            room_id: room_id.as_str(),
            peer_id: peer_id.as_str(),
            seat: seat.value(),
            seq: seq.as_ref(),
            input: input.as_ref(),
        }),
        ServerEvent::State {
            room_id,
            tick,
            snapshot,
        } => serde_json::to_string(&dto::StateMessage {
            r#type: dto::MessageType::State,
            room_id: room_id.as_str(),
            tick: tick.as_ref(),
            snapshot: snapshot.as_ref(),
        }),
        ServerEvent::Pong { t } => serde_json::to_string(&dto::PongMessage {
            r#type: dto::MessageType::Pong,
            t: t.as_ref(),
        }),
        ServerEvent::Error { message } => serde_json::to_string(&dto::ErrorMessage {
            r#type: dto::MessageType::Error,
            message: message.clone(),
        }),
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.to_string(),
            mode: room.mode.as_str().to_string(),
            members: room.members().iter().map(|m| m.peer_id.to_string()).collect(),
            password_protected: room.is_password_protected(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

/// Build the detail view of a member, with the peer's last activity if known.
pub fn member_detail(member: &Member, last_active_at: Option<Timestamp>) -> http::MemberDetailDto {
    http::MemberDetailDto {
        peer_id: member.peer_id.to_string(),
        seat: member.seat.value(),
        role: member.role.as_str().to_string(),
        nickname: member.nickname.as_ref().map(|n| n.as_str().to_string()),
        joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        last_active_at: last_active_at.map(|t| timestamp_to_rfc3339(t.value())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Capacity, GameMode, Nickname, Password, Payload, PeerId, Role, RoomId, Seat,
    };
    use serde_json::{Value, json};

    fn peer(id: &str) -> PeerId {
        PeerId::new(id.to_string()).unwrap()
    }

    fn to_value(event: &ServerEvent) -> Value {
        serde_json::from_str(&encode_event(event).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_created() {
        // テスト項目: created イベントがワイヤ形式に変換される
        // given (前提条件):
        let event = ServerEvent::Created {
            room_id: RoomId::new("r1").unwrap(),
            peer_id: peer("alice"),
            seat: Seat::FIRST,
            role: Role::Host,
            mode: GameMode::Pvp,
        };

        // when (操作):
        let value = to_value(&event);

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type":"created","roomId":"r1","peerId":"alice","seat":1,"role":"host","mode":"pvp"})
        );
    }

    #[test]
    fn test_encode_input_forwards_payload_verbatim() {
        // テスト項目: input のペイロードがバイト単位でそのまま出力される
        // given (前提条件):
        let raw = r#"{"dir":"up", "pressed" :true}"#;
        let event = ServerEvent::Input {
            room_id: RoomId::new("r1").unwrap(),
            peer_id: peer("bob"),
            seat: Seat::new(2).unwrap(),
            seq: Some(Payload::from_json("7").unwrap()),
            input: Some(Payload::from_json(raw).unwrap()),
        };

        // when (操作):
        let frame = encode_event(&event).unwrap();

        // then (期待する結果):
        assert!(frame.contains(raw));
        assert_eq!(
            serde_json::from_str::<Value>(&frame).unwrap(),
            json!({"type":"input","roomId":"r1","peerId":"bob","seat":2,"seq":7,"input":{"dir":"up","pressed":true}})
        );
    }

    #[test]
    fn test_encode_player_events_use_camel_case_types() {
        // テスト項目: playerJoined / playerLeft / hostPromoted の type が camelCase になる
        let room_id = RoomId::new("r1").unwrap();

        let joined = to_value(&ServerEvent::PlayerJoined {
            room_id: room_id.clone(),
            peer_id: peer("bob"),
            seat: Seat::new(2).unwrap(),
            nickname: Nickname::parse("Bob"),
        });
        let left = to_value(&ServerEvent::PlayerLeft {
            room_id: room_id.clone(),
            peer_id: peer("alice"),
            seat: Seat::FIRST,
        });
        let promoted = to_value(&ServerEvent::HostPromoted {
            room_id,
            peer_id: peer("bob"),
        });

        assert_eq!(joined["type"], "playerJoined");
        assert_eq!(joined["nickname"], "Bob");
        assert_eq!(left["type"], "playerLeft");
        assert_eq!(left["seat"], 1);
        assert_eq!(promoted["type"], "hostPromoted");
        assert_eq!(promoted["peerId"], "bob");
    }

    #[test]
    fn test_encode_error_and_pong() {
        // テスト項目: error と pong が正しく変換される
        let error = to_value(&ServerEvent::Error {
            message: "密码错误".to_string(),
        });
        let pong = to_value(&ServerEvent::Pong {
            t: Some(Payload::from_json("1700000000000").unwrap()),
        });
        let left = to_value(&ServerEvent::Left { room_id: None });

        assert_eq!(error, json!({"type":"error","message":"密码错误"}));
        assert_eq!(pong, json!({"type":"pong","t":1700000000000u64}));
        assert_eq!(left, json!({"type":"left","roomId":null}));
    }

    #[test]
    fn test_room_summary_hides_password() {
        // テスト項目: ルーム一覧の DTO にはパスワードが含まれず、保護の有無だけが出る
        // given (前提条件):
        let room = Room::create(
            RoomId::new("r1").unwrap(),
            Password::new("secret".to_string()),
            GameMode::Coop,
            Capacity::DUEL,
            peer("alice"),
            None,
            Timestamp::new(0),
        );

        // when (操作):
        let dto = http::RoomSummaryDto::from(&room);
        let json = serde_json::to_string(&dto).unwrap();

        // then (期待する結果):
        assert!(dto.password_protected);
        assert_eq!(dto.members, vec!["alice".to_string()]);
        assert_eq!(dto.mode, "coop");
        assert!(!json.contains("secret"));
    }
}
