//! WebSocket message DTOs.
//!
//! Every frame is one JSON object `{"type": ..., ...}`. Inbound frames are decoded
//! in two steps: the envelope (`type` only) first, then the typed request for that
//! type. Opaque gameplay fields are kept as raw JSON and forwarded verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{InboundKind, Payload};

// ========================================
// Inbound (client → server)
// ========================================

#[derive(Debug, Deserialize)]
struct Envelope {
    r#type: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRequest {
    pub room_id: Option<String>,
    pub password: Option<String>,
    pub mode: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRequest {
    pub room_id: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InputRequest {
    pub room_id: Option<String>,
    pub seq: Option<Payload>,
    pub input: Option<Payload>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StateRequest {
    pub room_id: Option<String>,
    pub tick: Option<Payload>,
    pub snapshot: Option<Payload>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PingRequest {
    pub t: Option<Payload>,
}

/// Decoded inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Create(CreateRequest),
    Join(JoinRequest),
    Leave,
    Input(InputRequest),
    State(StateRequest),
    Ping(PingRequest),
}

impl ClientMessage {
    pub fn kind(&self) -> InboundKind {
        match self {
            Self::Create(_) => InboundKind::Create,
            Self::Join(_) => InboundKind::Join,
            Self::Leave => InboundKind::Leave,
            Self::Input(_) => InboundKind::Input,
            Self::State(_) => InboundKind::State,
            Self::Ping(_) => InboundKind::Ping,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown message type '{0}'")]
    UnknownType(String),
}

/// Decode one inbound text frame.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, DecodeError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let message = match envelope.r#type.as_str() {
        "create" => ClientMessage::Create(serde_json::from_str(text)?),
        "join" => ClientMessage::Join(serde_json::from_str(text)?),
        "leave" => ClientMessage::Leave,
        "input" => ClientMessage::Input(serde_json::from_str(text)?),
        "state" => ClientMessage::State(serde_json::from_str(text)?),
        "ping" => ClientMessage::Ping(serde_json::from_str(text)?),
        other => return Err(DecodeError::UnknownType(other.to_string())),
    };
    Ok(message)
}

// ========================================
// Outbound (server → client)
// ========================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Welcome,
    Created,
    Joined,
    PlayerJoined,
    PlayerLeft,
    HostPromoted,
    Left,
    Input,
    State,
    Pong,
    Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMessage {
    pub r#type: MessageType,
    pub peer_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub peer_id: String,
    pub seat: u8,
    pub role: String,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub peer_id: String,
    pub seat: u8,
    pub role: String,
    pub host_id: Option<String>,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoinedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub peer_id: String,
    pub seat: u8,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeftMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub peer_id: String,
    pub seat: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPromotedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub peer_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftMessage {
    pub r#type: MessageType,
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMessage<'a> {
    pub r#type: MessageType,
    pub room_id: &'a str,
    pub peer_id: &'a str,
    pub seat: u8,
    pub seq: Option<&'a Payload>,
    pub input: Option<&'a Payload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage<'a> {
    pub r#type: MessageType,
    pub room_id: &'a str,
    pub tick: Option<&'a Payload>,
    pub snapshot: Option<&'a Payload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage<'a> {
    pub r#type: MessageType,
    pub t: Option<&'a Payload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_create_with_defaults() {
        // テスト項目: create は省略されたフィールドを None として復元する
        // given (前提条件):
        let text = r#"{"type":"create","roomId":" r1 "}"#;

        // when (操作):
        let message = decode_client_message(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::Create(CreateRequest {
                room_id: Some(" r1 ".to_string()),
                ..Default::default()
            })
        );
        assert_eq!(message.kind(), InboundKind::Create);
    }

    #[test]
    fn test_decode_input_keeps_raw_payload() {
        // テスト項目: input のペイロードは解釈されず元のテキストのまま保持される
        // given (前提条件):
        let text = r#"{"type":"input","roomId":"r1","seq":1,"input":{"dir":"up","keys":[ 1, 2 ]}}"#;

        // when (操作):
        let message = decode_client_message(text).unwrap();

        // then (期待する結果):
        let ClientMessage::Input(request) = message else {
            panic!("expected input");
        };
        assert_eq!(request.room_id.as_deref(), Some("r1"));
        assert_eq!(request.seq.unwrap().get(), "1");
        assert_eq!(request.input.unwrap().get(), r#"{"dir":"up","keys":[ 1, 2 ]}"#);
    }

    #[test]
    fn test_decode_leave_ignores_extra_fields() {
        // テスト項目: leave は余分なフィールドがあっても復元できる
        let message = decode_client_message(r#"{"type":"leave","roomId":"r1"}"#).unwrap();
        assert_eq!(message, ClientMessage::Leave);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        // テスト項目: JSON でない・type がない・未知の type はエラーになる
        assert!(matches!(
            decode_client_message("not json"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_client_message(r#"{"roomId":"r1"}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_client_message(r#"[1,2,3]"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_client_message(r#"{"type":"teleport"}"#),
            Err(DecodeError::UnknownType(t)) if t == "teleport"
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_field_types() {
        // テスト項目: フィールドの型が不正なフレームはエラーになる
        assert!(decode_client_message(r#"{"type":"join","roomId":42}"#).is_err());
    }
}
