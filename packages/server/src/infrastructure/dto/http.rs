//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/rooms` の要素
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub mode: String,
    pub members: Vec<String>,
    pub password_protected: bool,
    pub created_at: String,
}

/// `GET /api/rooms/{room_id}` のメンバー
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub peer_id: String,
    pub seat: u8,
    pub role: String,
    pub nickname: Option<String>,
    pub joined_at: String,
    pub last_active_at: Option<String>,
}

/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub mode: String,
    pub host_id: Option<String>,
    pub capacity: u8,
    pub password_protected: bool,
    pub created_at: String,
    pub members: Vec<MemberDetailDto>,
}
