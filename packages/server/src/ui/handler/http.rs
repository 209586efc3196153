//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        conversion::member_detail,
        http::{RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use tandem_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(detail) => {
            let room = &detail.room;
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room.id.to_string(),
                mode: room.mode.as_str().to_string(),
                host_id: room.host_id().map(|id| id.to_string()),
                capacity: room.capacity.value(),
                password_protected: room.is_password_protected(),
                created_at: timestamp_to_rfc3339(room.created_at.value()),
                members: room
                    .members()
                    .iter()
                    .map(|m| member_detail(m, detail.last_active_at.get(&m.peer_id).copied()))
                    .collect(),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
