//! UseCase 層のエラー定義

use thiserror::Error;

/// 接続時のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("peer id '{0}' is already connected")]
    DuplicatePeerId(String),
    #[error("failed to greet peer: {0}")]
    GreetingFailed(String),
}

/// ルーム詳細取得時のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
