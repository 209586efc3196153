//! ドメイン層のエラー定義

use thiserror::Error;

/// Room Store の操作で発生するエラー
///
/// `Display` の文字列はそのままクライアントへの `error{message}` に使われる。
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("房间号不能为空")]
    EmptyRoomId,
    #[error("房间已存在")]
    RoomExists,
    #[error("房间不存在")]
    RoomNotFound,
    #[error("密码错误")]
    WrongPassword,
    #[error("房间已满")]
    RoomFull,
}

/// 値オブジェクトの生成時に発生するエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("peer id must not be empty")]
    EmptyPeerId,
    #[error("peer id is too long ({0} characters, max {max})", max = super::value_object::PeerId::MAX_LEN)]
    PeerIdTooLong(usize),
    #[error("peer id contains invalid characters")]
    InvalidPeerIdCharacters,
    #[error("room capacity must be between 1 and {max}", max = u8::MAX)]
    InvalidCapacity,
}

/// メッセージ送信時に発生するエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("peer '{0}' is not connected")]
    ClientNotFound(String),
    #[error("peer '{0}' is already connected")]
    AlreadyConnected(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}
