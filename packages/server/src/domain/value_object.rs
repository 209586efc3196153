//! 値オブジェクト
//!
//! ワイヤ上の文字列をそのまま扱わず、検証・正規化済みの型として扱う。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

use super::error::{RoomError, ValueObjectError};

/// ピア ID（接続ごとに発行される不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    pub const MAX_LEN: usize = 64;

    /// Validate a client-supplied peer id (used when resuming a connection).
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyPeerId);
        }
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::PeerIdTooLong(len));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValueObjectError::InvalidPeerIdCharacters);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PeerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// PeerId を生成するファクトリ
pub struct PeerIdFactory;

impl PeerIdFactory {
    pub fn generate() -> PeerId {
        PeerId(Uuid::new_v4().to_string())
    }
}

/// ルーム ID（前後の空白を除去済み、空文字列は不可）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(raw: &str) -> Result<Self, RoomError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoomError::EmptyRoomId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームのパスワード（空文字列は公開ルーム）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn is_protected(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn matches(&self, attempt: &str) -> bool {
        self.0 == attempt
    }
}

/// 表示名（前後の空白を除去し、最大 16 文字）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    pub const MAX_CHARS: usize = 16;

    /// Trim and truncate; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let truncated: String = raw.trim().chars().take(Self::MAX_CHARS).collect();
        let trimmed = truncated.trim_end();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ゲームモード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    Pvp,
    Coop,
}

impl GameMode {
    /// 未知の値や未指定は `pvp` にフォールバックする
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("coop") => Self::Coop,
            _ => Self::Pvp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pvp => "pvp",
            Self::Coop => "coop",
        }
    }
}

/// ルーム内での役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim() {
            "host" => Some(Self::Host),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Guest => "guest",
        }
    }
}

/// 座席番号（1 から始まり、ルーム内で一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seat(u8);

impl Seat {
    pub const FIRST: Seat = Seat(1);

    pub fn new(value: u8) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// ルームの最大人数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity(u8);

impl Capacity {
    pub const DUEL: Capacity = Capacity(2);

    pub fn new(value: usize) -> Result<Self, ValueObjectError> {
        match u8::try_from(value) {
            Ok(v) if v >= 1 => Ok(Self(v)),
            _ => Err(ValueObjectError::InvalidCapacity),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Seats available in a room of this capacity, in ascending order.
    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        (1..=self.0).map(Seat)
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::DUEL
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn millis_until(&self, later: Timestamp) -> i64 {
        later.0.saturating_sub(self.0)
    }
}

/// 中身を解釈せずにそのまま中継するペイロード（`input`, `snapshot`, `seq`, `tick` など）
#[derive(Debug, Clone)]
pub struct Payload(Box<RawValue>);

impl Payload {
    pub fn new(raw: Box<RawValue>) -> Self {
        Self(raw)
    }

    /// Build a payload from JSON text. Fails if the text is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    pub fn get(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for Payload {}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Box::<RawValue>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_is_trimmed() {
        // テスト項目: ルーム ID の前後の空白が除去される
        // given (前提条件):
        let raw = "  r1 \t";

        // when (操作):
        let room_id = RoomId::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "r1");
    }

    #[test]
    fn test_room_id_rejects_blank() {
        // テスト項目: 空白のみのルーム ID は EmptyRoomId になる
        // given (前提条件):
        let raw = "   ";

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::EmptyRoomId));
    }

    #[test]
    fn test_peer_id_validation() {
        // テスト項目: ピア ID の検証（空・長すぎ・不正文字）
        // given (前提条件):
        let too_long = "a".repeat(PeerId::MAX_LEN + 1);

        // when (操作) / then (期待する結果):
        assert!(PeerId::new("alice-01_x".to_string()).is_ok());
        assert_eq!(
            PeerId::new(String::new()),
            Err(ValueObjectError::EmptyPeerId)
        );
        assert_eq!(
            PeerId::new(too_long),
            Err(ValueObjectError::PeerIdTooLong(PeerId::MAX_LEN + 1))
        );
        assert_eq!(
            PeerId::new("bob smith".to_string()),
            Err(ValueObjectError::InvalidPeerIdCharacters)
        );
    }

    #[test]
    fn test_generated_peer_ids_are_unique_and_valid() {
        // テスト項目: 生成されたピア ID は一意で、検証を通過する
        // when (操作):
        let a = PeerIdFactory::generate();
        let b = PeerIdFactory::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(PeerId::new(a.into_string()).is_ok());
    }

    #[test]
    fn test_nickname_is_trimmed_and_truncated() {
        // テスト項目: 表示名は空白除去のうえ 16 文字に切り詰められる
        // given (前提条件):
        let raw = "  あいうえおかきくけこさしすせそたちつ  ";

        // when (操作):
        let nickname = Nickname::parse(raw).unwrap();

        // then (期待する結果):
        assert_eq!(nickname.as_str().chars().count(), 16);
        assert_eq!(nickname.as_str(), "あいうえおかきくけこさしすせそた");
    }

    #[test]
    fn test_nickname_blank_is_none() {
        // テスト項目: 空白のみの表示名は None になる
        assert_eq!(Nickname::parse("   "), None);
        assert_eq!(Nickname::parse(""), None);
    }

    #[test]
    fn test_game_mode_falls_back_to_pvp() {
        // テスト項目: 未知のモードや未指定は pvp にフォールバックする
        assert_eq!(GameMode::from_wire(Some("coop")), GameMode::Coop);
        assert_eq!(GameMode::from_wire(Some("pvp")), GameMode::Pvp);
        assert_eq!(GameMode::from_wire(Some("battle-royale")), GameMode::Pvp);
        assert_eq!(GameMode::from_wire(None), GameMode::Pvp);
    }

    #[test]
    fn test_password_matching() {
        // テスト項目: パスワードは完全一致でのみ通過する
        // given (前提条件):
        let public = Password::default();
        let secret = Password::new("hunter2".to_string());

        // then (期待する結果):
        assert!(!public.is_protected());
        assert!(public.matches(""));
        assert!(secret.is_protected());
        assert!(secret.matches("hunter2"));
        assert!(!secret.matches("wrong"));
    }

    #[test]
    fn test_capacity_bounds_and_seats() {
        // テスト項目: 容量は 1 以上 255 以下、座席は 1 から昇順
        assert!(Capacity::new(0).is_err());
        assert!(Capacity::new(256).is_err());

        let capacity = Capacity::new(3).unwrap();
        let seats: Vec<u8> = capacity.seats().map(|s| s.value()).collect();
        assert_eq!(seats, vec![1, 2, 3]);
    }

    #[test]
    fn test_payload_keeps_original_text() {
        // テスト項目: ペイロードは元の JSON テキストをそのまま保持する
        // given (前提条件):
        let json = r#"{"dir": "up",  "held":[1,2]}"#;

        // when (操作):
        let payload = Payload::from_json(json).unwrap();
        let serialized = serde_json::to_string(&payload).unwrap();

        // then (期待する結果):
        assert_eq!(payload.get(), json);
        assert_eq!(serialized, json);
    }
}
