//! Repository trait 定義
//!
//! ドメイン層が必要とする Room Store のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 排他制御の約束
//!
//! 状態を変更する操作は、同じルームに対する他の操作と比べて 1 つの不可分な
//! ステップとして実行されなければならない。ルームをまたぐ操作同士は直列化しない。
//!
//! メンバーの増減の通知（`MembershipNotifier`）もルームのロック内で行う。これにより
//! 同じルームの通知は、状態が変化した順に各ピアの送信キューへ積まれる。

use async_trait::async_trait;

use super::{
    Admission, Departure, GameMode, Nickname, Password, PeerId, Role, Room, RoomError,
    RoomId, Timestamp,
};

/// `join_room` の結果
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// 参加後のルームのスナップショット
    pub room: Room,
    pub admission: Admission,
}

/// メンバーの増減をルームのロック内で受け取る通知先
///
/// 実装は送信キューへの投入だけを行い、ネットワーク I/O を待たないこと。
#[async_trait]
pub trait MembershipNotifier: Send + Sync {
    /// ルームが作成された（作成者が唯一のメンバー）
    async fn room_created(&self, room: &Room);

    /// メンバーが参加・再参加した
    async fn member_admitted(&self, outcome: &JoinOutcome);

    /// メンバーが退出した。ルームが空になった場合も呼ばれる
    async fn member_departed(&self, departure: &Departure);
}

/// Room Store trait
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを作成し、作成者を唯一のメンバー（ホスト、座席 1）として登録
    async fn create_room(
        &self,
        room_id: RoomId,
        password: Password,
        mode: GameMode,
        creator: PeerId,
        nickname: Option<Nickname>,
        now: Timestamp,
        notifier: &dyn MembershipNotifier,
    ) -> Result<Room, RoomError>;

    /// 既存のルームに参加（既存メンバーなら再参加）
    async fn join_room(
        &self,
        room_id: &RoomId,
        password: &str,
        peer_id: PeerId,
        nickname: Option<Nickname>,
        requested_role: Option<Role>,
        now: Timestamp,
        notifier: &dyn MembershipNotifier,
    ) -> Result<JoinOutcome, RoomError>;

    /// ルームから退出。空になったルームは即座に削除する
    ///
    /// ルームが存在しない、またはメンバーでない場合は `None`
    async fn leave(
        &self,
        room_id: &RoomId,
        peer_id: &PeerId,
        notifier: &dyn MembershipNotifier,
    ) -> Option<Departure>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// メンバーが 0 人で、作成から `idle_timeout_millis` を超えたルームを削除
    ///
    /// 削除したルームの ID を返す。冪等。
    async fn sweep(&self, now: Timestamp, idle_timeout_millis: i64) -> Vec<RoomId>;

    /// 全ルームのスナップショット（ルーム ID 順）
    async fn list_rooms(&self) -> Vec<Room>;
}

/// 何も通知しない MembershipNotifier（Room Store 単体のテスト用）
#[cfg(test)]
pub struct SilentNotifier;

#[cfg(test)]
#[async_trait]
impl MembershipNotifier for SilentNotifier {
    async fn room_created(&self, _room: &Room) {}

    async fn member_admitted(&self, _outcome: &JoinOutcome) {}

    async fn member_departed(&self, _departure: &Departure) {}
}
