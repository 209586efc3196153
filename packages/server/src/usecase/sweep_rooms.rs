//! UseCase: 放置されたルームの回収
//!
//! 異常終了などで空のまま残ったルームを回収する安全網。

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// 空ルームを回収するまでのデフォルトの時間（6 時間）
pub const DEFAULT_ROOM_IDLE_TIMEOUT: Duration = Duration::from_secs(6 * 60 * 60);

/// ルーム回収のユースケース
pub struct SweepRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    idle_timeout: Duration,
}

impl SweepRoomsUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            idle_timeout,
        }
    }

    /// メンバーが 0 人で、作成から `idle_timeout` を超えたルームを削除する
    pub async fn execute(&self) -> Vec<RoomId> {
        let now = Timestamp::new(self.clock.now_millis());
        let idle_timeout_millis = i64::try_from(self.idle_timeout.as_millis()).unwrap_or(i64::MAX);

        let removed = self.repository.sweep(now, idle_timeout_millis).await;
        if removed.is_empty() {
            tracing::debug!("Room sweep finished, nothing to reclaim");
        } else {
            tracing::info!("Room sweep reclaimed {} room(s): {:?}", removed.len(), removed);
        }
        removed
    }
}
