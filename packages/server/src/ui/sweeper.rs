//! Background task reclaiming abandoned rooms.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::usecase::SweepRoomsUseCase;

/// Run `usecase` every `period` until `shutdown` flips.
///
/// Each sweep is awaited before the next tick is taken, so runs never overlap.
pub fn spawn_sweeper(
    usecase: Arc<SweepRoomsUseCase>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    usecase.execute().await;
                }
                _ = shutdown.changed() => break,
            }
        }
        tracing::debug!("Room sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capacity, GameMode, Password, Room, RoomId, RoomRepository, Timestamp};
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use tandem_shared::time::FixedClock;

    #[tokio::test]
    async fn test_sweeper_reclaims_and_stops_on_shutdown() {
        // テスト項目: 周期実行で空ルームが回収され、シャットダウン通知で停止する
        // given (前提条件):
        let stale = Room::empty(
            RoomId::new("stale").unwrap(),
            Password::default(),
            GameMode::Pvp,
            Capacity::DUEL,
            Timestamp::new(0),
        );
        let repository = Arc::new(InMemoryRoomRepository::with_rooms(
            Capacity::DUEL,
            vec![stale],
        ));
        let usecase = Arc::new(SweepRoomsUseCase::new(
            repository.clone(),
            Arc::new(FixedClock::new(10_000)),
            Duration::from_secs(1),
        ));
        let (stop_tx, stop_rx) = watch::channel(false);

        // when (操作):
        let handle = spawn_sweeper(usecase, Duration::from_millis(10), stop_rx);
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop_tx.send(true).unwrap();

        // then (期待する結果):
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop")
            .unwrap();
        assert!(repository.list_rooms().await.is_empty());
    }
}
