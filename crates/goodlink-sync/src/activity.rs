//! # Live Activity Feed
//!
//! Background loop that appends simulated marketplace events to the
//! persisted feed. The period is drawn once per start from the configured
//! `[min_interval_ms, max_interval_ms]` range.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, trace};

use crate::engine::InventorySync;
use crate::task::TaskHandle;

pub struct ActivityFeed {
    engine: InventorySync,
    period: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl ActivityFeed {
    pub fn spawn(engine: InventorySync) -> TaskHandle {
        let settings = &engine.config().activity;
        let period_ms = engine
            .random()
            .delay_ms(settings.min_interval_ms, settings.max_interval_ms);

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let feed = ActivityFeed {
            engine,
            period: Duration::from_millis(period_ms),
            shutdown_rx,
        };
        let join = tokio::spawn(feed.run());
        TaskHandle::new("activity-feed", shutdown_tx, join)
    }

    async fn run(mut self) {
        info!(period_ms = self.period.as_millis() as u64, "Activity feed starting");

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.engine.simulate_activity().await {
                        Ok(activity) => trace!(id = %activity.id, "Activity appended"),
                        Err(e) => error!(?e, "Failed to append activity"),
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Activity feed shutting down");
                    break;
                }
            }
        }

        info!("Activity feed stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::notify::NoOpNotifier;
    use crate::random::ScriptedRandom;
    use goodlink_store::Storage;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_feed_uses_drawn_period() {
        // First delay draw picks the feed period.
        let random = ScriptedRandom::new().with_delays([6_000]);
        let engine = InventorySync::with_parts(
            SyncConfig::default(),
            Storage::in_memory(),
            Arc::new(random),
            Arc::new(NoOpNotifier),
        );

        let handle = ActivityFeed::spawn(engine.clone());

        tokio::time::sleep(Duration::from_millis(5_900)).await;
        assert!(engine.activities().await.unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(6_200)).await;
        assert_eq!(engine.activities().await.unwrap().len(), 2);

        handle.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(engine.activities().await.unwrap().len(), 2);
    }
}
