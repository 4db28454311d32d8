//! # Mutation Simulator
//!
//! Background loop that nudges a random record's quantity on a fixed period,
//! standing in for marketplace-side stock changes.
//!
//! ```text
//!   start ──── period ────► tick ──── period ────► tick ──── ... ──── stop
//!                            │                      │
//!                            ▼                      ▼
//!              simulate_inventory_update  simulate_inventory_update
//! ```
//!
//! The first tick fires one full period after start, never immediately.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::engine::InventorySync;
use crate::task::TaskHandle;

/// Periodic quantity mutations against an engine.
pub struct MutationSimulator {
    engine: InventorySync,
    period: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl MutationSimulator {
    /// Starts the loop using the engine's `[simulator]` period.
    pub fn spawn(engine: InventorySync) -> TaskHandle {
        let period = engine.config().simulator.interval();
        Self::spawn_with_period(engine, period)
    }

    /// Starts the loop with an explicit period.
    pub fn spawn_with_period(engine: InventorySync, period: Duration) -> TaskHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let simulator = MutationSimulator {
            engine,
            period,
            shutdown_rx,
        };
        let join = tokio::spawn(simulator.run());
        TaskHandle::new("mutation-simulator", shutdown_tx, join)
    }

    async fn run(mut self) {
        info!(period_ms = self.period.as_millis() as u64, "Mutation simulator starting");

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.engine.simulate_inventory_update().await {
                        Ok(record) => debug!(
                            sku = %record.sku,
                            marketplace = %record.marketplace,
                            quantity = record.quantity,
                            "Simulated inventory change"
                        ),
                        Err(e) => error!(?e, "Simulated inventory change failed"),
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Mutation simulator shutting down");
                    break;
                }
            }
        }

        info!("Mutation simulator stopped");
    }
}
