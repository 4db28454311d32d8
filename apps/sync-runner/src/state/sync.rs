//! # Sync State
//!
//! Owns the engine and the handles of its background timers.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::info;

use goodlink_core::Notification;
use goodlink_store::Storage;
use goodlink_sync::{
    ActivityFeed, BroadcastNotifier, InventorySync, MutationSimulator, SyncConfig, SyncRandom,
    SyncResult, TaskHandle, ThreadRandom,
};

/// Engine plus running timers.
pub struct SyncState {
    engine: InventorySync,
    notifier: Arc<BroadcastNotifier>,
    tasks: Mutex<Vec<TaskHandle>>,
}

impl SyncState {
    /// Creates the state with the thread RNG.
    pub fn new(config: SyncConfig, storage: Storage) -> Self {
        Self::with_random(config, storage, Arc::new(ThreadRandom))
    }

    /// Creates the state with an explicit random source.
    pub fn with_random(config: SyncConfig, storage: Storage, random: Arc<dyn SyncRandom>) -> Self {
        let notifier = Arc::new(BroadcastNotifier::default());
        let engine = InventorySync::with_parts(config, storage, random, notifier.clone());

        SyncState {
            engine,
            notifier,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn engine(&self) -> &InventorySync {
        &self.engine
    }

    /// Subscribes to engine notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Seeds an empty store and starts the enabled timers.
    ///
    /// Mounting twice does not start a second set of timers.
    pub async fn mount(&self) -> SyncResult<()> {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            return Ok(());
        }

        self.engine.connect().await?;

        let config = self.engine.config();
        if config.simulator.enabled {
            tasks.push(MutationSimulator::spawn(self.engine.clone()));
        }
        if config.activity.enabled {
            tasks.push(ActivityFeed::spawn(self.engine.clone()));
        }

        info!(tasks = tasks.len(), "Sync engine mounted");
        Ok(())
    }

    /// Number of timers currently running.
    pub async fn running_tasks(&self) -> usize {
        self.tasks
            .lock()
            .await
            .iter()
            .filter(|task| task.is_running())
            .count()
    }

    /// Stops the timers, disconnects the engine and closes the store.
    pub async fn unmount(&self) -> SyncResult<()> {
        let tasks: Vec<TaskHandle> = self.tasks.lock().await.drain(..).collect();

        for task in tasks {
            let name = task.name();
            task.stop().await?;
            info!(task = name, "Timer stopped");
        }

        self.engine.disconnect();
        self.engine.storage().close().await;

        info!("Sync engine unmounted");
        Ok(())
    }
}
