//! # Inventory Sync Engine
//!
//! The simulated sync state machine over the persisted inventory records.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   manual_sync / retry          random delay          draw outcome      │
//! │  ─────────────────────►  syncing ────────────► ───┬──────────────────► │
//! │                                                    │                    │
//! │                        p(failure) ┌────────────────┴───────┐            │
//! │                                   ▼                        ▼            │
//! │                       error("Connection timeout"      synced            │
//! │                             / "Retry failed")       (error cleared)     │
//! │                                                                         │
//! │   update_inventory (simulator)  ──────────────────────►  synced         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A simulated failure is a terminal record status plus an error
//! notification. `Err` only comes back for storage problems and bad input.
//!
//! ## Interleaving
//! Every store write is one atomic reducer application. Operations are not
//! coordinated with each other: a simulator tick can flip a record that a
//! manual sync already marked `syncing` back to `synced` before that sync
//! resolves it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use goodlink_core::inventory;
use goodlink_core::validation::{validate_marketplace, validate_sku};
use goodlink_core::{
    format_time_since, ActivityKind, ConnectionHealth, InventoryRecord, Notification, RecordKey,
    SyncActivity, SyncMetrics, SyncOutcome, SyncStats, BULK_SYNC_ERROR, RETRY_ERROR,
};
use goodlink_store::Storage;

use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::notify::{Notifier, TracingNotifier};
use crate::random::{SyncRandom, ThreadRandom};

/// Actions a successful activity entry is drawn from.
pub const ACTIVITY_ACTIONS: [&str; 5] = [
    "Inventory synchronized",
    "Price updated",
    "Listing refreshed",
    "Stock level adjusted",
    "Order imported",
];

const ACTIVITY_ERROR_ACTION: &str = "Sync failed";
const ACTIVITY_ERROR_DETAILS: &str = "API rate limit exceeded";

// =============================================================================
// Results
// =============================================================================

/// Tally of one manual sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

/// Point-in-time view of the engine for status displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub is_connected: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub stats: SyncStats,
    pub metrics: SyncMetrics,
    pub health: ConnectionHealth,
}

impl SyncSnapshot {
    /// "Never", "Just now", "5m ago", ...
    pub fn last_sync_label(&self, now: DateTime<Utc>) -> String {
        format_time_since(self.last_sync_time, now)
    }
}

// =============================================================================
// Engine
// =============================================================================

struct Inner {
    config: SyncConfig,
    storage: Storage,
    random: Arc<dyn SyncRandom>,
    notifier: Arc<dyn Notifier>,
    connected: AtomicBool,
}

/// Cheaply cloneable handle to the sync engine.
#[derive(Clone)]
pub struct InventorySync {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for InventorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventorySync")
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl InventorySync {
    /// Creates an engine with the thread RNG and log-only notifications.
    pub fn new(config: SyncConfig, storage: Storage) -> Self {
        Self::with_parts(
            config,
            storage,
            Arc::new(ThreadRandom),
            Arc::new(TracingNotifier),
        )
    }

    /// Creates an engine with an explicit random source and notifier.
    pub fn with_parts(
        config: SyncConfig,
        storage: Storage,
        random: Arc<dyn SyncRandom>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        InventorySync {
            inner: Arc::new(Inner {
                config,
                storage,
                random,
                notifier,
                connected: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    pub(crate) fn random(&self) -> &dyn SyncRandom {
        self.inner.random.as_ref()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Seeds an empty store and marks the engine connected.
    ///
    /// ## Returns
    /// `true` when the sample records were written.
    pub async fn connect(&self) -> SyncResult<bool> {
        let seeded = self.inner.storage.inventory().seed_if_empty(Utc::now()).await?;
        self.inner.connected.store(true, Ordering::SeqCst);
        info!(seeded, "Inventory sync connected");
        Ok(seeded)
    }

    pub fn disconnect(&self) {
        self.inner.connected.store(false, Ordering::SeqCst);
        info!("Inventory sync disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns all records in insertion order.
    pub async fn inventory(&self) -> SyncResult<Vec<InventoryRecord>> {
        Ok(self.inner.storage.inventory().get().await?)
    }

    /// Returns the activity feed, newest first.
    pub async fn activities(&self) -> SyncResult<Vec<SyncActivity>> {
        Ok(self.inner.storage.activity().list().await?)
    }

    /// Builds the status snapshot shown by the runner.
    pub async fn status(&self) -> SyncResult<SyncSnapshot> {
        let records = self.inventory().await?;
        let stats = self.inner.storage.stats().get().await?;
        let last_sync_time = self.inner.storage.stats().last_sync_time().await?;
        let is_connected = self.is_connected();

        Ok(SyncSnapshot {
            is_connected,
            last_sync_time,
            stats,
            metrics: SyncMetrics::from_records(&records),
            health: ConnectionHealth::evaluate(is_connected, &stats),
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Applies a quantity change and counts it as a successful sync.
    ///
    /// Emits a notification when `|delta|` exceeds the configured threshold.
    pub async fn update_inventory(
        &self,
        sku: &str,
        marketplace: &str,
        delta: i64,
    ) -> SyncResult<InventoryRecord> {
        let now = Utc::now();
        let storage = &self.inner.storage;

        let records = storage.inventory().upsert(sku, marketplace, delta, now).await?;
        storage.stats().record(&SyncOutcome::Synced).await?;
        storage.stats().touch_last_sync(now).await?;

        let record = inventory::require(&records, sku, marketplace)?.clone();

        debug!(
            sku = %sku,
            marketplace = %marketplace,
            delta,
            quantity = record.quantity,
            "Inventory updated"
        );

        if delta.abs() > self.inner.config.simulator.notify_threshold {
            let direction = if delta > 0 { "increased" } else { "decreased" };
            self.notify(
                Notification::success(format!("Inventory synced: {} on {}", sku, marketplace))
                    .with_description(format!("Quantity {} by {}", direction, delta.abs())),
            );
        }

        Ok(record)
    }

    /// One simulator tick: random key, random delta, then `update_inventory`.
    pub async fn simulate_inventory_update(&self) -> SyncResult<InventoryRecord> {
        let catalog = &self.inner.config.catalog;
        let random = self.random();

        let sku = &catalog.skus[random.pick_index(catalog.skus.len())];
        let marketplace = &catalog.marketplaces[random.pick_index(catalog.marketplaces.len())];
        let delta = random.quantity_delta(self.inner.config.simulator.max_quantity_delta);

        self.update_inventory(sku, marketplace, delta).await
    }

    /// Syncs every record on `marketplace`, or every record when `None`.
    ///
    /// Records are resolved one after another, each after a random delay.
    /// The targets are exactly the records marked `syncing`; every one of
    /// them is terminal when this returns.
    pub async fn manual_sync(&self, marketplace: Option<&str>) -> SyncResult<SyncReport> {
        if let Some(name) = marketplace {
            validate_marketplace(name)?;
        }

        let storage = &self.inner.storage;
        let settings = &self.inner.config.manual_sync;

        let marked = storage.inventory().mark_syncing(marketplace).await?;
        let targets: Vec<RecordKey> = inventory::select(&marked, marketplace)
            .into_iter()
            .map(InventoryRecord::key)
            .collect();

        self.notify(Notification::info(match marketplace {
            Some(name) => format!("Syncing inventory for {}...", name),
            None => "Syncing inventory across all marketplaces...".to_string(),
        }));

        info!(
            marketplace = marketplace.unwrap_or("all"),
            count = targets.len(),
            "Manual sync started"
        );

        let mut report = SyncReport {
            attempted: targets.len(),
            ..SyncReport::default()
        };

        for key in &targets {
            let delay = self
                .random()
                .delay_ms(settings.min_delay_ms, settings.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            let outcome = if self.random().chance(settings.failure_probability) {
                report.failed += 1;
                SyncOutcome::Failed(BULK_SYNC_ERROR.to_string())
            } else {
                report.synced += 1;
                SyncOutcome::Synced
            };

            storage
                .inventory()
                .resolve(&key.sku, &key.marketplace, &outcome, Utc::now())
                .await?;
            storage.stats().record(&outcome).await?;

            if outcome.is_success() {
                debug!(key = %key, "Record synced");
            } else {
                warn!(key = %key, "Record sync failed");
            }
        }

        storage.stats().touch_last_sync(Utc::now()).await?;

        self.notify(Notification::success("Inventory sync completed").with_description(format!(
            "{} synced, {} failed",
            report.synced, report.failed
        )));

        info!(
            attempted = report.attempted,
            synced = report.synced,
            failed = report.failed,
            "Manual sync completed"
        );

        Ok(report)
    }

    /// Retries one record once.
    ///
    /// The record passes through `syncing` with its error cleared, then ends
    /// `synced` or `error("Retry failed")`.
    pub async fn retry_failed_sync(&self, sku: &str, marketplace: &str) -> SyncResult<SyncOutcome> {
        validate_sku(sku)?;
        validate_marketplace(marketplace)?;

        let storage = &self.inner.storage;
        let settings = &self.inner.config.retry;

        inventory::require(&storage.inventory().get().await?, sku, marketplace)?;

        storage.inventory().begin_retry(sku, marketplace).await?;
        tokio::time::sleep(settings.delay()).await;

        let outcome = if self.random().chance(settings.success_probability) {
            SyncOutcome::Synced
        } else {
            SyncOutcome::Failed(RETRY_ERROR.to_string())
        };

        storage
            .inventory()
            .resolve(sku, marketplace, &outcome, Utc::now())
            .await?;
        storage.stats().record(&outcome).await?;

        match &outcome {
            SyncOutcome::Synced => {
                info!(sku = %sku, marketplace = %marketplace, "Retry succeeded");
                self.notify(Notification::success(format!(
                    "Retry successful for {} on {}",
                    sku, marketplace
                )));
            }
            SyncOutcome::Failed(_) => {
                warn!(sku = %sku, marketplace = %marketplace, "Retry failed");
                self.notify(Notification::error(format!(
                    "Retry failed for {} on {}",
                    sku, marketplace
                )));
            }
        }

        Ok(outcome)
    }

    /// Appends one simulated marketplace event to the activity feed.
    pub async fn simulate_activity(&self) -> SyncResult<SyncActivity> {
        let catalog = &self.inner.config.catalog;
        let settings = &self.inner.config.activity;
        let random = self.random();

        let is_error = random.chance(settings.error_probability);
        let (kind, action, details) = if is_error {
            (
                ActivityKind::Error,
                ACTIVITY_ERROR_ACTION.to_string(),
                Some(ACTIVITY_ERROR_DETAILS.to_string()),
            )
        } else {
            let action = ACTIVITY_ACTIONS[random.pick_index(ACTIVITY_ACTIONS.len())];
            (ActivityKind::Sync, action.to_string(), None)
        };

        let marketplace = catalog.marketplaces[random.pick_index(catalog.marketplaces.len())].clone();
        let sku = catalog.skus[random.pick_index(catalog.skus.len())].clone();

        let quantity_change = random
            .chance(settings.quantity_change_probability)
            .then(|| random.quantity_delta(self.inner.config.simulator.max_quantity_delta));

        let activity = SyncActivity::new(kind, marketplace, sku, action, Utc::now())
            .with_details(details)
            .with_quantity_change(quantity_change);

        let len = self.inner.storage.activity().push(activity.clone()).await?;
        debug!(action = %activity.action, sku = %activity.sku, feed_len = len, "Activity recorded");

        Ok(activity)
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::notify::RecordingNotifier;
    use crate::random::{ScriptedRandom, SeededRandom};
    use goodlink_core::{NotificationLevel, SyncStatus, MAX_ACTIVITY_ENTRIES};
    use goodlink_store::repository::INVENTORY_KEY;
    use goodlink_store::{KeyValueStore, KvStore, MemoryKv};

    async fn engine(random: impl SyncRandom + 'static) -> (InventorySync, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = InventorySync::with_parts(
            SyncConfig::default(),
            Storage::in_memory(),
            Arc::new(random),
            notifier.clone(),
        );
        engine.connect().await.unwrap();
        (engine, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_seeds_empty_store() {
        let (engine, _) = engine(ScriptedRandom::new()).await;

        let records = engine.inventory().await.unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].key(), RecordKey::new("GL-001", "Amazon"));
        assert!(engine.is_connected());

        assert!(!engine.connect().await.unwrap());
        assert_eq!(engine.inventory().await.unwrap().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_all_marketplaces() {
        let (engine, notifier) = engine(ScriptedRandom::new()).await;

        let report = engine.manual_sync(None).await.unwrap();
        assert_eq!(report, SyncReport { attempted: 6, synced: 6, failed: 0 });

        for record in engine.inventory().await.unwrap() {
            assert_eq!(record.status, SyncStatus::Synced);
            assert!(record.error.is_none());
        }

        let status = engine.status().await.unwrap();
        assert_eq!(status.stats.total_synced, 6);
        assert!(status.last_sync_time.is_some());
        assert_eq!(status.metrics.sync_rate, 100);
        assert_eq!(status.health, ConnectionHealth::Connected);

        assert_eq!(
            notifier.titles(),
            vec![
                "Syncing inventory across all marketplaces...",
                "Inventory sync completed"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_filter_touches_only_matching() {
        let random = ScriptedRandom::new().with_chances([false, true, false]);
        let (engine, notifier) = engine(random).await;
        let before = engine.inventory().await.unwrap();

        let report = engine.manual_sync(Some("Amazon")).await.unwrap();
        assert_eq!(report, SyncReport { attempted: 3, synced: 2, failed: 1 });

        let after = engine.inventory().await.unwrap();
        for (old, new) in before.iter().zip(after.iter()) {
            if new.marketplace == "Amazon" {
                assert!(new.status.is_terminal());
            } else {
                assert_eq!(old, new);
            }
        }

        let failed = inventory::find(&after, "GL-002", "Amazon").unwrap();
        assert_eq!(failed.status, SyncStatus::Error);
        assert_eq!(failed.error.as_deref(), Some("Connection timeout"));

        let stats = engine.status().await.unwrap().stats;
        assert_eq!(stats.total_synced, 2);
        assert_eq!(stats.errors, 1);

        assert_eq!(notifier.titles()[0], "Syncing inventory for Amazon...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_marks_syncing_first() {
        let (engine, _) = engine(ScriptedRandom::new().with_delays([1500, 1500, 1500])).await;

        let task = tokio::spawn({
            let engine = engine.clone();
            async move { engine.manual_sync(Some("Amazon")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let records = engine.inventory().await.unwrap();
        for record in inventory::select(&records, Some("Amazon")) {
            assert_eq!(record.status, SyncStatus::Syncing);
        }
        let otto = inventory::find(&records, "GL-002", "OTTO").unwrap();
        assert_eq!(otto.status, SyncStatus::Error);

        task.await.unwrap().unwrap();
        let records = engine.inventory().await.unwrap();
        assert!(inventory::select(&records, Some("Amazon"))
            .iter()
            .all(|r| r.status.is_terminal()));
    }

    /// Backend that upserts `GL-004/Amazon` during the n-th read of the
    /// inventory key once armed, as a concurrent simulator tick would.
    struct InterleavingKv {
        inner: Arc<MemoryKv>,
        armed: AtomicBool,
        reads: std::sync::atomic::AtomicUsize,
        inject_at: usize,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for InterleavingKv {
        async fn get_raw(&self, key: &str) -> goodlink_store::StoreResult<Option<String>> {
            if key == INVENTORY_KEY && self.armed.load(Ordering::SeqCst) {
                let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
                if read == self.inject_at {
                    KvStore::new(self.inner.clone())
                        .update(INVENTORY_KEY, Vec::new(), |records| {
                            inventory::upsert(records, "GL-004", "Amazon", 3, Utc::now())
                        })
                        .await?;
                }
            }
            self.inner.get_raw(key).await
        }

        async fn set_raw(&self, key: &str, value: &str) -> goodlink_store::StoreResult<()> {
            self.inner.set_raw(key, value).await
        }
    }

    async fn interleaved_manual_sync(inject_at: usize) -> (SyncReport, Vec<InventoryRecord>) {
        let backend = Arc::new(InterleavingKv {
            inner: Arc::new(MemoryKv::new()),
            armed: AtomicBool::new(false),
            reads: Default::default(),
            inject_at,
        });
        let engine = InventorySync::with_parts(
            SyncConfig::default(),
            Storage::from_kv(KvStore::new(backend.clone())),
            Arc::new(ScriptedRandom::new()),
            Arc::new(RecordingNotifier::new()),
        );
        engine.connect().await.unwrap();

        backend.armed.store(true, Ordering::SeqCst);
        let report = engine.manual_sync(Some("Amazon")).await.unwrap();
        (report, engine.inventory().await.unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_resolves_record_created_before_mark() {
        let (report, records) = interleaved_manual_sync(1).await;

        assert_eq!(report, SyncReport { attempted: 4, synced: 4, failed: 0 });
        let created = inventory::find(&records, "GL-004", "Amazon").unwrap();
        assert_eq!(created.status, SyncStatus::Synced);
        assert!(records.iter().all(|r| r.status != SyncStatus::Syncing));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_leaves_nothing_syncing_under_concurrent_upsert() {
        for inject_at in 2..=4 {
            let (report, records) = interleaved_manual_sync(inject_at).await;

            assert_eq!(report.attempted, 3, "upsert at read {}", inject_at);
            let stuck: Vec<String> = records
                .iter()
                .filter(|r| r.status == SyncStatus::Syncing)
                .map(|r| r.key().to_string())
                .collect();
            assert!(stuck.is_empty(), "upsert at read {} left {:?}", inject_at, stuck);
            assert!(inventory::find(&records, "GL-004", "Amazon").is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_unknown_marketplace_is_empty_run() {
        let (engine, _) = engine(ScriptedRandom::new()).await;
        let before = engine.inventory().await.unwrap();

        let report = engine.manual_sync(Some("Cdiscount")).await.unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(engine.inventory().await.unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_passes_through_syncing() {
        let (engine, notifier) = engine(ScriptedRandom::new().with_chances([true])).await;

        let task = tokio::spawn({
            let engine = engine.clone();
            async move { engine.retry_failed_sync("GL-002", "OTTO").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let record = inventory::find(&engine.inventory().await.unwrap(), "GL-002", "OTTO")
            .cloned()
            .unwrap();
        assert_eq!(record.status, SyncStatus::Syncing);
        assert!(record.error.is_none());

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, SyncOutcome::Synced);

        let record = inventory::find(&engine.inventory().await.unwrap(), "GL-002", "OTTO")
            .cloned()
            .unwrap();
        assert_eq!(record.status, SyncStatus::Synced);
        assert!(record.error.is_none());
        assert_eq!(notifier.titles(), vec!["Retry successful for GL-002 on OTTO"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_of_synced_record_passes_through_syncing() {
        let (engine, _) = engine(ScriptedRandom::new().with_chances([false])).await;
        let before = inventory::find(&engine.inventory().await.unwrap(), "GL-001", "Amazon")
            .cloned()
            .unwrap();
        assert_eq!(before.status, SyncStatus::Synced);

        let task = tokio::spawn({
            let engine = engine.clone();
            async move { engine.retry_failed_sync("GL-001", "Amazon").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let record = inventory::find(&engine.inventory().await.unwrap(), "GL-001", "Amazon")
            .cloned()
            .unwrap();
        assert_eq!(record.status, SyncStatus::Syncing);

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, SyncOutcome::Failed("Retry failed".into()));

        let record = inventory::find(&engine.inventory().await.unwrap(), "GL-001", "Amazon")
            .cloned()
            .unwrap();
        assert_eq!(record.status, SyncStatus::Error);
        assert_eq!(record.error.as_deref(), Some("Retry failed"));
        assert_eq!(record.quantity, before.quantity);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_failure_replaces_error_message() {
        let (engine, notifier) = engine(ScriptedRandom::new().with_chances([false])).await;

        let outcome = engine.retry_failed_sync("GL-002", "OTTO").await.unwrap();
        assert_eq!(outcome, SyncOutcome::Failed("Retry failed".into()));

        let record = inventory::find(&engine.inventory().await.unwrap(), "GL-002", "OTTO")
            .cloned()
            .unwrap();
        assert_eq!(record.status, SyncStatus::Error);
        assert_eq!(record.error.as_deref(), Some("Retry failed"));

        let status = engine.status().await.unwrap();
        assert_eq!(status.stats.errors, 1);
        assert_eq!(status.health, ConnectionHealth::ConnectedWithErrors);

        let last = notifier.notifications().pop().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.title, "Retry failed for GL-002 on OTTO");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_rate() {
        let (engine, _) = engine(SeededRandom::new(2024)).await;

        let trials = 1000;
        let mut successes = 0;
        for _ in 0..trials {
            if engine
                .retry_failed_sync("GL-001", "Amazon")
                .await
                .unwrap()
                .is_success()
            {
                successes += 1;
            }
        }

        let rate = successes as f64 / trials as f64;
        assert!((rate - 0.70).abs() < 0.05, "success rate was {}", rate);

        let stats = engine.status().await.unwrap().stats;
        assert_eq!(stats.total_synced + stats.errors, trials);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_unknown_record() {
        let (engine, _) = engine(ScriptedRandom::new()).await;

        let err = engine.retry_failed_sync("GL-005", "OTTO").await.unwrap_err();
        assert!(matches!(err, SyncError::RecordNotFound { .. }));

        let err = engine.retry_failed_sync("", "OTTO").await.unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_inventory_clamps_and_counts() {
        let (engine, notifier) = engine(ScriptedRandom::new()).await;

        let record = engine.update_inventory("GL-003", "bol.com", -50).await.unwrap();
        assert_eq!(record.quantity, 0);
        assert_eq!(record.status, SyncStatus::Synced);

        let record = engine.update_inventory("GL-001", "Amazon", 3).await.unwrap();
        assert_eq!(record.quantity, 48);

        let status = engine.status().await.unwrap();
        assert_eq!(status.stats.total_synced, 2);
        assert!(status.last_sync_time.is_some());

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Inventory synced: GL-003 on bol.com");
        assert_eq!(
            notifications[0].description.as_deref(),
            Some("Quantity decreased by 50")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_update_creates_new_record() {
        let random = ScriptedRandom::new().with_indices([4, 3]).with_deltas([-5]);
        let (engine, notifier) = engine(random).await;

        let record = engine.simulate_inventory_update().await.unwrap();
        assert_eq!(record.key(), RecordKey::new("GL-005", "Kaufland"));
        assert_eq!(record.quantity, 45);

        let records = engine.inventory().await.unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records.last().unwrap().sku, "GL-005");
        assert_eq!(
            notifier.notifications()[0].description.as_deref(),
            Some("Quantity decreased by 5")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_activity_entries() {
        let random = ScriptedRandom::new()
            .with_chances([true, false, false, true])
            .with_indices([2, 0, 2, 4, 4])
            .with_deltas([-2]);
        let (engine, _) = engine(random).await;

        let error = engine.simulate_activity().await.unwrap();
        assert_eq!(error.kind, ActivityKind::Error);
        assert_eq!(error.action, "Sync failed");
        assert_eq!(error.details.as_deref(), Some("API rate limit exceeded"));
        assert_eq!(error.marketplace, "OTTO");
        assert_eq!(error.sku, "GL-001");
        assert!(error.quantity_change.is_none());

        let sync = engine.simulate_activity().await.unwrap();
        assert_eq!(sync.kind, ActivityKind::Sync);
        assert_eq!(sync.action, "Listing refreshed");
        assert_eq!(sync.marketplace, "bol.com");
        assert_eq!(sync.sku, "GL-005");
        assert_eq!(sync.quantity_change, Some(-2));

        let feed = engine.activities().await.unwrap();
        assert_eq!(feed[0].id, sync.id);
        assert_eq!(feed[1].id, error.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_feed_capped() {
        let (engine, _) = engine(SeededRandom::new(9)).await;

        for _ in 0..(MAX_ACTIVITY_ENTRIES + 10) {
            engine.simulate_activity().await.unwrap();
        }
        assert_eq!(engine.activities().await.unwrap().len(), MAX_ACTIVITY_ENTRIES);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_changes_health() {
        let (engine, _) = engine(ScriptedRandom::new()).await;
        engine.disconnect();

        let status = engine.status().await.unwrap();
        assert!(!status.is_connected);
        assert_eq!(status.health, ConnectionHealth::Disconnected);
        assert_eq!(status.last_sync_label(Utc::now()), "Never");
    }
}
