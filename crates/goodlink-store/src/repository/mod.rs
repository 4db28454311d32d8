//! # Repository Module
//!
//! Typed repositories over the key-value store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository → Key Mapping                             │
//! │                                                                         │
//! │  InventoryRepository ── "inventory-items"  Vec<InventoryRecord>         │
//! │  StatsRepository ────── "sync-stats"       SyncStats                    │
//! │                    └─── "last-sync-time"   Option<DateTime<Utc>>        │
//! │  ActivityRepository ─── "sync-activities"  Vec<SyncActivity>            │
//! │                                                                         │
//! │  Every mutation is a goodlink-core reducer passed to KvStore::update.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod activity;
pub mod inventory;
pub mod stats;

/// Key holding the ordered inventory record list.
pub const INVENTORY_KEY: &str = "inventory-items";

/// Key holding the global last-sync timestamp.
pub const LAST_SYNC_KEY: &str = "last-sync-time";

/// Key holding the rolling sync counters.
pub const STATS_KEY: &str = "sync-stats";

/// Key holding the live activity feed.
pub const ACTIVITY_KEY: &str = "sync-activities";
