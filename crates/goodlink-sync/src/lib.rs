//! # goodlink-sync: Simulated Inventory Sync Engine
//!
//! Drives the persisted inventory records through their sync states:
//! background quantity mutations, user-triggered bulk syncs and
//! single-record retries, all with simulated latency and failures.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          goodlink-sync                                  │
//! │                                                                         │
//! │   MutationSimulator ──┐                         ┌── ActivityFeed        │
//! │   (every 8s)          │                         │   (every 5-15s)       │
//! │                       ▼                         ▼                       │
//! │               ┌───────────────────────────────────────┐                 │
//! │   runner ────►│            InventorySync              │───► Notifier    │
//! │   sync/retry  │  manual_sync · retry_failed_sync ·    │                 │
//! │               │  update_inventory · status            │◄─── SyncRandom  │
//! │               └──────────────────┬────────────────────┘                 │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                        goodlink-store (Storage)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`engine`] - `InventorySync`, the sync operations
//! - [`simulator`] - periodic quantity mutations
//! - [`activity`] - live activity feed
//! - [`config`] - timing, probability and catalog settings
//! - [`random`] - injectable random source
//! - [`notify`] - notification sinks
//! - [`task`] - background task handle
//! - [`error`] - sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use goodlink_store::Storage;
//! use goodlink_sync::{InventorySync, MutationSimulator, SyncConfig};
//!
//! let config = SyncConfig::load_or_default(None);
//! let engine = InventorySync::new(config, Storage::in_memory());
//! engine.connect().await?;
//!
//! let simulator = MutationSimulator::spawn(engine.clone());
//! let report = engine.manual_sync(Some("Amazon")).await?;
//! println!("{} synced, {} failed", report.synced, report.failed);
//!
//! simulator.stop().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activity;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod random;
pub mod simulator;
pub mod task;

// =============================================================================
// Re-exports
// =============================================================================

pub use activity::ActivityFeed;
pub use config::SyncConfig;
pub use engine::{InventorySync, SyncReport, SyncSnapshot};
pub use error::{SyncError, SyncResult};
pub use notify::{BroadcastNotifier, NoOpNotifier, Notifier, TracingNotifier};
pub use random::{ScriptedRandom, SeededRandom, SyncRandom, ThreadRandom};
pub use simulator::MutationSimulator;
pub use task::TaskHandle;
