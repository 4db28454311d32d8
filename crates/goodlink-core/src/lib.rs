//! # goodlink-core: Pure Domain Logic for Goodlink Inventory Sync
//!
//! This crate holds the inventory record model and every state transition
//! applied to it, written as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Goodlink Sync Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host (sync-runner)                           │   │
//! │  │     status ──► list ──► sync [marketplace] ──► retry            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    goodlink-sync (engine)                       │   │
//! │  │   simulator, manual sync, retry, activity feed                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ goodlink-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ inventory │  │  metrics  │  │ validation│  │   │
//! │  │   │  Record   │  │  reducers │  │ SyncRate  │  │   rules   │  │   │
//! │  │   │  Stats    │  │  seed     │  │  Health   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO RANDOMNESS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryRecord, SyncStats, SyncActivity, ...)
//! - [`inventory`] - Reducers over the record list and the seed set
//! - [`metrics`] - Derived counts, sync rate, connection health
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for record keys
//!
//! ## Example Usage
//!
//! ```rust
//! use goodlink_core::inventory;
//! use chrono::Utc;
//!
//! let records = inventory::seed_records(Utc::now());
//! let records = inventory::upsert(records, "GL-009", "Kaufland", -60, Utc::now());
//!
//! // New records start from the base quantity and are clamped at zero.
//! assert_eq!(records.last().unwrap().quantity, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod metrics;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use metrics::{format_time_since, ConnectionHealth, SyncMetrics};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Starting quantity for a record first created by an upsert.
pub const BASE_QUANTITY: i64 = 50;

/// Maximum number of entries kept in the live activity feed.
pub const MAX_ACTIVITY_ENTRIES: usize = 50;

/// Error message recorded when a bulk sync attempt fails.
pub const BULK_SYNC_ERROR: &str = "Connection timeout";

/// Error message recorded when a retry attempt fails.
pub const RETRY_ERROR: &str = "Retry failed";

/// Error message carried by the seeded `GL-002` / `OTTO` record.
pub const SEED_RATE_LIMIT_ERROR: &str = "API rate limit";
