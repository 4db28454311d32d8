//! # Inventory Reducers
//!
//! Pure functions that take the current record list and return the next one.
//!
//! ## Why Reducers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Whole-List Replacement                               │
//! │                                                                         │
//! │   store.update("inventory-items", |records| upsert(records, ...))      │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │   ┌───────────────┐        ┌───────────────┐                           │
//! │   │ Vec<Record> n │ ─────► │ Vec<Record>n+1│  (never patched in place) │
//! │   └───────────────┘        └───────────────┘                           │
//! │                                                                         │
//! │   The store applies one reducer at a time, so each call is atomic,    │
//! │   but two operations may still interleave between their updates.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are never removed and never reordered: new keys are appended.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{InventoryRecord, SyncOutcome, SyncStatus};
use crate::{BASE_QUANTITY, SEED_RATE_LIMIT_ERROR};

// =============================================================================
// Quantity Math
// =============================================================================

/// Applies `delta` to `quantity`, clamping at zero.
///
/// ## Example
/// ```rust
/// use goodlink_core::inventory::apply_delta;
///
/// assert_eq!(apply_delta(3, -5), 0);
/// assert_eq!(apply_delta(3, 4), 7);
/// ```
pub fn apply_delta(quantity: u32, delta: i64) -> u32 {
    let next = (quantity as i64).saturating_add(delta).max(0);
    u32::try_from(next).unwrap_or(u32::MAX)
}

// =============================================================================
// Seed
// =============================================================================

/// The sample records written when the store is empty.
pub fn seed_records(now: DateTime<Utc>) -> Vec<InventoryRecord> {
    vec![
        InventoryRecord::new("GL-001", "Amazon", 45, now),
        InventoryRecord::new("GL-001", "eBay", 23, now),
        InventoryRecord::new("GL-002", "Amazon", 67, now),
        InventoryRecord::new("GL-002", "OTTO", 34, now)
            .with_status(SyncStatus::Error)
            .with_error(SEED_RATE_LIMIT_ERROR),
        InventoryRecord::new("GL-003", "bol.com", 12, now),
        InventoryRecord::new("GL-003", "Amazon", 89, now).with_status(SyncStatus::Syncing),
    ]
}

/// Returns the seed set when `records` is empty, otherwise `records` untouched.
pub fn seed_if_empty(records: Vec<InventoryRecord>, now: DateTime<Utc>) -> Vec<InventoryRecord> {
    if records.is_empty() {
        seed_records(now)
    } else {
        records
    }
}

// =============================================================================
// Reducers
// =============================================================================

/// Adjusts the quantity of `(sku, marketplace)` by `delta`.
///
/// An existing record gets its quantity shifted (floored at 0), its
/// `last_synced` stamped and its status set to `synced`. A missing record is
/// appended with quantity `max(0, 50 + delta)`.
pub fn upsert(
    mut records: Vec<InventoryRecord>,
    sku: &str,
    marketplace: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> Vec<InventoryRecord> {
    match records.iter_mut().find(|r| r.has_key(sku, marketplace)) {
        Some(existing) => {
            existing.quantity = apply_delta(existing.quantity, delta);
            existing.last_synced = now;
            existing.status = SyncStatus::Synced;
        }
        None => {
            let quantity = apply_delta(0, BASE_QUANTITY + delta);
            records.push(InventoryRecord::new(sku, marketplace, quantity, now));
        }
    }
    records
}

/// Marks every record selected by `filter` as `syncing`.
///
/// Only the status changes; the error message and timestamp are kept until
/// the attempt resolves.
pub fn mark_syncing(mut records: Vec<InventoryRecord>, filter: Option<&str>) -> Vec<InventoryRecord> {
    for record in records.iter_mut().filter(|r| r.matches_marketplace(filter)) {
        record.status = SyncStatus::Syncing;
    }
    records
}

/// Marks one record as `syncing` and clears its error (start of a retry).
pub fn begin_retry(mut records: Vec<InventoryRecord>, sku: &str, marketplace: &str) -> Vec<InventoryRecord> {
    if let Some(record) = records.iter_mut().find(|r| r.has_key(sku, marketplace)) {
        record.status = SyncStatus::Syncing;
        record.error = None;
    }
    records
}

/// Writes the terminal state of one attempt onto `(sku, marketplace)`.
pub fn resolve(
    mut records: Vec<InventoryRecord>,
    sku: &str,
    marketplace: &str,
    outcome: &SyncOutcome,
    now: DateTime<Utc>,
) -> Vec<InventoryRecord> {
    if let Some(record) = records.iter_mut().find(|r| r.has_key(sku, marketplace)) {
        match outcome {
            SyncOutcome::Synced => {
                record.status = SyncStatus::Synced;
                record.error = None;
            }
            SyncOutcome::Failed(message) => {
                record.status = SyncStatus::Error;
                record.error = Some(message.clone());
            }
        }
        record.last_synced = now;
    }
    records
}

// =============================================================================
// Queries
// =============================================================================

/// Returns the records selected by an optional marketplace filter, in order.
pub fn select<'a>(records: &'a [InventoryRecord], filter: Option<&str>) -> Vec<&'a InventoryRecord> {
    records.iter().filter(|r| r.matches_marketplace(filter)).collect()
}

/// Looks up a record by key.
pub fn find<'a>(records: &'a [InventoryRecord], sku: &str, marketplace: &str) -> Option<&'a InventoryRecord> {
    records.iter().find(|r| r.has_key(sku, marketplace))
}

/// Like [`find`], but a missing key is a [`CoreError::RecordNotFound`].
pub fn require<'a>(
    records: &'a [InventoryRecord],
    sku: &str,
    marketplace: &str,
) -> CoreResult<&'a InventoryRecord> {
    find(records, sku, marketplace).ok_or_else(|| CoreError::RecordNotFound {
        sku: sku.to_string(),
        marketplace: marketplace.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
