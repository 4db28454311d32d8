//! # Sync Metrics
//!
//! Read-only figures derived from the record list and the rolling stats,
//! as shown on the sync dashboard cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{InventoryRecord, SyncStats, SyncStatus};

// =============================================================================
// Record Metrics
// =============================================================================

/// Per-status counts over the current record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetrics {
    pub total_items: usize,
    pub synced_items: usize,
    pub pending_items: usize,
    pub error_items: usize,
    pub syncing_items: usize,
    /// Percentage of records in `synced`, rounded. 100 when there are none.
    pub sync_rate: u8,
}

impl SyncMetrics {
    /// Counts records by status.
    pub fn from_records(records: &[InventoryRecord]) -> Self {
        let mut metrics = SyncMetrics {
            total_items: records.len(),
            ..Default::default()
        };

        for record in records {
            match record.status {
                SyncStatus::Synced => metrics.synced_items += 1,
                SyncStatus::Pending => metrics.pending_items += 1,
                SyncStatus::Error => metrics.error_items += 1,
                SyncStatus::Syncing => metrics.syncing_items += 1,
            }
        }

        metrics.sync_rate = if metrics.total_items == 0 {
            100
        } else {
            ((metrics.synced_items as f64 / metrics.total_items as f64) * 100.0).round() as u8
        };

        metrics
    }
}

// =============================================================================
// Connection Health
// =============================================================================

/// Label for the connection badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionHealth {
    Disconnected,
    ConnectedWithErrors,
    Connected,
}

impl ConnectionHealth {
    /// Errors are read from the rolling counters, not from record statuses.
    pub fn evaluate(is_connected: bool, stats: &SyncStats) -> Self {
        if !is_connected {
            ConnectionHealth::Disconnected
        } else if stats.errors > 0 {
            ConnectionHealth::ConnectedWithErrors
        } else {
            ConnectionHealth::Connected
        }
    }
}

impl std::fmt::Display for ConnectionHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionHealth::Disconnected => write!(f, "Disconnected"),
            ConnectionHealth::ConnectedWithErrors => write!(f, "Connected (With Errors)"),
            ConnectionHealth::Connected => write!(f, "Connected"),
        }
    }
}

// =============================================================================
// Time Since Last Sync
// =============================================================================

/// Formats the age of the last sync for display.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use goodlink_core::format_time_since;
///
/// let now = Utc::now();
/// assert_eq!(format_time_since(None, now), "Never");
/// assert_eq!(format_time_since(Some(now - Duration::minutes(5)), now), "5m ago");
/// ```
pub fn format_time_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return "Never".to_string();
    };

    let minutes = (now - last).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}
