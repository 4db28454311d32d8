//! # Domain Types
//!
//! Core domain types used throughout the Goodlink sync engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryRecord │   │   SyncStats     │   │  SyncActivity   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku        ┐   │   │  total_synced   │   │  id (UUID)      │       │
//! │  │  marketplace┘key│   │  errors         │   │  kind           │       │
//! │  │  quantity (≥0)  │   │  pending        │   │  sku/marketplace│       │
//! │  │  status         │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SyncStatus    │   │   SyncOutcome   │   │  Notification   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Synced         │   │  Synced         │   │  level          │       │
//! │  │  Pending        │   │  Failed(msg)    │   │  title          │       │
//! │  │  Error          │   └─────────────────┘   │  description    │       │
//! │  │  Syncing        │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All persisted types serialize with camelCase field names so the stored
//! JSON matches what the dashboard reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Sync Status
// =============================================================================

/// Sync status of a single inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Quantity is in sync with the marketplace.
    #[default]
    Synced,
    /// Waiting for a sync attempt.
    Pending,
    /// The last attempt failed; see the record's `error`.
    Error,
    /// An attempt is in flight.
    Syncing,
}

impl SyncStatus {
    /// Returns true for the two states an attempt can end in.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Synced | SyncStatus::Error)
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Pending => write!(f, "pending"),
            SyncStatus::Error => write!(f, "error"),
            SyncStatus::Syncing => write!(f, "syncing"),
        }
    }
}

// =============================================================================
// Record Key
// =============================================================================

/// Unique identity of an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordKey {
    pub sku: String,
    pub marketplace: String,
}

impl RecordKey {
    pub fn new(sku: impl Into<String>, marketplace: impl Into<String>) -> Self {
        RecordKey {
            sku: sku.into(),
            marketplace: marketplace.into(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.sku, self.marketplace)
    }
}

// =============================================================================
// Inventory Record
// =============================================================================

/// Quantity of one SKU as tracked against one marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    /// Stock keeping unit.
    pub sku: String,

    /// Sales channel the quantity is tracked against.
    pub marketplace: String,

    /// Units on hand. Never negative.
    pub quantity: u32,

    /// When the record was last touched by a sync or mutation.
    #[ts(as = "String")]
    pub last_synced: DateTime<Utc>,

    pub status: SyncStatus,

    /// Message from the last failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InventoryRecord {
    /// Creates a `synced` record.
    pub fn new(
        sku: impl Into<String>,
        marketplace: impl Into<String>,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Self {
        InventoryRecord {
            sku: sku.into(),
            marketplace: marketplace.into(),
            quantity,
            last_synced: now,
            status: SyncStatus::Synced,
            error: None,
        }
    }

    /// Sets the status (builder style, used for seed data).
    pub fn with_status(mut self, status: SyncStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the error message (builder style, used for seed data).
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns the record key.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.sku.clone(), self.marketplace.clone())
    }

    /// Checks whether this record has the given key.
    #[inline]
    pub fn has_key(&self, sku: &str, marketplace: &str) -> bool {
        self.sku == sku && self.marketplace == marketplace
    }

    /// Checks whether this record is selected by an optional marketplace filter.
    #[inline]
    pub fn matches_marketplace(&self, filter: Option<&str>) -> bool {
        filter.map_or(true, |m| self.marketplace == m)
    }
}

// =============================================================================
// Sync Outcome
// =============================================================================

/// Result of one simulated sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "message")]
pub enum SyncOutcome {
    Synced,
    Failed(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }
}

// =============================================================================
// Sync Stats
// =============================================================================

/// Rolling sync counters.
///
/// These only ever go up and are not derived from the record list, so they
/// can disagree with the number of `synced`/`error` records in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub total_synced: u64,
    pub errors: u64,
    pub pending: u64,
}

impl SyncStats {
    /// Returns the stats with the counter matching `outcome` incremented.
    pub fn record(self, outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Synced => SyncStats {
                total_synced: self.total_synced + 1,
                ..self
            },
            SyncOutcome::Failed(_) => SyncStats {
                errors: self.errors + 1,
                ..self
            },
        }
    }
}

// =============================================================================
// Activity Feed
// =============================================================================

/// Kind of a live activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Sync,
    Update,
    Error,
}

/// One entry of the live marketplace activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncActivity {
    pub id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub marketplace: String,
    pub sku: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_change: Option<i64>,
}

impl SyncActivity {
    /// Creates an entry with a fresh v4 id.
    pub fn new(
        kind: ActivityKind,
        marketplace: impl Into<String>,
        sku: impl Into<String>,
        action: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        SyncActivity {
            id: Uuid::new_v4().to_string(),
            timestamp,
            kind,
            marketplace: marketplace.into(),
            sku: sku.into(),
            action: action.into(),
            details: None,
            quantity_change: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_quantity_change(mut self, change: Option<i64>) -> Self {
        self.quantity_change = change;
        self
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A user-visible notification (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title)
    }

    fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Notification {
            level,
            title: title.into(),
            description: None,
        }
    }

    /// Adds a description line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SyncStatus::Syncing).unwrap();
        assert_eq!(json, "\"syncing\"");
        assert!(SyncStatus::Error.is_terminal());
        assert!(!SyncStatus::Pending.is_terminal());
    }

    #[test]
    fn test_record_json_shape() {
        let record = InventoryRecord::new("GL-001", "Amazon", 45, Utc::now());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["sku"], "GL-001");
        assert_eq!(value["status"], "synced");
        assert!(value.get("lastSynced").is_some());
        // No error key when the record is healthy
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_marketplace_filter() {
        let record = InventoryRecord::new("GL-001", "eBay", 1, Utc::now());
        assert!(record.matches_marketplace(None));
        assert!(record.matches_marketplace(Some("eBay")));
        assert!(!record.matches_marketplace(Some("Amazon")));
    }

    #[test]
    fn test_stats_record_outcome() {
        let stats = SyncStats::default()
            .record(&SyncOutcome::Synced)
            .record(&SyncOutcome::Synced)
            .record(&SyncOutcome::Failed("Retry failed".into()));

        assert_eq!(stats.total_synced, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_activity_kind_field_name() {
        let activity = SyncActivity::new(ActivityKind::Error, "OTTO", "GL-002", "Sync failed", Utc::now())
            .with_quantity_change(Some(-3));
        assert_eq!(Uuid::parse_str(&activity.id).unwrap().get_version_num(), 4);

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["quantityChange"], -3);
    }
}
