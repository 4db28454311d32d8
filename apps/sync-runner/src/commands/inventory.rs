//! # Inventory Commands
//!
//! Record listing and the live activity feed.

use goodlink_core::inventory;
use goodlink_core::validation::validate_marketplace;
use goodlink_core::{InventoryRecord, SyncActivity};

use crate::error::ApiError;
use crate::state::SyncState;

/// Default number of feed entries printed by `activity`.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// Lists records, optionally limited to one marketplace.
pub async fn list_inventory(
    sync: &SyncState,
    marketplace: Option<String>,
) -> Result<Vec<InventoryRecord>, ApiError> {
    if let Some(name) = &marketplace {
        validate_marketplace(name)?;
    }

    let records = sync.engine().inventory().await?;
    Ok(inventory::select(&records, marketplace.as_deref())
        .into_iter()
        .cloned()
        .collect())
}

/// Lists the newest activity entries.
pub async fn list_activities(
    sync: &SyncState,
    limit: Option<usize>,
) -> Result<Vec<SyncActivity>, ApiError> {
    let mut activities = sync.engine().activities().await?;
    activities.truncate(limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT));
    Ok(activities)
}

pub fn render_records(records: &[InventoryRecord]) -> String {
    if records.is_empty() {
        return "No inventory records".to_string();
    }

    let mut out = format!(
        "{:<8} {:<10} {:>5}  {:<8} {}\n",
        "SKU", "MARKET", "QTY", "STATUS", "LAST SYNCED"
    );
    for record in records {
        out.push_str(&format!(
            "{:<8} {:<10} {:>5}  {:<8} {}",
            record.sku,
            record.marketplace,
            record.quantity,
            record.status.to_string(),
            record.last_synced.format("%Y-%m-%d %H:%M:%S")
        ));
        if let Some(error) = &record.error {
            out.push_str(&format!("  ({})", error));
        }
        out.push('\n');
    }
    out.pop();
    out
}

pub fn render_activities(activities: &[SyncActivity]) -> String {
    if activities.is_empty() {
        return "No activity yet".to_string();
    }

    activities
        .iter()
        .map(|a| {
            let mut line = format!(
                "{} {:<6} {} on {}: {}",
                a.timestamp.format("%H:%M:%S"),
                format!("{:?}", a.kind).to_lowercase(),
                a.sku,
                a.marketplace,
                a.action
            );
            if let Some(change) = a.quantity_change {
                line.push_str(&format!(" ({:+})", change));
            }
            if let Some(details) = &a.details {
                line.push_str(&format!(" - {}", details));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
