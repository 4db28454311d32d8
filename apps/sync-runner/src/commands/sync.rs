//! # Sync Commands
//!
//! Status, manual sync and retry.

use chrono::Utc;
use serde::Serialize;

use goodlink_core::{RecordKey, SyncMetrics, SyncOutcome};
use goodlink_sync::SyncReport;

use crate::error::ApiError;
use crate::state::SyncState;

/// Status as shown by the `status` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusDto {
    /// "Connected", "Connected (With Errors)" or "Disconnected"
    pub connection_state: String,

    /// "Never", "Just now", "5m ago", ...
    pub last_sync: String,

    /// Last sync timestamp (ISO8601)
    pub last_sync_at: Option<String>,

    pub total_synced: u64,
    pub errors: u64,
    pub pending: u64,

    pub metrics: SyncMetrics,
}

impl std::fmt::Display for SyncStatusDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = &self.metrics;
        writeln!(f, "Connection:  {}", self.connection_state)?;
        writeln!(f, "Last sync:   {}", self.last_sync)?;
        writeln!(
            f,
            "Records:     {} total, {} synced, {} pending, {} error, {} syncing ({}% synced)",
            m.total_items, m.synced_items, m.pending_items, m.error_items, m.syncing_items, m.sync_rate
        )?;
        write!(
            f,
            "Counters:    {} synced, {} errors, {} pending",
            self.total_synced, self.errors, self.pending
        )
    }
}

/// Result of the `retry` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryResultDto {
    pub key: RecordKey,
    pub success: bool,
    pub error: Option<String>,
}

impl std::fmt::Display for RetryResultDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            None => write!(f, "Retry successful for {}", self.key),
            Some(message) => write!(f, "Retry failed for {}: {}", self.key, message),
        }
    }
}

/// Gets the current sync status.
pub async fn get_sync_status(sync: &SyncState) -> Result<SyncStatusDto, ApiError> {
    let snapshot = sync.engine().status().await?;

    Ok(SyncStatusDto {
        connection_state: snapshot.health.to_string(),
        last_sync: snapshot.last_sync_label(Utc::now()),
        last_sync_at: snapshot.last_sync_time.map(|t| t.to_rfc3339()),
        total_synced: snapshot.stats.total_synced,
        errors: snapshot.stats.errors,
        pending: snapshot.stats.pending,
        metrics: snapshot.metrics,
    })
}

/// Runs a manual sync, optionally limited to one marketplace.
pub async fn sync_inventory(
    sync: &SyncState,
    marketplace: Option<String>,
) -> Result<SyncReport, ApiError> {
    Ok(sync.engine().manual_sync(marketplace.as_deref()).await?)
}

/// Retries one record.
pub async fn retry_sync(
    sync: &SyncState,
    sku: String,
    marketplace: String,
) -> Result<RetryResultDto, ApiError> {
    let outcome = sync.engine().retry_failed_sync(&sku, &marketplace).await?;

    let error = match outcome {
        SyncOutcome::Synced => None,
        SyncOutcome::Failed(message) => Some(message),
    };

    Ok(RetryResultDto {
        key: RecordKey::new(sku, marketplace),
        success: error.is_none(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use goodlink_store::Storage;
    use goodlink_sync::{ScriptedRandom, SyncConfig};
    use std::sync::Arc;

    async fn state(random: ScriptedRandom) -> SyncState {
        let mut config = SyncConfig::default();
        config.simulator.enabled = false;
        config.activity.enabled = false;

        let state = SyncState::with_random(config, Storage::in_memory(), Arc::new(random));
        state.mount().await.unwrap();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_before_any_sync() {
        let state = state(ScriptedRandom::new()).await;
        let status = get_sync_status(&state).await.unwrap();

        assert_eq!(status.connection_state, "Connected");
        assert_eq!(status.last_sync, "Never");
        assert!(status.last_sync_at.is_none());
        assert_eq!(status.metrics.total_items, 6);
        assert_eq!(status.metrics.sync_rate, 67);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_then_status() {
        let state = state(ScriptedRandom::new().with_chances([true])).await;

        let report = sync_inventory(&state, Some("OTTO".into())).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);

        let status = get_sync_status(&state).await.unwrap();
        assert_eq!(status.connection_state, "Connected (With Errors)");
        assert_eq!(status.last_sync, "Just now");
        assert_eq!(status.errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_reports_outcome() {
        let state = state(ScriptedRandom::new().with_chances([false])).await;

        let result = retry_sync(&state, "GL-002".into(), "OTTO".into()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Retry failed"));
        assert_eq!(result.to_string(), "Retry failed for GL-002 on OTTO: Retry failed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_unknown_record() {
        let state = state(ScriptedRandom::new()).await;

        let err = retry_sync(&state, "GL-004".into(), "OTTO".into()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
