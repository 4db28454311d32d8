//! # Stats Repository
//!
//! Rolling sync counters and the global last-sync timestamp.

use chrono::{DateTime, Utc};

use goodlink_core::{SyncOutcome, SyncStats};

use super::{LAST_SYNC_KEY, STATS_KEY};
use crate::error::StoreResult;
use crate::kv::KvStore;

/// Repository for sync statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    kv: KvStore,
}

impl StatsRepository {
    pub fn new(kv: KvStore) -> Self {
        StatsRepository { kv }
    }

    /// Returns the current counters (all zero if never written).
    pub async fn get(&self) -> StoreResult<SyncStats> {
        self.kv.get(STATS_KEY, SyncStats::default()).await
    }

    /// Increments the counter matching `outcome`.
    pub async fn record(&self, outcome: &SyncOutcome) -> StoreResult<SyncStats> {
        self.kv
            .update(STATS_KEY, SyncStats::default(), |stats| stats.record(outcome))
            .await
    }

    /// Returns when the last sync finished, if ever.
    pub async fn last_sync_time(&self) -> StoreResult<Option<DateTime<Utc>>> {
        self.kv.get(LAST_SYNC_KEY, None).await
    }

    /// Stamps the global last-sync time.
    pub async fn touch_last_sync(&self, now: DateTime<Utc>) -> StoreResult<()> {
        self.kv.set(LAST_SYNC_KEY, &Some(now)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_accumulate() {
        let repo = StatsRepository::new(KvStore::in_memory());

        repo.record(&SyncOutcome::Synced).await.unwrap();
        repo.record(&SyncOutcome::Failed("Connection timeout".into()))
            .await
            .unwrap();
        let stats = repo.record(&SyncOutcome::Synced).await.unwrap();

        assert_eq!(stats.total_synced, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(repo.get().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn test_last_sync_time() {
        let repo = StatsRepository::new(KvStore::in_memory());
        assert!(repo.last_sync_time().await.unwrap().is_none());

        let now = Utc::now();
        repo.touch_last_sync(now).await.unwrap();
        assert_eq!(repo.last_sync_time().await.unwrap(), Some(now));
    }
}
