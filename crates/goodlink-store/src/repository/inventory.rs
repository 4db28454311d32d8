//! # Inventory Repository
//!
//! The persisted, ordered list of `(sku, marketplace)` records.
//!
//! Every write replaces the whole list with the output of a reducer from
//! [`goodlink_core::inventory`]; records are never deleted.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use goodlink_core::inventory;
use goodlink_core::{InventoryRecord, SyncOutcome};

use super::INVENTORY_KEY;
use crate::error::StoreResult;
use crate::kv::KvStore;

/// Repository for inventory records.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    kv: KvStore,
}

impl InventoryRepository {
    pub fn new(kv: KvStore) -> Self {
        InventoryRepository { kv }
    }

    /// Returns all records in insertion order.
    pub async fn get(&self) -> StoreResult<Vec<InventoryRecord>> {
        self.kv.get(INVENTORY_KEY, Vec::new()).await
    }

    /// Looks up one record by key.
    pub async fn find(&self, sku: &str, marketplace: &str) -> StoreResult<Option<InventoryRecord>> {
        let records = self.get().await?;
        Ok(inventory::find(&records, sku, marketplace).cloned())
    }

    /// Writes the sample records if the store is empty.
    ///
    /// ## Returns
    /// `true` when the seed set was written.
    pub async fn seed_if_empty(&self, now: DateTime<Utc>) -> StoreResult<bool> {
        let mut seeded = false;

        self.kv
            .update(INVENTORY_KEY, Vec::new(), |records: Vec<InventoryRecord>| {
                seeded = records.is_empty();
                inventory::seed_if_empty(records, now)
            })
            .await?;

        if seeded {
            info!("Seeded inventory store with sample records");
        }
        Ok(seeded)
    }

    /// Adjusts a record's quantity by `delta`, creating it when absent.
    pub async fn upsert(
        &self,
        sku: &str,
        marketplace: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<InventoryRecord>> {
        debug!(sku = %sku, marketplace = %marketplace, delta, "Upserting inventory record");

        self.kv
            .update(INVENTORY_KEY, Vec::new(), |records| {
                inventory::upsert(records, sku, marketplace, delta, now)
            })
            .await
    }

    /// Marks all records selected by `filter` as `syncing`.
    pub async fn mark_syncing(&self, filter: Option<&str>) -> StoreResult<Vec<InventoryRecord>> {
        self.kv
            .update(INVENTORY_KEY, Vec::new(), |records| {
                inventory::mark_syncing(records, filter)
            })
            .await
    }

    /// Marks one record `syncing` and clears its error.
    pub async fn begin_retry(&self, sku: &str, marketplace: &str) -> StoreResult<Vec<InventoryRecord>> {
        self.kv
            .update(INVENTORY_KEY, Vec::new(), |records| {
                inventory::begin_retry(records, sku, marketplace)
            })
            .await
    }

    /// Writes the terminal state of an attempt.
    pub async fn resolve(
        &self,
        sku: &str,
        marketplace: &str,
        outcome: &SyncOutcome,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<InventoryRecord>> {
        self.kv
            .update(INVENTORY_KEY, Vec::new(), |records| {
                inventory::resolve(records, sku, marketplace, outcome, now)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goodlink_core::SyncStatus;

    fn repo() -> InventoryRepository {
        InventoryRepository::new(KvStore::in_memory())
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let repo = repo();
        assert!(repo.get().await.unwrap().is_empty());

        assert!(repo.seed_if_empty(Utc::now()).await.unwrap());
        assert!(!repo.seed_if_empty(Utc::now()).await.unwrap());
        assert_eq!(repo.get().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_upsert_persists() {
        let repo = repo();
        repo.seed_if_empty(Utc::now()).await.unwrap();
        repo.upsert("GL-001", "Amazon", -50, Utc::now()).await.unwrap();

        let record = repo.find("GL-001", "Amazon").await.unwrap().unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[tokio::test]
    async fn test_retry_then_resolve() {
        let repo = repo();
        repo.seed_if_empty(Utc::now()).await.unwrap();

        repo.begin_retry("GL-002", "OTTO").await.unwrap();
        let record = repo.find("GL-002", "OTTO").await.unwrap().unwrap();
        assert_eq!(record.status, SyncStatus::Syncing);
        assert!(record.error.is_none());

        repo.resolve("GL-002", "OTTO", &SyncOutcome::Failed("Retry failed".into()), Utc::now())
            .await
            .unwrap();
        let record = repo.find("GL-002", "OTTO").await.unwrap().unwrap();
        assert_eq!(record.status, SyncStatus::Error);
        assert_eq!(record.error.as_deref(), Some("Retry failed"));
    }
}
