//! # Storage Handle
//!
//! Owns the single [`KvStore`] shared by every repository, so that all
//! reducer updates go through the same write lock.
//!
//! ## Usage in the Engine
//! ```rust,ignore
//! let storage = Storage::open(DbConfig::new("./goodlink.db")).await?;
//! let records = storage.inventory().get().await?;
//! ```

use std::sync::Arc;
use tracing::info;

use crate::error::StoreResult;
use crate::kv::{KvStore, SqliteKv};
use crate::pool::{Database, DbConfig};
use crate::repository::activity::ActivityRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::stats::StatsRepository;

/// Repository access over one key-value store.
#[derive(Debug, Clone)]
pub struct Storage {
    kv: KvStore,
    database: Option<Database>,
}

impl Storage {
    /// Opens (and migrates) a SQLite-backed store.
    pub async fn open(config: DbConfig) -> StoreResult<Self> {
        let database = Database::new(config).await?;
        let kv = KvStore::new(Arc::new(SqliteKv::new(database.pool().clone())));

        info!("SQLite key-value store ready");
        Ok(Storage {
            kv,
            database: Some(database),
        })
    }

    /// Creates a non-persistent store (tests, dry runs).
    pub fn in_memory() -> Self {
        Storage {
            kv: KvStore::in_memory(),
            database: None,
        }
    }

    /// Wraps an existing typed store.
    pub fn from_kv(kv: KvStore) -> Self {
        Storage { kv, database: None }
    }

    /// Returns the underlying typed store.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Returns the inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.kv.clone())
    }

    /// Returns the stats repository.
    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.kv.clone())
    }

    /// Returns the activity feed repository.
    pub fn activity(&self) -> ActivityRepository {
        ActivityRepository::new(self.kv.clone())
    }

    /// Checks that the backend answers (always true in memory).
    pub async fn health_check(&self) -> bool {
        match &self.database {
            Some(db) => db.health_check().await,
            None => true,
        }
    }

    /// Closes the SQLite pool, if any.
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use goodlink_core::SyncOutcome;

    #[tokio::test]
    async fn test_repositories_share_one_store() {
        let storage = Storage::open(DbConfig::in_memory()).await.unwrap();
        assert!(storage.health_check().await);

        storage.inventory().seed_if_empty(Utc::now()).await.unwrap();
        storage.stats().record(&SyncOutcome::Synced).await.unwrap();

        // A second handle over the same kv sees the same data
        let other = Storage::from_kv(storage.kv().clone());
        assert_eq!(other.inventory().get().await.unwrap().len(), 6);
        assert_eq!(other.stats().get().await.unwrap().total_synced, 1);

        storage.close().await;
    }
}
