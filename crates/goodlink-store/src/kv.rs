//! # Key-Value Store
//!
//! The persisted-state collaborator behind every repository.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Key-Value Layers                                     │
//! │                                                                         │
//! │  KvStore (typed)                                                       │
//! │  ├── get(key, default)          → T                                    │
//! │  ├── set(key, &value)                                                  │
//! │  └── update(key, default, f)    → T   (read-modify-write under lock)   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  dyn KeyValueStore (raw JSON text)                                     │
//! │  ├── SqliteKv   - kv_store table                                       │
//! │  └── MemoryKv   - HashMap, for tests and ephemeral runs                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `update` holds a single write lock for the whole read-modify-write, so a
//! reducer always sees the result of the previous one. Nothing coordinates
//! *between* two updates: that is the caller's problem.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::trace;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Raw Backend Trait
// =============================================================================

/// Raw string storage keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored JSON text, if any.
    async fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the stored JSON text.
    async fn set_raw(&self, key: &str, value: &str) -> StoreResult<()>;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Non-persistent backend.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// SQLite Backend
// =============================================================================

/// Backend over the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKv { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Typed Wrapper
// =============================================================================

/// Typed JSON access with atomic reducer updates.
///
/// Cheap to clone; clones share the backend and the write lock.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

impl KvStore {
    /// Wraps a backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        KvStore {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a store over a fresh [`MemoryKv`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKv::new()))
    }

    /// Reads `key`, returning `default` when it has never been written.
    pub async fn get<T>(&self, key: &str, default: T) -> StoreResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.read(key).await.map(|value| value.unwrap_or(default))
    }

    /// Replaces the value under `key`.
    pub async fn set<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let _guard = self.write_lock.lock().await;
        self.write(key, value).await
    }

    /// Applies `reducer` to the current value (or `default`) and stores the result.
    ///
    /// Returns the value that was written.
    pub async fn update<T, F>(&self, key: &str, default: T, reducer: F) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(T) -> T + Send,
    {
        let _guard = self.write_lock.lock().await;

        let current = self.read(key).await?.unwrap_or(default);
        let next = reducer(current);
        self.write(key, &next).await?;

        Ok(next)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.backend.get_raw(key).await? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::serialization(key, e)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) -> StoreResult<()> {
        let text = serde_json::to_string(value).map_err(|e| StoreError::serialization(key, e))?;
        trace!(key = %key, bytes = text.len(), "Writing key");
        self.backend.set_raw(key, &text).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn sqlite_store() -> KvStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        KvStore::new(Arc::new(SqliteKv::new(db.pool().clone())))
    }

    #[tokio::test]
    async fn test_get_returns_default_for_missing_key() {
        let kv = KvStore::in_memory();
        let value: Vec<u32> = kv.get("missing", vec![7]).await.unwrap();
        assert_eq!(value, vec![7]);
    }

    #[tokio::test]
    async fn test_update_applies_reducer_to_default() {
        let kv = KvStore::in_memory();
        let first = kv.update("counter", 0_u64, |n| n + 1).await.unwrap();
        let second = kv.update("counter", 0_u64, |n| n + 1).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(kv.get("counter", 0_u64).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let kv = KvStore::in_memory();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let kv = kv.clone();
                tokio::spawn(async move { kv.update("n", 0_u64, |n| n + 1).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(kv.get("n", 0_u64).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_sqlite_roundtrip_and_overwrite() {
        let kv = sqlite_store().await;

        kv.set("last-sync-time", &Some("2026-01-01T00:00:00Z".to_string()))
            .await
            .unwrap();
        kv.set("last-sync-time", &Some("2026-01-02T00:00:00Z".to_string()))
            .await
            .unwrap();

        let value: Option<String> = kv.get("last-sync-time", None).await.unwrap();
        assert_eq!(value.as_deref(), Some("2026-01-02T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_corrupt_value_reports_key() {
        let backend = Arc::new(MemoryKv::new());
        backend.set_raw("sync-stats", "{not json").await.unwrap();

        let kv = KvStore::new(backend);
        let err = kv.get("sync-stats", 0_u64).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { ref key, .. } if key == "sync-stats"));
    }
}
