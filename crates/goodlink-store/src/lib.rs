//! # goodlink-store: Persistence Layer for Goodlink Inventory Sync
//!
//! A generic key-value store with typed repositories for the inventory
//! records, sync counters, last-sync timestamp and activity feed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Goodlink Data Flow                               │
//! │                                                                         │
//! │  InventorySync::manual_sync (goodlink-sync)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  goodlink-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Storage     │    │  Repositories │    │  KvStore     │  │   │
//! │  │   │ (storage.rs)  │───►│ Inventory     │───►│ get / set /  │  │   │
//! │  │   │               │    │ Stats         │    │ update       │  │   │
//! │  │   │               │    │ Activity      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │                                                     │          │   │
//! │  └─────────────────────────────────────────────────────┼──────────┘   │
//! │                                                         ▼              │
//! │                        SQLite kv_store table  /  in-memory map         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use goodlink_store::{DbConfig, Storage};
//!
//! let storage = Storage::open(DbConfig::new("./goodlink.db")).await?;
//! storage.inventory().seed_if_empty(chrono::Utc::now()).await?;
//! let records = storage.inventory().get().await?;
//! ```

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, KvStore, MemoryKv, SqliteKv};
pub use pool::{Database, DbConfig};
pub use storage::Storage;

pub use repository::activity::ActivityRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::stats::StatsRepository;
