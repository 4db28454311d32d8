//! # Activity Repository
//!
//! Newest-first live activity feed, capped at
//! [`MAX_ACTIVITY_ENTRIES`](goodlink_core::MAX_ACTIVITY_ENTRIES).

use goodlink_core::{SyncActivity, MAX_ACTIVITY_ENTRIES};

use super::ACTIVITY_KEY;
use crate::error::StoreResult;
use crate::kv::KvStore;

/// Repository for the activity feed.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    kv: KvStore,
}

impl ActivityRepository {
    pub fn new(kv: KvStore) -> Self {
        ActivityRepository { kv }
    }

    /// Returns the feed, newest first.
    pub async fn list(&self) -> StoreResult<Vec<SyncActivity>> {
        self.kv.get(ACTIVITY_KEY, Vec::new()).await
    }

    /// Prepends an entry and drops anything past the cap.
    ///
    /// ## Returns
    /// The feed length after the insert.
    pub async fn push(&self, activity: SyncActivity) -> StoreResult<usize> {
        let feed = self
            .kv
            .update(ACTIVITY_KEY, Vec::new(), |mut feed: Vec<SyncActivity>| {
                feed.insert(0, activity);
                feed.truncate(MAX_ACTIVITY_ENTRIES);
                feed
            })
            .await?;

        Ok(feed.len())
    }
}
