use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use tokio::time::Instant;

use crate::models::folders::FolderTree;

/// How long a fetched tree is served without asking the listing service again.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
pub struct CacheEntry {
    tree: Arc<FolderTree>,
    fetched_at: Instant,
}

impl CacheEntry {
    pub fn tree(&self) -> Arc<FolderTree> {
        Arc::clone(&self.tree)
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Holds at most one [`CacheEntry`]. Entries are replaced whole, never edited.
#[derive(Debug, Default)]
pub struct FolderCache {
    entry: RwLock<Option<Arc<CacheEntry>>>,
}

impl FolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the cached tree if it is younger than `ttl` at `now`.
    pub fn fresh(&self, now: Instant, ttl: Duration) -> Option<Arc<FolderTree>> {
        self.current()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.tree())
    }

    pub fn replace(&self, tree: FolderTree, fetched_at: Instant) -> Arc<FolderTree> {
        let entry = Arc::new(CacheEntry {
            tree: Arc::new(tree),
            fetched_at,
        });
        let tree = entry.tree();
        *self
            .entry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(entry);
        tree
    }

    /// True once any fetch has succeeded, fresh or not.
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}
