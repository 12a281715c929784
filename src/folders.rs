use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    cache::{CACHE_TTL, FolderCache},
    models::folders::FolderTree,
    tree_client::TreeSource,
};

/// Where a served tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOrigin {
    Cache,
    Live,
    Fallback,
}

/// Serves the folder tree: fresh cache, then a live fetch, then the fallback
/// catalog. Never fails.
pub struct FolderService {
    source: Arc<dyn TreeSource>,
    cache: FolderCache,
    fallback: Arc<FolderTree>,
    ttl: Duration,
}

impl FolderService {
    pub fn new(source: Arc<dyn TreeSource>, fallback: FolderTree) -> Self {
        Self {
            source,
            cache: FolderCache::new(),
            fallback: Arc::new(fallback),
            ttl: CACHE_TTL,
        }
    }

    pub async fn folder_tree(&self) -> Arc<FolderTree> {
        self.resolve().await.0
    }

    pub async fn resolve(&self) -> (Arc<FolderTree>, TreeOrigin) {
        if let Some(tree) = self.cache.fresh(Instant::now(), self.ttl) {
            debug!("serving folder tree from cache");
            return (tree, TreeOrigin::Cache);
        }

        match self.source.fetch_tree().await {
            Ok(tree) => {
                if tree.is_empty() {
                    warn!("listing service returned no folders, caching empty tree");
                } else {
                    info!(folders = tree.len(), "fetched folder tree from listing service");
                }
                (self.cache.replace(tree, Instant::now()), TreeOrigin::Live)
            }
            Err(err) => {
                warn!(error = %err, "folder listing failed, serving fallback catalog");
                (Arc::clone(&self.fallback), TreeOrigin::Fallback)
            }
        }
    }

    pub fn cache(&self) -> &FolderCache {
        &self.cache
    }
}
