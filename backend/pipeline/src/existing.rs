use std::collections::HashSet;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tgup_core::{remote_path, DestinationStore};

/// Names already present at the destination.
///
/// Filled once from a bulk listing, then grown by live existence hits and
/// by successful uploads during the run.
#[derive(Debug, Default)]
pub struct ExistingItems {
    names: RwLock<HashSet<String>>,
}

impl ExistingItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the listing of `folder`.
    ///
    /// A failed listing leaves the cache empty; the run continues and relies
    /// on live checks.
    pub async fn load(&self, store: &dyn DestinationStore, folder: &str) -> usize {
        match store.list_all(folder).await {
            Ok(names) => {
                let mut set = self.names.write().await;
                *set = names.into_iter().collect();
                info!(folder = %folder, count = set.len(), "Found existing files");
                set.len()
            }
            Err(e) => {
                warn!(folder = %folder, error = %e, "Could not load existing files");
                0
            }
        }
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.names.read().await.contains(name)
    }

    pub async fn insert(&self, name: impl Into<String>) {
        self.names.write().await.insert(name.into());
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.names.read().await.is_empty()
    }

    /// Whether `name` exists under `folder`, consulting the cache first.
    ///
    /// Live-check errors count as "not present": a possible duplicate upload
    /// is preferred over losing an item.
    pub async fn file_exists(
        &self,
        store: &dyn DestinationStore,
        folder: &str,
        name: &str,
    ) -> bool {
        if self.contains(name).await {
            return true;
        }

        let full_path = remote_path(folder, name);
        match store.exists(&full_path).await {
            Ok(true) => {
                self.insert(name).await;
                true
            }
            Ok(false) => false,
            Err(e) => {
                debug!(
                    path = %full_path,
                    error = %e,
                    "Live existence check failed; treating as absent"
                );
                false
            }
        }
    }
}
