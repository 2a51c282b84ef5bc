use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tgup_core::{DuplicateIndex, Result, TransferError};

/// On-disk snapshot format.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KnownIdsSnapshot {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Duplicate index loaded from a JSON snapshot of known fingerprints.
///
/// Fingerprints added during a run live in memory only.
#[derive(Debug, Default)]
pub struct KnownIdIndex {
    path: Option<PathBuf>,
    ids: RwLock<HashSet<String>>,
}

impl KnownIdIndex {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path, ids: RwLock::default() }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn count(&self) -> usize {
        self.ids.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl DuplicateIndex for KnownIdIndex {
    async fn load(&self) -> Result<usize> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No known-id snapshot");
                return Ok(0);
            }
            Err(e) => {
                return Err(TransferError::DuplicateIndex(format!("{}: {e}", path.display())))
            }
        };
        let snapshot: KnownIdsSnapshot = serde_json::from_str(&raw)
            .map_err(|e| TransferError::DuplicateIndex(format!("{}: {e}", path.display())))?;

        let mut ids = self.ids.write().unwrap_or_else(PoisonError::into_inner);
        ids.extend(snapshot.ids);
        Ok(ids.len())
    }

    fn is_duplicate(&self, fingerprint: &str) -> bool {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(fingerprint)
    }

    fn add(&self, fingerprint: &str) {
        self.ids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fingerprint.to_string());
    }
}
