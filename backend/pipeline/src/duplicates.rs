use async_trait::async_trait;

use tgup_core::{DuplicateIndex, Result};

/// Stand-in used when no duplicate index is configured: knows nothing,
/// remembers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDuplicateIndex;

#[async_trait]
impl DuplicateIndex for NoDuplicateIndex {
    async fn load(&self) -> Result<usize> {
        Ok(0)
    }

    fn is_duplicate(&self, _fingerprint: &str) -> bool {
        false
    }

    fn add(&self, _fingerprint: &str) {}
}
