//! Destination store backed by one or more local directories.
//!
//! Remote paths such as `/Telegram/channel/clip.mp4` are resolved under each
//! root. Reads fan out across every root; writes go to the first.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use tgup_core::{
    DestinationStore, MediaItem, ProgressFn, Result, TransferError, UploadOutcome, Uploader,
};

use crate::downloader::{copy_with_progress, PartialFile};

const PARTIAL_SUFFIX: &str = ".part";

#[derive(Debug, Clone)]
pub struct LocalStore {
    roots: Vec<PathBuf>,
}

impl LocalStore {
    pub fn new<I, P>(roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
        if roots.is_empty() {
            return Err(TransferError::Config(
                "at least one destination root is required".into(),
            ));
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn resolve(root: &Path, remote: &str) -> PathBuf {
        root.join(remote.trim_start_matches('/'))
    }
}

fn is_partial(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

#[async_trait]
impl DestinationStore for LocalStore {
    async fn list_all(&self, folder: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for root in &self.roots {
            let dir = Self::resolve(root, folder);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    let message = format!("cannot list {}: {e}", dir.display());
                    return Err(TransferError::Store(message));
                }
            };
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                if let Ok(name) = entry.file_name().into_string() {
                    if !is_partial(&name) {
                        names.push(name);
                    }
                }
            }
        }
        debug!(folder, roots = self.roots.len(), count = names.len(), "Listed destination");
        Ok(names)
    }

    async fn exists(&self, full_path: &str) -> Result<bool> {
        for root in &self.roots {
            if tokio::fs::try_exists(Self::resolve(root, full_path)).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl Uploader for LocalStore {
    async fn upload(
        &self,
        local_path: &Path,
        item: &MediaItem,
        dest_folder: &str,
        progress: ProgressFn<'_>,
    ) -> Result<UploadOutcome> {
        let name = item.destination_name();
        let remote = item.remote_path(dest_folder);
        if self.exists(&remote).await? {
            return Ok(UploadOutcome::Rejected { reason: format!("{remote} already exists") });
        }

        let dir = Self::resolve(&self.roots[0], dest_folder);
        tokio::fs::create_dir_all(&dir).await?;

        let remote_id = Uuid::new_v4().to_string();
        let partial = dir.join(format!(".{name}.{remote_id}{PARTIAL_SUFFIX}"));
        let target = dir.join(&name);

        let guard = PartialFile::new(&partial);
        let copied = copy_with_progress(local_path, &partial, item.file_size, progress).await;
        let result = match copied {
            Ok(_) => tokio::fs::rename(&partial, &target).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            return Err(TransferError::Upload(format!("{remote}: {e}")));
        }
        guard.keep();

        info!(path = %target.display(), remote_id = %remote_id, "Stored file");
        Ok(UploadOutcome::Uploaded { remote_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;
    use tgup_core::MediaKind;

    fn item(name: &str) -> MediaItem {
        MediaItem::new(1, 1, Utc::now(), MediaKind::Video).with_filename(name)
    }

    fn staged(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"bytes").unwrap();
        path
    }

    #[test]
    fn requires_a_root() {
        assert!(LocalStore::new(Vec::<PathBuf>::new()).is_err());
    }

    #[tokio::test]
    async fn lists_and_checks_across_roots() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(a.path().join("Telegram/chan")).unwrap();
        std::fs::create_dir_all(b.path().join("Telegram/chan")).unwrap();
        std::fs::write(a.path().join("Telegram/chan/one.mp4"), b"1").unwrap();
        std::fs::write(b.path().join("Telegram/chan/two.mp4"), b"2").unwrap();
        std::fs::write(b.path().join("Telegram/chan/.three.mp4.x.part"), b"3").unwrap();

        let store = LocalStore::new([a.path(), b.path()]).unwrap();
        let mut names = store.list_all("/Telegram/chan").await.unwrap();
        names.sort();

        assert_eq!(names, vec!["one.mp4", "two.mp4"]);
        assert!(store.exists("/Telegram/chan/two.mp4").await.unwrap());
        assert!(!store.exists("/Telegram/chan/four.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn missing_folder_lists_empty() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalStore::new([root.path()]).unwrap();
        assert!(store.list_all("/Telegram/new").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_writes_into_first_root() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let store = LocalStore::new([a.path(), b.path()]).unwrap();

        let local = staged(staging.path(), "x");
        let outcome = store
            .upload(&local, &item("clip.mp4"), "/Telegram/chan", &|_, _| {})
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(std::fs::read(a.path().join("Telegram/chan/clip.mp4")).unwrap(), b"bytes");
        assert_eq!(std::fs::read_dir(a.path().join("Telegram/chan")).unwrap().count(), 1);
        assert!(!b.path().join("Telegram").exists());
        assert!(local.exists());
    }

    #[tokio::test]
    async fn existing_name_is_rejected() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(b.path().join("dest")).unwrap();
        std::fs::write(b.path().join("dest/clip.mp4"), b"old").unwrap();
        let staging = tempfile::tempdir().unwrap();
        let store = LocalStore::new([a.path(), b.path()]).unwrap();

        let outcome = store
            .upload(&staged(staging.path(), "x"), &item("clip.mp4"), "/dest", &|_, _| {})
            .await
            .unwrap();

        assert!(matches!(outcome, UploadOutcome::Rejected { .. }));
        assert_eq!(std::fs::read(b.path().join("dest/clip.mp4")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn abandoned_upload_leaves_no_partial() {
        let root = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let local = staging.path().join("big");
        std::fs::write(&local, vec![0u8; 3 * 64 * 1024]).unwrap();
        let store = LocalStore::new([root.path()]).unwrap();

        let item = item("clip.mp4");
        let abort = |done: u64, _: u64| {
            if done > 0 {
                panic!("stop mid-upload");
            }
        };
        let upload = store.upload(&local, &item, "/dest", &abort);
        assert!(AssertUnwindSafe(upload).catch_unwind().await.is_err());

        assert_eq!(std::fs::read_dir(root.path().join("dest")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_copy_leaves_no_partial() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalStore::new([root.path()]).unwrap();

        let result = store
            .upload(Path::new("/nonexistent/staged"), &item("clip.mp4"), "/dest", &|_, _| {})
            .await;

        assert!(matches!(result, Err(TransferError::Upload(_))));
        assert_eq!(std::fs::read_dir(root.path().join("dest")).unwrap().count(), 0);
    }
}
