//! A local directory exposed as a media collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{future, StreamExt, TryStreamExt};
use tracing::{debug, info};

use tgup_core::{FetchQuery, ItemStream, MediaItem, MediaSource, Result, TransferError};

use crate::mime::{detect_mime_type, kind_for_mime};

/// Treats the regular files of `query.source` as messages.
///
/// Files sorted by name are numbered from 1; that number is the message id.
/// Like a chat history, the newest (highest id) comes first unless the query
/// asks for reverse order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderSource {
    chat_id: i64,
}

impl FolderSource {
    pub fn new(chat_id: i64) -> Self {
        Self { chat_id }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }
}

#[async_trait]
impl MediaSource for FolderSource {
    async fn fetch(&self, query: &FetchQuery) -> Result<ItemStream<'_>> {
        let dir = PathBuf::from(&query.source);
        let mut names = list_file_names(&dir).await?;
        names.sort();

        let mut entries: Vec<(i64, PathBuf)> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (i as i64 + 1, dir.join(name)))
            .collect();
        if !query.reverse {
            entries.reverse();
        }
        entries.truncate(query.limit.unwrap_or(usize::MAX));
        info!(source = %dir.display(), count = entries.len(), "Fetching messages");

        let chat_id = self.chat_id;
        let filter = query.filter;
        let stream = futures::stream::iter(entries)
            .then(move |(message_id, path)| describe(chat_id, message_id, path))
            .try_filter(move |item| future::ready(filter.matches(item.kind)))
            .boxed();
        Ok(stream)
    }
}

async fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| {
        TransferError::Source(format!("cannot open source folder {}: {e}", dir.display()))
    })?;

    let mut names = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!(name = ?raw, "Skipping file with non UTF-8 name"),
        }
    }
    Ok(names)
}

async fn describe(chat_id: i64, message_id: i64, path: PathBuf) -> Result<MediaItem> {
    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|e| TransferError::Source(format!("cannot read {}: {e}", path.display())))?;
    let modified = meta.modified()?;
    let date: DateTime<Utc> = modified.into();

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = detect_mime_type(&path);
    let size = meta.len();

    Ok(MediaItem::new(chat_id, message_id, date, kind_for_mime(mime))
        .with_file_size(size)
        .with_mime_type(mime)
        .with_fingerprint(format!("{size}-{}-{filename}", date.timestamp()))
        .with_filename(filename))
}
