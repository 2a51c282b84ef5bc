use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default destination root when no folder is configured.
pub const DEFAULT_DEST_FOLDER: &str = "/Telegram";

/// Default capacity of the download → upload queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// The kind of media attached to a source message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Photo,
    #[default]
    Document,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Document => write!(f, "document"),
        }
    }
}

/// Which media kinds a source fetch should yield.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaFilter {
    #[default]
    All,
    Video,
    Photo,
}

impl MediaFilter {
    /// Parse a user-supplied filter name. Unknown names select everything.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "video" | "videos" => MediaFilter::Video,
            "photo" | "photos" => MediaFilter::Photo,
            _ => MediaFilter::All,
        }
    }

    /// Whether a name is one `parse` understands (used by config validation).
    pub fn is_known(s: &str) -> bool {
        matches!(
            s.trim().to_lowercase().as_str(),
            "all" | "video" | "videos" | "photo" | "photos"
        )
    }

    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Video => kind == MediaKind::Video,
            MediaFilter::Photo => kind == MediaKind::Photo,
        }
    }
}

impl fmt::Display for MediaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFilter::All => write!(f, "all"),
            MediaFilter::Video => write!(f, "video"),
            MediaFilter::Photo => write!(f, "photo"),
        }
    }
}

/// Metadata of one piece of media discovered at the source.
///
/// Immutable once fetched. The destination name is derived from these
/// fields alone, so repeated runs over the same source map every item to
/// the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    pub message_id: i64,
    pub chat_id: i64,
    pub date: DateTime<Utc>,
    pub kind: MediaKind,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Content identity token used for duplicate detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl MediaItem {
    pub fn new(chat_id: i64, message_id: i64, date: DateTime<Utc>, kind: MediaKind) -> Self {
        Self {
            message_id,
            chat_id,
            date,
            kind,
            file_size: 0,
            filename: None,
            mime_type: None,
            width: None,
            height: None,
            duration: None,
            fingerprint: None,
        }
    }

    pub fn with_file_size(mut self, size: u64) -> Self {
        self.file_size = size;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// The filename this item maps to at the destination store.
    ///
    /// Original filenames are kept (with path separators neutralised);
    /// unnamed media get `{YYYYmmdd_HHMMSS}_{message_id}{ext}`.
    pub fn destination_name(&self) -> String {
        if let Some(name) = self.filename.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.replace(['/', '\\'], "_");
        }
        format!(
            "{}_{}{}",
            self.date.format("%Y%m%d_%H%M%S"),
            self.message_id,
            self.guess_extension()
        )
    }

    /// Full path of this item inside `dest_folder`.
    pub fn remote_path(&self, dest_folder: &str) -> String {
        remote_path(dest_folder, &self.destination_name())
    }

    fn guess_extension(&self) -> &'static str {
        match self.mime_type.as_deref() {
            Some("video/mp4") => ".mp4",
            Some("video/webm") => ".webm",
            Some("video/quicktime") => ".mov",
            Some("image/jpeg") => ".jpg",
            Some("image/png") => ".png",
            Some("image/webp") => ".webp",
            Some(_) => ".mp4",
            None if self.kind == MediaKind::Video => ".mp4",
            None => ".jpg",
        }
    }
}

/// Join a destination folder and a file name without doubling separators.
pub fn remote_path(dest_folder: &str, name: &str) -> String {
    let folder = dest_folder.trim_end_matches('/');
    format!("{folder}/{name}")
}

/// What the source should yield for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchQuery {
    pub source: String,
    pub limit: Option<usize>,
    pub reverse: bool,
    pub filter: MediaFilter,
}

/// Options for a single transfer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Source collection identifier (channel, chat, folder).
    pub source: String,
    /// Maximum number of source messages to fetch.
    pub limit: Option<usize>,
    /// Fetch oldest-first instead of newest-first.
    pub reverse: bool,
    pub media_filter: MediaFilter,
    /// Minimum of width/height in pixels; 0 disables the check.
    pub min_resolution: u32,
    /// Minimum duration in seconds; 0 disables the check.
    pub min_duration: u32,
    pub dest_folder: String,
    /// Scratch directory for downloaded bytes awaiting upload.
    pub download_dir: PathBuf,
    /// Downloaded items allowed to wait for the uploader before the
    /// producer blocks.
    pub queue_capacity: usize,
}

impl TransferOptions {
    pub fn new(source: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            limit: None,
            reverse: false,
            media_filter: MediaFilter::All,
            min_resolution: 0,
            min_duration: 0,
            dest_folder: DEFAULT_DEST_FOLDER.to_string(),
            download_dir: download_dir.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn fetch_query(&self) -> FetchQuery {
        FetchQuery {
            source: self.source.clone(),
            limit: self.limit,
            reverse: self.reverse,
            filter: self.media_filter,
        }
    }
}
