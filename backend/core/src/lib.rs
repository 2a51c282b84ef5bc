pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::{Result, TransferError};
pub use event::{SkipReason, UploadOutcome};
pub use traits::{
    DestinationStore, DuplicateIndex, Downloader, ItemStream, MediaSource, NoopSink, ProgressFn,
    ProgressSink, Uploader,
};
pub use types::{
    remote_path, FetchQuery, MediaFilter, MediaItem, MediaKind, TransferOptions,
    DEFAULT_DEST_FOLDER, DEFAULT_QUEUE_CAPACITY,
};
