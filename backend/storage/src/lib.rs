//! Local-filesystem collaborators for the transfer pipeline: a folder that
//! acts as the media source, a chunked downloader, a multi-root destination
//! store and a file-backed duplicate index.

pub mod downloader;
pub mod folder_source;
pub mod known_ids;
pub mod local_store;
pub mod mime;

pub use downloader::{FileDownloader, CHUNK_SIZE};
pub use folder_source::FolderSource;
pub use known_ids::{KnownIdIndex, KnownIdsSnapshot};
pub use local_store::LocalStore;
pub use mime::{detect_mime_type, kind_for_mime};
