use thiserror::Error;

/// Top-level error type for the tgup transfer pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("source error: {0}")]
    Source(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("destination store error: {0}")]
    Store(String),

    #[error("duplicate index error: {0}")]
    DuplicateIndex(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = TransferError> = std::result::Result<T, E>;
