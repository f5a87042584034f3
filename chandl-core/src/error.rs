use std::{io, path::PathBuf};

use chandl_extractors::error::ExtractorError;
use thiserror::Error;

/// Errors that abort a whole [`Queue`](crate::queue::Queue) run.
#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to create destination directory. error: {message}")]
    DirCreationError { message: String },

    #[error("Failed to build the download client: {0}")]
    ClientBuildError(#[from] reqwest::Error),

    /// The extractor rejected the url before producing any content.
    #[error(transparent)]
    Extractor(#[from] ExtractorError),
}

/// Errors tied to a single content descriptor. They are collected in the
/// [`DownloadSummary`](crate::queue::summary::DownloadSummary) instead of stopping the queue.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The extractor failed while describing or merging the content.
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    #[error("Remote file {url} not available (status: {status})")]
    RemoteFileNotFound { url: String, status: u16 },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to download chunk: {message}")]
    ChunkDownloadFail { message: String },

    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", file.display())]
    ChecksumMismatch {
        file: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to serialize content metadata: {0}")]
    MetadataSerializeFail(#[from] serde_json::Error),
}
