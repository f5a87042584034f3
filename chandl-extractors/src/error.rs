use std::{io, path::PathBuf};

use thiserror::Error;

/// Enumerates the possible errors that can arise during extractor operations.
///
/// None of them are retried internally. Every error is terminal for the single
/// extraction or merge call in which it occurs.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The url given to the extractor doesn't have the shape it recognizes.
    #[error("Failed to match url {url}")]
    UrlMismatch { url: String },

    /// The url matched, but the board or thread captures came out empty.
    #[error("Failed to extract board and thread from url {url}")]
    IncompleteMatch { url: String },

    /// The thread API answered with anything other than `200 OK`.
    #[error("Failed to get response for thread at {url} (status: {status})")]
    FetchFailed { url: String, status: u16 },

    /// The checksum shipped with a post could not be decoded.
    #[error("Failed to decode post checksum: {source}")]
    ChecksumDecode {
        #[from]
        source: ChecksumError,
    },

    /// A manifest handed back for merging doesn't hold the number of artifacts the extractor produces.
    #[error("{extractor} expects only {expected} artifact, received {actual}")]
    ManifestArity {
        extractor: String,
        expected: usize,
        actual: usize,
    },

    /// Moving the downloaded artifact into its final location failed.
    #[error("Failed to move artifact {artifact} to {destination}: {source}")]
    ArtifactMove {
        artifact: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },

    /// An error occurred during a network request (e.g., connection timeout, DNS resolution failure).
    /// Wraps an underlying `reqwest::Error`.
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    /// An error occurred while deserializing a JSON response from the thread API.
    #[error("Error while deserializing JSON: {0}")]
    JsonSerializeFail(#[from] serde_json::Error),

    /// A post with an attachment is missing a field that is required to describe it.
    #[error("Post is missing an essential field {field}")]
    MissingField { field: String },

    /// No registered extractor accepts the url.
    #[error("No extractor available for url {url}")]
    NoExtractor { url: String },
}

/// Errors raised while decoding the base64 digests the thread API ships with each attachment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("checksum is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("checksum decodes to {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors raised while loading server definitions from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access server config file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to parse server config file: {source}")]
    ParseFail {
        #[from]
        source: toml::de::Error,
    },
}
