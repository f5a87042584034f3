//! Main representation of a piece of downloadable content
//!
//! # Content
//! A [`Content` struct](Content) is the normalized descriptor every extractor emits for each
//! discoverable asset.
//!
//! Extractors only describe *where* the bytes live (through [`HttpResource`]s). Fetching them is
//! the job of the download core, which records what it fetched in a [`ContentManifest`] and
//! hands that back to the extractor to be merged into the final file.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::fmt::Debug;

pub mod checksum;
pub mod manifest;
pub mod resource;

pub use self::checksum::{ChecksumAlgorithm, ContentChecksum};
pub use self::manifest::ContentManifest;
pub use self::resource::{HttpMethod, HttpResource};

/// Quality assigned to the preferred variant of a content group.
pub const BEST_QUALITY: f64 = 1.0;

/// Descriptive metadata attached to a [`Content`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Identifier of the content on the source website.
    pub id: Option<String>,
    /// Free-form description. For imageboard posts this is the raw comment HTML.
    pub description: Option<String>,
    /// Display name of whoever published the content.
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    /// Original file name as uploaded, without extension.
    pub filename: Option<String>,
    pub thumbnail: Option<String>,
}

/// Catchall descriptor for a single downloadable asset.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Stable identifier. Used as the base of the output file name.
    pub id: String,
    /// Shared by every variant (full image, thumbnail, ...) of the same asset.
    pub group: String,
    /// Human readable name of the variant, like `Post Image`.
    pub name: String,
    /// The page the content was discovered from. This is **not** the asset url.
    pub url: String,
    /// Relative preference inside a group. `1.0` is the variant to keep when only one can be kept.
    pub quality: f64,
    /// Expected size in bytes. `0` when unknown.
    pub size: u64,
    pub mime_type: String,
    /// Ordered list of requests that fetch the asset bytes.
    pub resources: Vec<HttpResource>,
    pub metadata: ContentMetadata,
    /// Checksums provided by the source website, if any.
    pub checksums: Vec<ContentChecksum>,
    /// The raw record the content was built from, kept only for diagnostics.
    pub extra: Map<String, Value>,
}

impl Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Content")
            .field("ID", &self.id)
            .field("Group", &self.group)
            .field("Name", &self.name)
            .field("Source URL", &self.url)
            .field("Quality", &self.quality)
            .field("Size", &self.size)
            .field("MIME Type", &self.mime_type)
            .field("Resources", &self.resources)
            .field("Checksums", &self.checksums)
            .finish_non_exhaustive()
    }
}

impl Content {
    /// Whether this is the preferred variant of its group.
    #[inline]
    pub fn is_best_quality(&self) -> bool {
        self.quality >= BEST_QUALITY
    }

    /// File extension of the asset, taken from the last path segment of its first resource.
    ///
    /// Falls back to `bin` whenever the url carries no usable extension.
    pub fn extension(&self) -> String {
        self.resources
            .first()
            .and_then(|res| res.url.rsplit('/').next())
            .and_then(|segment| segment.split(['?', '#']).next())
            .and_then(|segment| segment.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(char::is_alphanumeric))
            .map_or_else(|| String::from("bin"), str::to_lowercase)
    }

    /// Get the final file name of the content for saving.
    #[inline]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension())
    }

    /// Returns the first MD5 checksum attached to this content.
    pub fn md5(&self) -> Option<&ContentChecksum> {
        self.checksums
            .iter()
            .find(|c| c.algorithm == ChecksumAlgorithm::Md5)
    }
}
