//! Modules that work by turning a page url into a stream of [Content](chandl_common::content::Content) descriptors.
//! # Extractors
//!
//! All types implementing [`Extractor`] recognize a family of urls, connect to the website behind
//! them and describe every downloadable asset they find. They never download the assets
//! themselves: that is left to the host (see `chandl-core`), which hands the fetched artifacts
//! back through [`Extractor::write_content`].
//!
//! Extractors are collected in an explicit [`ExtractorRegistry`] built at startup.
use chandl_common::{
    content::{Content, ContentManifest},
    reqwest::Client,
};
use futures::stream::BoxStream;
use std::path::{Path, PathBuf};

use crate::error::ExtractorError;

pub mod registry;

pub use self::registry::ExtractorRegistry;

/// Lazy, finite sequence of descriptors produced by [`Extractor::iter_content`].
///
/// The stream ends after the first error it yields.
pub type ContentStream = BoxStream<'static, Result<Content, ExtractorError>>;

/// This trait should be the only common public interface all extractors should expose aside from some other website-specific configuration.
pub trait Extractor: Send + Sync {
    /// Pretty name of the extractor.
    fn name(&self) -> &str;

    /// Domains whose pages this extractor understands.
    fn domains(&self) -> &[&'static str];

    /// Checks if the url can be handled by this extractor. Never fails.
    fn can_handle(&self, url: &str) -> bool;

    /// Validates `url` and returns a stream describing all content reachable from it.
    ///
    /// Url validation happens right away, before any network call. Everything else happens
    /// while the stream is polled, so calling this again fetches everything from scratch.
    fn iter_content(&self, url: &str) -> Result<ContentStream, ExtractorError>;

    /// Merges the artifacts of a completed manifest into `to_path` and returns the final path.
    fn write_content(
        &self,
        manifest: ContentManifest,
        to_path: &Path,
    ) -> Result<PathBuf, ExtractorError>;

    /// Returns the used client for external use.
    fn client(&self) -> Client;
}
