use chandl_common::log::debug;

use super::Extractor;
use crate::error::ExtractorError;
use crate::extractor_config::ServerConfig;
use crate::imageboards::fourchan::ThreadExtractor;

/// Ordered collection of the extractors available to the host.
///
/// Lookups return the first registered extractor that accepts a url.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with every extractor shipped by this crate, all pointed at `config`.
    pub fn with_defaults(config: ServerConfig) -> Result<Self, ExtractorError> {
        let mut registry = Self::new();
        registry.register(ThreadExtractor::new_with_config(config)?);
        Ok(registry)
    }

    pub fn register<E>(&mut self, extractor: E) -> &mut Self
    where
        E: Extractor + 'static,
    {
        debug!("Registering extractor {}", extractor.name());
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Returns the first extractor able to handle `url`.
    pub fn find(&self, url: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|ext| ext.can_handle(url))
            .map(|ext| ext.as_ref())
    }

    /// Same as [`find`](Self::find), but a missing extractor is an error.
    pub fn resolve(&self, url: &str) -> Result<&dyn Extractor, ExtractorError> {
        self.find(url).ok_or_else(|| ExtractorError::NoExtractor {
            url: url.to_string(),
        })
    }

    pub fn extractors(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(|ext| ext.as_ref())
    }
}
