//! Website-specific extractors.
//!
//! Every module here implements [`Extractor`](crate::extractor::Extractor) for one website and
//! is registered through [`ExtractorRegistry::with_defaults`](crate::extractor::ExtractorRegistry::with_defaults).

pub mod fourchan;

pub mod prelude;
