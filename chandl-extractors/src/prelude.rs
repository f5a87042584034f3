pub use crate::error::ExtractorError;
pub use crate::extractor::{ContentStream, Extractor, ExtractorRegistry};
pub use crate::extractor_config::{ServerConfig, DEFAULT_SERVERS};
pub use crate::imageboards::prelude::*;
