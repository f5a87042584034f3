//! All internal logic for turning thread urls into downloadable content descriptors.

extern crate chandl_common;

pub mod error;
pub mod extractor;
pub mod extractor_config;
pub mod imageboards;
pub mod prelude;
