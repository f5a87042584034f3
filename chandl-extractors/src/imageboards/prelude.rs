pub use super::fourchan::{ThreadExtractor, ThreadReference};
