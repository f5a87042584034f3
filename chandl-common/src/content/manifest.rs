use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::HttpResource;

/// Record of which resources of a [`Content`](super::Content) were fetched and where their bytes
/// were stored locally.
///
/// Artifacts keep the order in which the resources were declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentManifest {
    /// ID of the content the artifacts belong to.
    pub id: String,
    pub artifacts: Vec<(HttpResource, PathBuf)>,
}

impl ContentManifest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn push(&mut self, resource: HttpResource, artifact: PathBuf) {
        self.artifacts.push((resource, artifact));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
