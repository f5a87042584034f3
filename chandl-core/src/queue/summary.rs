use std::path::PathBuf;

use crate::error::DownloadError;

/// What happened to a single content descriptor.
#[derive(Debug)]
pub enum DownloadStatus {
    /// Fetched, merged and verified into the given file.
    Downloaded(PathBuf),
    /// Left untouched since the file was already present.
    Skipped(PathBuf),
}

/// Final tally of a [`Queue`](super::Queue) run.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Content id (or source url, for extraction errors) along with what went wrong.
    pub failed: Vec<(String, DownloadError)>,
}

impl DownloadSummary {
    pub(crate) fn record(&mut self, id: String, result: Result<DownloadStatus, DownloadError>) {
        match result {
            Ok(DownloadStatus::Downloaded(path)) => self.downloaded.push(path),
            Ok(DownloadStatus::Skipped(path)) => self.skipped.push(path),
            Err(error) => self.failed.push((id, error)),
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.skipped.len() + self.failed.len()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Folds another run into this one.
    pub fn merge(&mut self, other: Self) {
        self.downloaded.extend(other.downloaded);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}
