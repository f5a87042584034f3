use std::fmt::Debug;
use std::sync::Arc;

/// Type of log event, used for styling or filtering messages in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    /// File was skipped (e.g., already exists with the expected checksum).
    Skip,
    /// File was removed (e.g., checksum mismatch before redownload).
    Remove,
    /// Operation was successful.
    Success,
    /// An error occurred for a specific content being processed.
    Error,
}

/// Trait for reporting overall progress of a [`Queue`](crate::queue::Queue) run.
///
/// Extraction is lazy, so the total is never known upfront: it grows by one for every
/// descriptor the queue accepts. All methods should be thread-safe.
pub trait ProgressListener: Send + Sync + Debug {
    /// Increments the total number of items for the main progress.
    fn inc_main_total(&self, delta: u64);
    /// Signals that one item has been processed, whatever the outcome.
    fn main_tick(&self);
    /// Signals that the whole stream has been processed.
    fn main_done(&self);

    /// Adds a new task for tracking the progress of a single resource download.
    ///
    /// `total_size` is the expected size in bytes, if known.
    fn add_download_task(
        &self,
        name: String,
        total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater>;

    /// Logs a categorized event message to be displayed in the progress UI.
    fn log_event(&self, log_type: LogType, target: &str, message: &str);
}

/// Trait for updating the progress of an individual download task.
pub trait DownloadProgressUpdater: Send + Sync + Debug {
    /// Sets the current number of bytes downloaded for this task.
    fn set_progress(&self, bytes_downloaded: u64);
    /// Sets or updates the total size of the item being downloaded.
    fn set_total_size(&self, total_size: u64);
    /// Signals that this download task is finished (successfully or not).
    fn finish(&self);
}

/// A no-operation implementation of `ProgressListener`.
#[derive(Debug, Clone)]
pub struct NoOpProgressListener;

impl ProgressListener for NoOpProgressListener {
    fn inc_main_total(&self, _delta: u64) {}
    fn main_tick(&self) {}
    fn main_done(&self) {}
    fn add_download_task(
        &self,
        _name: String,
        _total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater> {
        Box::new(NoOpDownloadProgressUpdater)
    }
    fn log_event(&self, _log_type: LogType, _target: &str, _message: &str) {}
}

/// A no-operation implementation of `DownloadProgressUpdater`.
#[derive(Debug, Clone)]
pub struct NoOpDownloadProgressUpdater;

impl DownloadProgressUpdater for NoOpDownloadProgressUpdater {
    fn set_progress(&self, _bytes_downloaded: u64) {}
    fn set_total_size(&self, _total_size: u64) {}
    fn finish(&self) {}
}

/// Convenience type alias for a shared, thread-safe progress listener.
pub type SharedProgressListener = Arc<dyn ProgressListener>;

/// Returns a shared instance of a `NoOpProgressListener`.
pub fn no_op_progress_listener() -> SharedProgressListener {
    Arc::new(NoOpProgressListener)
}
