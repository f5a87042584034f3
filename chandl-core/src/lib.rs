//! Download infrastructure that turns extracted content descriptors into files on disk.
use chandl_extractors::imageboards::fourchan::ThreadReference;
use std::path::{Path, PathBuf};

pub mod error;
pub mod progress;
pub mod queue;

/// Default output location for a thread: `<main_path>/<board>/<thread id>`.
#[inline]
pub fn generate_output_path(main_path: &Path, thread: &ThreadReference) -> PathBuf {
    main_path.join(&thread.board).join(&thread.thread_id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn output_path_nests_board_and_thread() {
        let thread = ThreadReference::parse("https://boards.4chan.org/g/thread/123").unwrap();
        assert_eq!(
            generate_output_path(Path::new("/tmp/out"), &thread),
            PathBuf::from("/tmp/out/g/123")
        );
    }
}
