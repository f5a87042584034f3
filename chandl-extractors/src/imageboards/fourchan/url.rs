//! Recognition of thread urls.
use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractorError;

/// Matches `http(s)://[www.|boards.]4chan[nel].org/<board>/thread/<id>`.
///
/// Anchored at the start only, so trailing segments like the thread slug are accepted.
pub static THREAD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:(?:www|boards)\.)?4chan(?:nel)?\.org/(?P<board>\w+)/thread/(?P<thread>\d+)",
    )
    .expect("thread pattern is a valid regex")
});

/// Board and thread id extracted from a thread url.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadReference {
    pub board: String,
    pub thread_id: String,
}

impl ThreadReference {
    /// Matches `url` against [`THREAD_PATTERN`]. Returns `None` for anything else.
    pub fn recognize(url: &str) -> Option<Self> {
        THREAD_PATTERN.captures(url).map(|caps| Self {
            board: caps
                .name("board")
                .map_or_else(String::new, |m| m.as_str().to_string()),
            thread_id: caps
                .name("thread")
                .map_or_else(String::new, |m| m.as_str().to_string()),
        })
    }

    /// Like [`recognize`](Self::recognize), but rejects both non-matching urls and empty captures.
    pub fn parse(url: &str) -> Result<Self, ExtractorError> {
        let reference = Self::recognize(url).ok_or_else(|| ExtractorError::UrlMismatch {
            url: url.to_string(),
        })?;

        if reference.board.is_empty() || reference.thread_id.is_empty() {
            return Err(ExtractorError::IncompleteMatch {
                url: url.to_string(),
            });
        }

        Ok(reference)
    }
}

impl Display for ThreadReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.board, self.thread_id)
    }
}
