//! Pure helpers shared by the thread extractor.
use base64::{engine::general_purpose::STANDARD, Engine};
use chandl_common::{
    content::ContentChecksum,
    log::debug,
    reqwest::{
        header::{HeaderMap, CONTENT_LENGTH},
        Client, StatusCode,
    },
    serde_json,
};

use super::models::Thread;
use crate::{
    error::{ChecksumError, ExtractorError},
    extractor_config::{ServerConfig, API_DOMAIN, IMAGE_DOMAIN},
};

/// Number of bytes in an MD5 digest.
pub const MD5_DIGEST_LEN: usize = 16;

/// MIME type assumed whenever it can't be guessed from the attachment url.
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Builds a post's content id.
#[inline]
pub fn content_id(board: &str, post_id: &str) -> String {
    format!("4chan-{board}-{post_id}")
}

/// Thread JSON endpoint on the public API host.
#[inline]
pub fn thread_api_url(board: &str, thread_id: &str) -> String {
    format!("https://{API_DOMAIN}/{board}/thread/{thread_id}.json")
}

/// Full attachment url on the public image host. `ext` carries the leading dot (`.jpg`).
#[inline]
pub fn image_url(board: &str, attachment_id: &str, ext: &str) -> String {
    format!("https://{IMAGE_DOMAIN}/{board}/{attachment_id}{ext}")
}

/// Thumbnail url on the public image host.
#[inline]
pub fn thumbnail_url(board: &str, attachment_id: &str) -> String {
    format!("https://{IMAGE_DOMAIN}/{board}/{attachment_id}s.jpg")
}

/// Turns the base64 encoded digest from a post's `md5` field into a hex [`ContentChecksum`].
///
/// The input must decode to exactly 16 bytes. Nothing is truncated or padded.
pub fn decode_checksum(encoded: &str) -> Result<ContentChecksum, ChecksumError> {
    let digest = STANDARD.decode(encoded)?;

    if digest.len() != MD5_DIGEST_LEN {
        return Err(ChecksumError::InvalidLength {
            expected: MD5_DIGEST_LEN,
            actual: digest.len(),
        });
    }

    Ok(ContentChecksum::md5(&hex::encode(digest)))
}

/// Guesses the MIME type of an attachment from its url, defaulting to jpeg.
pub fn guess_mime_type(url: &str) -> String {
    mime_guess::from_path(url)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

/// Value of the `Content-Length` header, or `0` when it is absent or unreadable.
pub(crate) fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Downloads and parses a thread. Anything but `200 OK` is a failure.
pub async fn fetch_thread(
    client: &Client,
    server: &ServerConfig,
    board: &str,
    thread_id: &str,
) -> Result<Thread, ExtractorError> {
    let url = server.thread_api_url(board, thread_id);
    debug!("Fetching thread from {url}");

    let response = client.get(&url).send().await?;

    if response.status() != StatusCode::OK {
        debug!("Thread API returned status {}", response.status());
        return Err(ExtractorError::FetchFailed {
            url,
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await?;
    let thread: Thread = serde_json::from_str(&body)?;

    debug!("Thread {board}/{thread_id} has {} posts", thread.posts.len());
    Ok(thread)
}
