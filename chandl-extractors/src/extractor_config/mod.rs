use chandl_common::serde::{self, Deserialize, Serialize};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Display;

use crate::server_config;

/// Host serving the thread JSON API.
pub const API_DOMAIN: &str = "a.4cdn.org";

/// Host serving full images and their thumbnails.
pub const IMAGE_DOMAIN: &str = "i.4cdn.org";

pub(crate) const DEFAULT_EXT_UA: &str =
    concat!("Rust Thread Content Extractor/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_CLI_UA: &str = concat!("Rust Thread Downloader/", env!("CARGO_PKG_VERSION"));

pub(crate) const EXTRACTOR_UA_NAME: &str = "Rust Thread Content Extractor";

pub(crate) const CLIENT_UA_NAME: &str = "Rust Thread Downloader";

pub mod macros;
pub mod serialize;

pub static DEFAULT_SERVERS: Lazy<HashMap<String, ServerConfig>> = Lazy::new(|| {
    let mut hmap = HashMap::with_capacity(1);
    hmap.insert(
        "4chan".to_string(),
        server_config!(
            "4chan",
            "4chan",
            DEFAULT_CLI_UA,
            DEFAULT_EXT_UA,
            "https://a.4cdn.org",
            "https://i.4cdn.org"
        ),
    );
    hmap
});

/// Where an extractor reads thread data and assets from.
///
/// `api_url` and `image_url` are base urls (scheme and host, no trailing slash). Every other url
/// the extractor touches is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct ServerConfig {
    pub name: String,
    pub pretty_name: String,
    pub client_user_agent: String,
    pub extractor_user_agent: String,
    pub api_url: String,
    pub image_url: String,
}

impl ServerConfig {
    /// JSON endpoint of a thread.
    #[inline]
    pub fn thread_api_url(&self, board: &str, thread_id: &str) -> String {
        format!("{}/{board}/thread/{thread_id}.json", self.api_url)
    }

    /// Hosting url of a full attachment. `ext` carries the leading dot (`.jpg`).
    #[inline]
    pub fn image_url(&self, board: &str, attachment_id: &str, ext: &str) -> String {
        format!("{}/{board}/{attachment_id}{ext}", self.image_url)
    }

    /// Hosting url of an attachment thumbnail. Thumbnails are always jpeg.
    #[inline]
    pub fn thumbnail_url(&self, board: &str, attachment_id: &str) -> String {
        format!("{}/{board}/{attachment_id}s.jpg", self.image_url)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: String::from("4chan"),
            pretty_name: String::from("4chan"),
            client_user_agent: DEFAULT_CLI_UA.to_string(),
            extractor_user_agent: DEFAULT_EXT_UA.to_string(),
            api_url: format!("https://{API_DOMAIN}"),
            image_url: format!("https://{IMAGE_DOMAIN}"),
        }
    }
}

impl Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_server_is_registered() {
        let server = DEFAULT_SERVERS.get("4chan").unwrap();
        assert_eq!(server, &ServerConfig::default());
        assert_eq!(server.to_string(), "4chan");
    }

    #[test]
    fn builders_follow_base_urls() {
        let server = ServerConfig {
            api_url: String::from("http://127.0.0.1:9000"),
            image_url: String::from("http://127.0.0.1:9001"),
            ..ServerConfig::default()
        };

        assert_eq!(
            server.thread_api_url("g", "123"),
            "http://127.0.0.1:9000/g/thread/123.json"
        );
        assert_eq!(
            server.image_url("g", "1700000000000", ".webm"),
            "http://127.0.0.1:9001/g/1700000000000.webm"
        );
        assert_eq!(
            server.thumbnail_url("g", "1700000000000"),
            "http://127.0.0.1:9001/g/1700000000000s.jpg"
        );
    }
}
