//! Content extractor for `https://boards.4chan.org` threads
//!
//! The thread extractor has the following features:
//! - One full image descriptor for each post that has an attachment
//! - A companion thumbnail descriptor, only when the thumbnail is online
//! - MD5 checksums decoded from the API
//!
//! Everything is read from the public JSON API (`a.4cdn.org`) and the image host (`i.4cdn.org`),
//! both configurable through [`ServerConfig`].
use chandl_common::{
    chrono::{DateTime, Utc},
    content::{Content, ContentManifest, ContentMetadata, HttpResource, BEST_QUALITY},
    log::debug,
    reqwest::{Client, StatusCode},
};
use futures::{stream, StreamExt};
use std::{
    fs::rename,
    path::{Path, PathBuf},
    vec,
};

use crate::error::ExtractorError;
use crate::extractor::{ContentStream, Extractor};
use crate::extractor_config::ServerConfig;

use self::helpers::{content_id, content_length, decode_checksum, fetch_thread, guess_mime_type};
use self::models::{Post, RawPost};
pub use self::url::{ThreadReference, THREAD_PATTERN};

pub mod helpers;
pub mod models;
mod url;

pub const EXTRACTOR_NAME: &str = "4chan Thread";

pub const DOMAINS: &[&str] = &["boards.4chan.org", "boards.4channel.org"];

const IMAGE_NAME: &str = "Post Image";

const THUMBNAIL_NAME: &str = "Post Thumbnail";

const THUMBNAIL_QUALITY: f64 = 0.0;

/// Thumbnails are always served as jpeg, whatever the attachment type.
const THUMBNAIL_MIME_TYPE: &str = "image/jpeg";

/// Extractor for every attachment posted in a single thread.
#[derive(Debug, Clone)]
pub struct ThreadExtractor {
    client: Client,
    server_cfg: ServerConfig,
}

impl ThreadExtractor {
    /// Sets up the extractor against the public 4chan hosts.
    pub fn new() -> Result<Self, ExtractorError> {
        Self::new_with_config(ServerConfig::default())
    }

    /// Sets up the extractor against the hosts in `config`.
    pub fn new_with_config(config: ServerConfig) -> Result<Self, ExtractorError> {
        let client = Client::builder()
            .user_agent(&config.extractor_user_agent)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub const fn with_client(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            server_cfg: config,
        }
    }

    /// Return the current configured [server](crate::extractor_config) for this extractor
    pub const fn config(&self) -> &ServerConfig {
        &self.server_cfg
    }
}

impl Extractor for ThreadExtractor {
    fn name(&self) -> &str {
        EXTRACTOR_NAME
    }

    fn domains(&self) -> &[&'static str] {
        DOMAINS
    }

    fn can_handle(&self, url: &str) -> bool {
        THREAD_PATTERN.is_match(url)
    }

    fn iter_content(&self, url: &str) -> Result<ContentStream, ExtractorError> {
        let thread = ThreadReference::parse(url)?;
        debug!("Extracting content from thread {thread}");

        let cursor = ThreadCursor {
            client: self.client.clone(),
            server: self.server_cfg.clone(),
            thread,
            source_url: url.to_string(),
            posts: None,
            thumbnail: None,
        };

        let contents = stream::try_unfold(cursor, |mut cursor| async move {
            let next = cursor.next_content().await?;
            Ok::<_, ExtractorError>(next.map(|content| (content, cursor)))
        });

        Ok(contents.boxed())
    }

    /// Content from a thread is never chunked, so the manifest must hold exactly one artifact.
    fn write_content(
        &self,
        manifest: ContentManifest,
        to_path: &Path,
    ) -> Result<PathBuf, ExtractorError> {
        let [(_, artifact)] = manifest.artifacts.as_slice() else {
            return Err(ExtractorError::ManifestArity {
                extractor: EXTRACTOR_NAME.to_string(),
                expected: 1,
                actual: manifest.len(),
            });
        };

        debug!(
            "Merging {} into {}",
            artifact.display(),
            to_path.display()
        );
        rename(artifact, to_path).map_err(|source| ExtractorError::ArtifactMove {
            artifact: artifact.clone(),
            destination: to_path.to_path_buf(),
            source,
        })?;

        Ok(to_path.to_path_buf())
    }

    fn client(&self) -> Client {
        self.client.clone()
    }
}

/// State of a single `iter_content` call.
///
/// The thread is fetched on the first pull. Each post then yields its image, and the thumbnail
/// probe is deferred to the following pull so the image always comes first.
struct ThreadCursor {
    client: Client,
    server: ServerConfig,
    thread: ThreadReference,
    source_url: String,
    posts: Option<vec::IntoIter<RawPost>>,
    thumbnail: Option<ThumbnailProbe>,
}

impl ThreadCursor {
    async fn next_content(&mut self) -> Result<Option<Content>, ExtractorError> {
        if let Some(probe) = self.thumbnail.take() {
            if let Some(thumbnail) = probe.resolve(&self.client).await? {
                return Ok(Some(thumbnail));
            }
        }

        if self.posts.is_none() {
            let thread = fetch_thread(
                &self.client,
                &self.server,
                &self.thread.board,
                &self.thread.thread_id,
            )
            .await?;
            self.posts = Some(thread.posts.into_iter());
        }

        loop {
            let Some(raw) = self.posts.as_mut().and_then(Iterator::next) else {
                debug!("No more posts in thread {}", self.thread);
                return Ok(None);
            };

            if let Some((image, probe)) = self.map_post(raw).await? {
                self.thumbnail = Some(probe);
                return Ok(Some(image));
            }
        }
    }

    /// Builds the image descriptor of a post, or `None` if the post has no attachment.
    async fn map_post(
        &self,
        raw: RawPost,
    ) -> Result<Option<(Content, ThumbnailProbe)>, ExtractorError> {
        let post = Post::from_raw(&raw)?;

        let (Some(filename), Some(ext)) = (post.filename.as_deref(), post.ext.as_deref()) else {
            debug!("Skipping post {} since it has no attachment", post.no);
            return Ok(None);
        };

        let board = self.thread.board.as_str();
        let post_id = post.no.to_string();
        let attachment_id = post
            .tim
            .ok_or_else(|| missing_field("tim"))?
            .to_string();

        let image_url = self.server.image_url(board, &attachment_id, ext);
        let mime_type = guess_mime_type(&image_url);
        let thumbnail_url = self.server.thumbnail_url(board, &attachment_id);

        let metadata = ContentMetadata {
            id: Some(post_id.clone()),
            description: post.com.clone(),
            publisher: post.name.clone(),
            published_at: post
                .time
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            filename: Some(filename.to_string()),
            thumbnail: Some(thumbnail_url.clone()),
        };

        let size = match post.fsize {
            Some(size) => size,
            None => self.probe_size(&image_url).await?,
        };

        let checksum = decode_checksum(post.md5.as_deref().ok_or_else(|| missing_field("md5"))?)?;

        let id = content_id(board, &post_id);

        let image = Content {
            id: id.clone(),
            group: id.clone(),
            name: IMAGE_NAME.to_string(),
            url: self.source_url.clone(),
            quality: BEST_QUALITY,
            size,
            mime_type,
            resources: vec![HttpResource::get(image_url)],
            metadata: metadata.clone(),
            checksums: vec![checksum],
            extra: raw.clone(),
        };

        let probe = ThumbnailProbe {
            group: id,
            url: thumbnail_url,
            source_url: self.source_url.clone(),
            metadata,
            extra: raw,
        };

        Ok(Some((image, probe)))
    }

    /// Older API responses may omit `fsize`, so ask the image host instead.
    async fn probe_size(&self, image_url: &str) -> Result<u64, ExtractorError> {
        debug!("Post has no file size, probing {image_url}");
        let response = self.client.head(image_url).send().await?;
        Ok(content_length(response.headers()))
    }
}

/// Everything needed to emit a thumbnail descriptor once its url is confirmed to be online.
struct ThumbnailProbe {
    group: String,
    url: String,
    source_url: String,
    metadata: ContentMetadata,
    extra: RawPost,
}

impl ThumbnailProbe {
    async fn resolve(self, client: &Client) -> Result<Option<Content>, ExtractorError> {
        let response = client.head(&self.url).send().await?;

        if response.status() != StatusCode::OK {
            debug!(
                "Thumbnail {} is unavailable (status {})",
                self.url,
                response.status()
            );
            return Ok(None);
        }

        Ok(Some(Content {
            id: format!("{}-thumbnail", self.group),
            group: self.group,
            name: THUMBNAIL_NAME.to_string(),
            url: self.source_url,
            quality: THUMBNAIL_QUALITY,
            size: content_length(response.headers()),
            mime_type: THUMBNAIL_MIME_TYPE.to_string(),
            resources: vec![HttpResource::get(self.url)],
            metadata: self.metadata,
            checksums: Vec::new(),
            extra: self.extra,
        }))
    }
}

fn missing_field(field: &str) -> ExtractorError {
    ExtractorError::MissingField {
        field: field.to_string(),
    }
}
