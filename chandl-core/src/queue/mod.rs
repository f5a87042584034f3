//! Queue used to download, verify and save every content an [`Extractor`] finds behind a url.
//!
//! # Example usage
//!
//! ```rust,no_run
//! use chandl_core::queue::{Queue, QueueOpts};
//! use chandl_extractors::prelude::*;
//! use std::path::Path;
//!
//! async fn download_thread() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://boards.4chan.org/g/thread/123456";
//!
//!     let config = ServerConfig::default();
//!     let registry = ExtractorRegistry::with_defaults(config.clone())?;
//!     let extractor = registry.resolve(url)?;
//!
//!     let sd = 5; // Number of simultaneous downloads.
//!
//!     let queue = Queue::new(&config, sd, None, QueueOpts::default(), None)?;
//!
//!     let summary = queue
//!         .download(extractor, url, Path::new("./g/123456"))
//!         .await?;
//!
//!     println!("{} files downloaded", summary.downloaded.len());
//!     Ok(())
//! }
//! ```
use std::future::ready;
use std::path::Path;

use chandl_common::{log::debug, reqwest::Client};
use chandl_extractors::{extractor::Extractor, extractor_config::ServerConfig};
use futures::StreamExt;
use tokio::fs::create_dir_all;

use crate::error::{DownloadError, QueueError};
use crate::progress::{no_op_progress_listener, LogType, SharedProgressListener};

use self::summary::{DownloadStatus, DownloadSummary};

mod folder;
pub mod summary;

/// Options that change what gets saved and how existing files are treated.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOpts {
    /// Also save the lower quality variants (thumbnails) instead of only the best one of each group.
    pub thumbnails: bool,
    /// Replace existing files whose checksum can't be confirmed. When `false` they are kept.
    pub overwrite: bool,
    /// Write a `<content id>.json` file with the full descriptor next to each download.
    pub metadata: bool,
}

/// Struct where all the downloading and verification will take place
pub struct Queue {
    /// The number of concurrent downloads allowed.
    sim_downloads: u8,
    client: Client,
    thumbnails: bool,
    overwrite: bool,
    metadata: bool,
    progress_listener: SharedProgressListener,
}

impl Queue {
    /// Set up the queue for download
    ///
    /// Without a `custom_client`, one is built with the client user agent from `server_config`.
    pub fn new(
        server_config: &ServerConfig,
        sim_downloads: u8,
        custom_client: Option<Client>,
        options: QueueOpts,
        progress_listener: Option<SharedProgressListener>,
    ) -> Result<Self, QueueError> {
        let client = match custom_client {
            Some(cli) => cli,
            None => Client::builder()
                .user_agent(&server_config.client_user_agent)
                .build()?,
        };

        Ok(Self {
            sim_downloads: sim_downloads.max(1),
            client,
            thumbnails: options.thumbnails,
            overwrite: options.overwrite,
            metadata: options.metadata,
            progress_listener: progress_listener.unwrap_or_else(no_op_progress_listener),
        })
    }

    /// Extracts everything behind `url` and saves it into `output_dir`.
    ///
    /// Only an invalid url or an unusable output dir abort the run. Every other failure,
    /// including an extraction error midway through the thread, is collected in the returned
    /// [`DownloadSummary`].
    pub async fn download(
        &self,
        extractor: &dyn Extractor,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadSummary, QueueError> {
        let contents = extractor.iter_content(url)?;

        self.create_out(output_dir).await?;

        debug!(
            "Downloading content from {} with {} into {}",
            url,
            extractor.name(),
            output_dir.display()
        );

        let thumbnails = self.thumbnails;

        let summary = contents
            .filter(move |item| {
                ready(match item {
                    Ok(content) => thumbnails || content.is_best_quality(),
                    Err(_) => true,
                })
            })
            .map(move |item| {
                self.progress_listener.inc_main_total(1);

                async move {
                    match item {
                        Ok(content) => {
                            let id = content.id.clone();
                            (id, self.fetch_content(extractor, content, output_dir).await)
                        }
                        Err(error) => (url.to_string(), Err(DownloadError::from(error))),
                    }
                }
            })
            .buffer_unordered(self.sim_downloads as usize)
            .fold(DownloadSummary::default(), |mut summary, (id, result)| {
                self.report(&id, &result);
                self.progress_listener.main_tick();
                summary.record(id, result);
                ready(summary)
            })
            .await;

        self.progress_listener.main_done();

        Ok(summary)
    }

    fn report(&self, id: &str, result: &Result<DownloadStatus, DownloadError>) {
        match result {
            Ok(DownloadStatus::Downloaded(path)) => {
                let name = path
                    .file_name()
                    .map_or_else(|| id.to_string(), |n| n.to_string_lossy().into_owned());
                self.progress_listener
                    .log_event(LogType::Success, &name, "downloaded");
            }
            // Already reported while checking the file
            Ok(DownloadStatus::Skipped(_)) => {}
            Err(error) => {
                debug!("Failed to download {id}: {error}");
                self.progress_listener
                    .log_event(LogType::Error, id, &error.to_string());
            }
        }
    }

    async fn create_out(&self, dir: &Path) -> Result<(), QueueError> {
        debug!("Target dir: {}", dir.display());
        if let Err(error) = create_dir_all(dir).await {
            return Err(QueueError::DirCreationError {
                message: error.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chandl_common::serde_json::{self, json, Value};
    use crate::progress::{DownloadProgressUpdater, ProgressListener};
    use chandl_extractors::{error::ExtractorError, imageboards::fourchan::ThreadExtractor};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const THREAD_URL: &str = "https://boards.4chan.org/test/thread/123";
    const IMAGE_BYTES: &[u8] = b"full image bytes";
    // base64 of md5("full image bytes")
    const IMAGE_MD5: &str = "+rEx98XYO9rzTX9QEzYHQA==";
    const IMAGE_MD5_HEX: &str = "fab131f7c5d83bdaf34d7f5013360740";

    struct Setup {
        server: MockServer,
        config: ServerConfig,
        extractor: ThreadExtractor,
    }

    async fn setup(posts: Value) -> Setup {
        let server = MockServer::start().await;
        let config = ServerConfig {
            api_url: server.uri(),
            image_url: server.uri(),
            ..ServerConfig::default()
        };

        Mock::given(method("GET"))
            .and(path("/test/thread/123.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": posts })))
            .mount(&server)
            .await;

        let extractor = ThreadExtractor::new_with_config(config.clone()).unwrap();
        Setup {
            server,
            config,
            extractor,
        }
    }

    fn image_post(md5: &str) -> Value {
        json!([{
            "no": 1,
            "tim": 111,
            "ext": ".jpg",
            "filename": "a",
            "fsize": IMAGE_BYTES.len(),
            "md5": md5,
        }])
    }

    async fn mount_image(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/test/111.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn mount_thumbnail(server: &MockServer) {
        let body = b"thumb bytes";
        Mock::given(method("HEAD"))
            .and(path("/test/111s.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-length", body.len().to_string().as_str())
                    .set_body_bytes(body.as_slice()),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/test/111s.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.as_slice()))
            .mount(server)
            .await;
    }

    /// Records every size a download task was given, in call order.
    #[derive(Debug, Default)]
    struct SizeRecorder {
        sizes: Arc<Mutex<Vec<(String, Option<u64>)>>>,
    }

    #[derive(Debug)]
    struct SizeRecorderTask {
        name: String,
        sizes: Arc<Mutex<Vec<(String, Option<u64>)>>>,
    }

    impl ProgressListener for SizeRecorder {
        fn inc_main_total(&self, _delta: u64) {}
        fn main_tick(&self) {}
        fn main_done(&self) {}
        fn add_download_task(
            &self,
            name: String,
            total_size: Option<u64>,
        ) -> Box<dyn DownloadProgressUpdater> {
            self.sizes.lock().unwrap().push((name.clone(), total_size));
            Box::new(SizeRecorderTask {
                name,
                sizes: Arc::clone(&self.sizes),
            })
        }
        fn log_event(&self, _log_type: LogType, _target: &str, _message: &str) {}
    }

    impl DownloadProgressUpdater for SizeRecorderTask {
        fn set_progress(&self, _bytes_downloaded: u64) {}
        fn set_total_size(&self, total_size: u64) {
            self.sizes
                .lock()
                .unwrap()
                .push((self.name.clone(), Some(total_size)));
        }
        fn finish(&self) {}
    }

    fn queue(config: &ServerConfig, options: QueueOpts) -> Queue {
        Queue::new(config, 5, None, options, None).unwrap()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn downloads_and_verifies_images() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 1).await;
        mount_thumbnail(&setup.server).await;

        let out = tempdir().unwrap();
        let output_dir = out.path().join("test").join("123");

        let summary = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, THREAD_URL, &output_dir)
            .await
            .unwrap();

        let target = output_dir.join("4chan-test-1.jpg");
        assert!(summary.is_success());
        assert_eq!(summary.downloaded, vec![target.clone()]);
        assert_eq!(fs::read(&target).unwrap(), IMAGE_BYTES);
        // Thumbnails are left out and no staging dir survives
        assert_eq!(dir_entries(&output_dir), ["4chan-test-1.jpg"]);
    }

    #[tokio::test]
    async fn thumbnails_are_opt_in() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 1).await;
        mount_thumbnail(&setup.server).await;

        let out = tempdir().unwrap();
        let options = QueueOpts {
            thumbnails: true,
            ..QueueOpts::default()
        };

        let summary = queue(&setup.config, options)
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert_eq!(summary.downloaded.len(), 2);
        assert_eq!(
            dir_entries(out.path()),
            ["4chan-test-1-thumbnail.jpg", "4chan-test-1.jpg"]
        );
        assert_eq!(
            fs::read(out.path().join("4chan-test-1-thumbnail.jpg")).unwrap(),
            b"thumb bytes"
        );
    }

    #[tokio::test]
    async fn unknown_sizes_are_taken_from_the_response() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 1).await;
        // Thumbnail probe answers without a length, so its descriptor has size 0
        Mock::given(method("HEAD"))
            .and(path("/test/111s.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&setup.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/test/111s.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"thumb bytes".as_slice()))
            .mount(&setup.server)
            .await;

        let recorder = Arc::new(SizeRecorder::default());
        let options = QueueOpts {
            thumbnails: true,
            ..QueueOpts::default()
        };
        let queue = Queue::new(
            &setup.config,
            1,
            None,
            options,
            Some(recorder.clone() as SharedProgressListener),
        )
        .unwrap();

        let out = tempdir().unwrap();
        let summary = queue
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();
        assert_eq!(summary.downloaded.len(), 2);

        let sizes = recorder.sizes.lock().unwrap();
        let image: Vec<_> = sizes
            .iter()
            .filter(|(name, _)| name == "4chan-test-1.jpg")
            .map(|(_, size)| *size)
            .collect();
        let thumbnail: Vec<_> = sizes
            .iter()
            .filter(|(name, _)| name == "4chan-test-1-thumbnail.jpg")
            .map(|(_, size)| *size)
            .collect();

        assert_eq!(image, [Some(IMAGE_BYTES.len() as u64)]);
        assert_eq!(thumbnail, [None, Some(11)]);
    }

    #[tokio::test]
    async fn reuses_a_custom_client() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        Mock::given(method("GET"))
            .and(path("/test/111.jpg"))
            .and(header("user-agent", "thread-saver/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES))
            .expect(1)
            .mount(&setup.server)
            .await;

        let client = Client::builder()
            .user_agent("thread-saver/1.0")
            .build()
            .unwrap();
        let extractor = ThreadExtractor::with_client(client, setup.config.clone());

        let out = tempdir().unwrap();
        let queue = Queue::new(
            &setup.config,
            5,
            Some(extractor.client()),
            QueueOpts::default(),
            None,
        )
        .unwrap();
        let summary = queue
            .download(&extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.downloaded.len(), 1);
    }

    #[tokio::test]
    async fn checksum_mismatch_removes_the_file() {
        let setup = setup(image_post("AAAAAAAAAAAAAAAAAAAAAA==")).await;
        mount_image(&setup.server, 1).await;

        let out = tempdir().unwrap();
        let summary = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert!(summary.downloaded.is_empty());
        match &summary.failed[..] {
            [(id, DownloadError::ChecksumMismatch { expected, actual, .. })] => {
                assert_eq!(id, "4chan-test-1");
                assert_eq!(expected, "00000000000000000000000000000000");
                assert_eq!(actual, IMAGE_MD5_HEX);
            }
            other => panic!("expected a checksum mismatch, got {other:?}"),
        }
        assert!(dir_entries(out.path()).is_empty());
    }

    #[tokio::test]
    async fn identical_files_are_skipped() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 0).await;

        let out = tempdir().unwrap();
        let target = out.path().join("4chan-test-1.jpg");
        fs::write(&target, IMAGE_BYTES).unwrap();

        let summary = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert_eq!(summary.skipped, vec![target]);
        assert!(summary.downloaded.is_empty());
    }

    #[tokio::test]
    async fn different_files_are_kept_without_overwrite() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 0).await;

        let out = tempdir().unwrap();
        let target = out.path().join("4chan-test-1.jpg");
        fs::write(&target, b"local edit").unwrap();

        let summary = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert_eq!(summary.skipped, vec![target.clone()]);
        assert_eq!(fs::read(&target).unwrap(), b"local edit");
    }

    #[tokio::test]
    async fn different_files_are_replaced_with_overwrite() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 1).await;

        let out = tempdir().unwrap();
        let target = out.path().join("4chan-test-1.jpg");
        fs::write(&target, b"local edit").unwrap();

        let options = QueueOpts {
            overwrite: true,
            ..QueueOpts::default()
        };
        let summary = queue(&setup.config, options)
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert_eq!(summary.downloaded, vec![target.clone()]);
        assert_eq!(fs::read(&target).unwrap(), IMAGE_BYTES);
    }

    #[tokio::test]
    async fn writes_metadata_files() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        mount_image(&setup.server, 1).await;

        let out = tempdir().unwrap();
        let options = QueueOpts {
            metadata: true,
            ..QueueOpts::default()
        };
        queue(&setup.config, options)
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        let raw = fs::read_to_string(out.path().join("4chan-test-1.json")).unwrap();
        let metadata: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(metadata["id"], "4chan-test-1");
        assert_eq!(metadata["url"], THREAD_URL);
        assert_eq!(metadata["metadata"]["filename"], "a");
    }

    #[tokio::test]
    async fn missing_remote_file_is_a_failure() {
        let setup = setup(image_post(IMAGE_MD5)).await;
        Mock::given(method("GET"))
            .and(path("/test/111.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&setup.server)
            .await;

        let out = tempdir().unwrap();
        let summary = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        assert!(matches!(
            &summary.failed[..],
            [(_, DownloadError::RemoteFileNotFound { status: 404, .. })]
        ));
        assert!(dir_entries(out.path()).is_empty());
    }

    #[tokio::test]
    async fn extraction_errors_are_collected() {
        let server = MockServer::start().await;
        let config = ServerConfig {
            api_url: server.uri(),
            image_url: server.uri(),
            ..ServerConfig::default()
        };
        let extractor = ThreadExtractor::new_with_config(config.clone()).unwrap();

        let out = tempdir().unwrap();
        let summary = queue(&config, QueueOpts::default())
            .download(&extractor, THREAD_URL, out.path())
            .await
            .unwrap();

        match &summary.failed[..] {
            [(id, DownloadError::Extractor(ExtractorError::FetchFailed { status, .. }))] => {
                assert_eq!(id, THREAD_URL);
                assert_eq!(*status, 404);
            }
            other => panic!("expected a fetch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_urls_abort_before_touching_the_disk() {
        let setup = setup(json!([])).await;

        let out = tempdir().unwrap();
        let output_dir: PathBuf = out.path().join("never");
        let result = queue(&setup.config, QueueOpts::default())
            .download(&setup.extractor, "https://example.com/g/thread/1", &output_dir)
            .await;

        assert!(matches!(
            result,
            Err(QueueError::Extractor(ExtractorError::UrlMismatch { .. }))
        ));
        assert!(!output_dir.exists());
    }
}
