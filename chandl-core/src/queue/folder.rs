use std::path::Path;

use chandl_common::{
    content::{Content, ContentManifest, HttpResource},
    log::debug,
};
use chandl_extractors::extractor::Extractor;
use futures::StreamExt;
use tempfile::Builder;
use tokio::{
    fs::{read, remove_file, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
};

use crate::error::DownloadError;
use crate::progress::LogType;

use super::summary::DownloadStatus;
use super::Queue;

/// Prefix of the per-content staging dirs created inside the output dir.
const STAGING_PREFIX: &str = ".chandl-";

impl Queue {
    /// Fetches every resource of `content` into a staging dir, lets the extractor merge them into
    /// `<output_dir>/<content file name>` and verifies the result.
    pub(crate) async fn fetch_content(
        &self,
        extractor: &dyn Extractor,
        content: Content,
        output_dir: &Path,
    ) -> Result<DownloadStatus, DownloadError> {
        let target = output_dir.join(content.file_name());

        if self.check_file_exists(&content, &target).await? {
            return Ok(DownloadStatus::Skipped(target));
        }

        // Must live on the same filesystem as `target` for the merge rename to work
        let staging = Builder::new().prefix(STAGING_PREFIX).tempdir_in(output_dir)?;
        let mut manifest = ContentManifest::new(&content.id);

        for (idx, resource) in content.resources.iter().enumerate() {
            let artifact = staging.path().join(format!("{idx}.part"));
            self.fetch_resource(&content, resource, &artifact).await?;
            manifest.push(resource.clone(), artifact);
        }

        let merged = extractor.write_content(manifest, &target)?;
        Self::verify(&content, &merged).await?;

        if self.metadata {
            Self::write_metadata(&content, output_dir).await?;
        }

        Ok(DownloadStatus::Downloaded(merged))
    }

    /// Checks if the content was already saved to `target`.
    ///
    /// # Returns
    /// * `Ok(true)`: The file exists and is identical, or it differs but overwriting is disabled. Download should be **skipped**.
    /// * `Ok(false)`: The file does not exist or was removed. Download should **proceed**.
    async fn check_file_exists(
        &self,
        content: &Content,
        target: &Path,
    ) -> Result<bool, DownloadError> {
        if !target.exists() {
            return Ok(false);
        }

        let file_name = content.file_name();

        if let Some(expected) = content.md5() {
            let file_content = read(target).await?;

            if expected.matches(&file_content) {
                self.progress_listener.log_event(
                    LogType::Skip,
                    &file_name,
                    "already exists and is identical (MD5 match)",
                );
                return Ok(true);
            }
        }

        if !self.overwrite {
            self.progress_listener.log_event(
                LogType::Skip,
                &file_name,
                "already exists, keeping the local copy",
            );
            return Ok(true);
        }

        remove_file(target).await?;
        self.progress_listener.log_event(
            LogType::Remove,
            &file_name,
            "removed existing file, will redownload",
        );
        Ok(false)
    }

    async fn fetch_resource(
        &self,
        content: &Content,
        resource: &HttpResource,
        artifact: &Path,
    ) -> Result<(), DownloadError> {
        let fname = content.file_name();

        debug!(
            "Fetching {} for content {} into {}",
            resource,
            content.id,
            artifact.display()
        );

        let res = self
            .client
            .request(resource.method.into(), &resource.url)
            .send()
            .await?;

        if !res.status().is_success() {
            debug!(
                "Resource {} (file: {}) returned status {}",
                resource.url,
                fname,
                res.status().as_str()
            );
            return Err(DownloadError::RemoteFileNotFound {
                url: resource.url.clone(),
                status: res.status().as_u16(),
            });
        }

        let dl_updater = self
            .progress_listener
            .add_download_task(fname.clone(), (content.size > 0).then_some(content.size));

        // Descriptors with an unknown size fall back to what the server announces
        if content.size == 0 {
            if let Some(len) = res.content_length() {
                dl_updater.set_total_size(len);
            }
        }
        let mut downloaded_bytes = 0;

        let mut stream = res.bytes_stream();

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(artifact)
            .await?;

        let mut bw = BufWriter::new(file);

        while let Some(item) = stream.next().await {
            let mut chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    dl_updater.finish();
                    return Err(DownloadError::ChunkDownloadFail {
                        message: e.to_string(),
                    });
                }
            };
            downloaded_bytes += chunk.len() as u64;
            dl_updater.set_progress(downloaded_bytes);

            if let Err(e) = bw.write_all_buf(&mut chunk).await {
                dl_updater.finish();
                return Err(e.into());
            }
        }

        if let Err(e) = bw.flush().await {
            dl_updater.finish();
            return Err(e.into());
        }

        dl_updater.finish();
        debug!("Finished fetching {} ({} bytes)", resource.url, downloaded_bytes);
        Ok(())
    }

    /// Compares the merged file against the MD5 the website announced. Mismatching files are removed.
    async fn verify(content: &Content, merged: &Path) -> Result<(), DownloadError> {
        let Some(expected) = content.md5() else {
            return Ok(());
        };

        let file_content = read(merged).await?;
        let actual = expected.digest(&file_content);

        if actual != expected.value {
            remove_file(merged).await?;
            return Err(DownloadError::ChecksumMismatch {
                file: merged.to_path_buf(),
                expected: expected.value.clone(),
                actual,
            });
        }

        Ok(())
    }

    /// Writes the full descriptor as `<content id>.json` next to the downloaded file.
    async fn write_metadata(content: &Content, output_dir: &Path) -> Result<(), DownloadError> {
        let outpath = output_dir.join(format!("{}.json", content.id));
        let serialized = serde_json::to_string_pretty(content)?;

        let mut metadata_file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&outpath)
            .await?;

        metadata_file.write_all(serialized.as_bytes()).await?;
        debug!("Wrote metadata file for {}", content.id);
        Ok(())
    }
}
