//! HTTP-based repository downloader.
//!
//! This module provides the blocking HTTP transport used for both the
//! `Updates.xml` manifest and the package archives. Downloads always start
//! from scratch; partial files are never resumed.
//!
//! The configured timeout bounds connection setup for every request and the
//! whole exchange for manifest fetches. Archive bodies have no overall
//! deadline.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::traits::{PackageDownloader, ProgressCallback};

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// HTTP-based package downloader.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
    pub(crate) timeout: Duration,
}

/// Map a request failure to a transport error.
fn transport_error(url: &str, timeout: Duration, e: reqwest::Error) -> ManagerError {
    if e.is_timeout() {
        ManagerError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    } else {
        ManagerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

impl HttpDownloader {
    /// Create a new HTTP downloader with default settings.
    pub fn new() -> ManagerResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP downloader with custom timeout.
    pub fn with_timeout(timeout: Duration) -> ManagerResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(None)
            .user_agent(concat!("qtfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ManagerError::HttpError(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Send a GET request and check the response status.
    ///
    /// `deadline` bounds the whole exchange, body included.
    fn get(&self, url: &str, deadline: Option<Duration>) -> ManagerResult<Response> {
        let mut request = self.client.get(url);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request
            .send()
            .map_err(|e| transport_error(url, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        Ok(response)
    }

    /// Stream the response body to the destination file.
    fn stream_download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressCallback<'_>>,
    ) -> ManagerResult<u64> {
        let mut response = self.get(url, None)?;
        let total_size = response.content_length().unwrap_or(0);

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let file = File::create(dest).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            let bytes_read =
                response
                    .read(&mut buffer)
                    .map_err(|e| ManagerError::DownloadFailed {
                        url: url.to_string(),
                        reason: format!("Read error: {}", e),
                    })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;

            if let Some(cb) = progress {
                cb(downloaded, total_size);
            }
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(downloaded)
    }
}

impl PackageDownloader for HttpDownloader {
    fn fetch(&self, url: &str) -> ManagerResult<Vec<u8>> {
        let response = self.get(url, Some(self.timeout))?;
        let bytes = response
            .bytes()
            .map_err(|e| transport_error(url, self.timeout, e))?;
        Ok(bytes.to_vec())
    }

    fn download(&self, url: &str, dest: &Path) -> ManagerResult<u64> {
        self.stream_download(url, dest, None)
    }

    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback<'_>,
    ) -> ManagerResult<u64> {
        self.stream_download(url, dest, Some(on_progress))
    }
}
