//! Trait seams for the network and archive tooling.
//!
//! The installer and orchestrator only talk to these traits, so tests can
//! swap in in-memory implementations.

use std::path::Path;

use super::error::ManagerResult;

/// Progress callback for a single download.
///
/// Arguments: (bytes_downloaded, total_bytes). `total_bytes` is 0 when the
/// server does not report a length.
pub type ProgressCallback<'a> = &'a dyn Fn(u64, u64);

/// Fetches bytes from the package repository.
pub trait PackageDownloader {
    /// Fetch a small document (such as `Updates.xml`) into memory.
    fn fetch(&self, url: &str) -> ManagerResult<Vec<u8>>;

    /// Download `url` to `dest`, returning the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> ManagerResult<u64>;

    /// Download with progress reporting.
    ///
    /// The default implementation reports completion only.
    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback<'_>,
    ) -> ManagerResult<u64> {
        let bytes = self.download(url, dest)?;
        on_progress(bytes, bytes);
        Ok(bytes)
    }
}

/// Expands a downloaded archive into a directory.
pub trait ArchiveExtractor {
    /// Extract `archive_path` into `dest_dir`.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> ManagerResult<()>;
}

impl<T: PackageDownloader + ?Sized> PackageDownloader for &T {
    fn fetch(&self, url: &str) -> ManagerResult<Vec<u8>> {
        (**self).fetch(url)
    }

    fn download(&self, url: &str, dest: &Path) -> ManagerResult<u64> {
        (**self).download(url, dest)
    }

    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback<'_>,
    ) -> ManagerResult<u64> {
        (**self).download_with_progress(url, dest, on_progress)
    }
}

impl<T: ArchiveExtractor + ?Sized> ArchiveExtractor for &T {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> ManagerResult<()> {
        (**self).extract(archive_path, dest_dir)
    }
}
