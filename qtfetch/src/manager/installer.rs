//! Archive installer for resolved packages.
//!
//! This module runs the per-package install loop:
//! 1. Download each archive to the staging file in the install root
//! 2. Expand it into the install root
//! 3. Remove the staging file, whether or not expansion succeeded
//!
//! An extraction failure stops the package at that archive. Archives already
//! expanded stay on disk; there is no rollback.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::{ManagerError, ManagerResult};
use super::traits::{ArchiveExtractor, PackageDownloader};
use crate::package::{archive_url, ResolvedPackage};

/// Progress callback for installation operations.
///
/// # Arguments
///
/// * `stage` - Current installation stage
/// * `progress` - Fraction of the package's archives processed (0.0 - 1.0)
/// * `message` - Human-readable message
pub type InstallProgressCallback = Box<dyn Fn(InstallStage, f64, &str) + Send + Sync>;

/// Installation stages for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// A package is about to be installed.
    Starting,
    /// Downloading an archive.
    Downloading,
    /// Extracting an archive.
    Extracting,
    /// All archives of the package are installed.
    Complete,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Starting => "Installing",
            Self::Downloading => "Downloading",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        }
    }
}

/// Result of installing one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// Matched manifest entry name.
    pub name: String,
    /// Authoritative package version.
    pub version: String,
    /// Number of archives downloaded and expanded.
    pub archives_installed: usize,
    /// Total bytes downloaded.
    pub bytes_downloaded: u64,
}

/// Downloads and expands the archives of resolved packages.
pub struct ArchiveInstaller<D: PackageDownloader, E: ArchiveExtractor> {
    downloader: D,
    extractor: E,
    install_root: PathBuf,
    staging_path: PathBuf,
}

impl<D: PackageDownloader, E: ArchiveExtractor> ArchiveInstaller<D, E> {
    /// Create a new installer.
    ///
    /// # Arguments
    ///
    /// * `downloader` - Transport for archive downloads
    /// * `extractor` - Archive expansion tool
    /// * `install_root` - Directory archives are expanded into
    /// * `staging_path` - Fixed transient file each archive is downloaded to
    pub fn new(
        downloader: D,
        extractor: E,
        install_root: impl Into<PathBuf>,
        staging_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            extractor,
            install_root: install_root.into(),
            staging_path: staging_path.into(),
        }
    }

    /// Install every archive of `package` in order.
    pub fn install(
        &self,
        package: &ResolvedPackage,
        on_progress: Option<&InstallProgressCallback>,
    ) -> ManagerResult<InstallResult> {
        let report = |stage: InstallStage, progress: f64, message: &str| {
            if let Some(cb) = on_progress {
                cb(stage, progress, message);
            }
        };

        fs::create_dir_all(&self.install_root).map_err(|e| ManagerError::CreateDirFailed {
            path: self.install_root.clone(),
            source: e,
        })?;

        let total = package.archives.len();
        let mut bytes_downloaded = 0u64;

        report(InstallStage::Starting, 0.0, &describe(package));

        for (index, archive) in package.archives.iter().enumerate() {
            let progress = index as f64 / total as f64;
            let url = archive_url(&package.base_url, &package.version, archive);

            let message = format!("Downloading {}...", archive);
            report(InstallStage::Downloading, progress, &message);
            debug!(url = %url, "Downloading archive");

            let on_bytes = |done: u64, size: u64| {
                if size > 0 {
                    let fraction = (done as f64 / size as f64).min(1.0);
                    report(
                        InstallStage::Downloading,
                        (index as f64 + fraction) / total as f64,
                        &message,
                    );
                }
            };

            let staged = StagedArchive::new(&self.staging_path);
            bytes_downloaded += self
                .downloader
                .download_with_progress(&url, staged.path(), &on_bytes)?;

            report(
                InstallStage::Extracting,
                progress,
                &format!("Extracting {}...", archive),
            );
            self.extractor.extract(staged.path(), &self.install_root)?;
            debug!(archive = %archive, "Archive extracted");
        }

        report(InstallStage::Complete, 1.0, &format!("Installed {}", package.name));
        info!(
            package = %package.name,
            version = %package.version,
            archives = total,
            bytes = bytes_downloaded,
            "Package installed"
        );

        Ok(InstallResult {
            name: package.name.clone(),
            version: package.version.clone(),
            archives_installed: total,
            bytes_downloaded,
        })
    }
}

/// Display line for a package: description followed by the entry name.
pub fn describe(package: &ResolvedPackage) -> String {
    if package.description.is_empty() {
        package.name.clone()
    } else {
        format!("{} ({})", package.description, package.name)
    }
}

/// Transient archive file, removed when dropped.
struct StagedArchive<'a> {
    path: &'a Path,
}

impl<'a> StagedArchive<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        self.path
    }
}

impl Drop for StagedArchive<'_> {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove staging file");
            }
        }
    }
}
