//! Package manager for fetching and installing prebuilt Qt distributions.
//!
//! This module provides the network and filesystem half of qtfetch,
//! complementing the [`package`](crate::package) module which handles
//! naming and resolution.
//!
//! # Overview
//!
//! The manager handles:
//! - Fetching `Updates.xml` manifests from the Qt online repository
//! - Downloading package archives
//! - Expanding archives into the install root
//! - Sequencing the main package and its components
//!
//! # Architecture
//!
//! The manager uses trait-based abstractions for testability:
//!
//! - [`PackageDownloader`] - Fetches manifests and downloads archives
//! - [`ArchiveExtractor`] - Expands a downloaded archive
//!
//! # Example
//!
//! ```ignore
//! use qtfetch::manager::{InstallRequest, ManagerConfig, QtInstaller};
//! use qtfetch::package::{HostOs, Target};
//!
//! let installer = QtInstaller::from_config(ManagerConfig::default())?;
//! let request = InstallRequest::new("6.5.0".parse()?, HostOs::Linux, Target::Desktop)
//!     .with_components(["charts"]);
//!
//! let report = installer.run(&request, None)?;
//! println!("Installed {} packages", report.results.len());
//! ```
//!
//! Installs share a fixed staging file inside the install root, so only one
//! install may run against a given root at a time.

mod client;
mod config;
mod download;
mod error;
mod extractor;
mod installer;
mod orchestrator;
mod traits;

pub use client::ManifestClient;
pub use config::{ManagerConfig, STAGING_FILENAME};
pub use download::{HttpDownloader, DEFAULT_TIMEOUT_SECS};
pub use error::{ErrorKind, ManagerError, ManagerResult};
pub use extractor::{check_required_tools, SevenZipExtractor, DEFAULT_ARCHIVE_TOOL};
pub use installer::{
    describe, ArchiveInstaller, InstallProgressCallback, InstallResult, InstallStage,
};
pub use orchestrator::{InstallReport, InstallRequest, InstallState, InstallationPlan, QtInstaller};
pub use traits::{ArchiveExtractor, PackageDownloader, ProgressCallback};
