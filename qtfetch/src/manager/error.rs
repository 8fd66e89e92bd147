//! Error types for the package manager.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Coarse classification of a [`ManagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing caller-supplied settings.
    Configuration,
    /// Manifest or archive download failure.
    Transport,
    /// Malformed manifest document.
    Parse,
    /// No manifest entry matched the request.
    Resolution,
    /// The archive tool failed.
    Extraction,
    /// Local filesystem failure.
    Io,
}

/// Errors that can occur while resolving and installing Qt packages.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Invalid configuration or unsupported option.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No explicit architecture and no default for the host/target pair.
    #[error("please supply a target architecture for {host}/{target}")]
    ArchitectureRequired { host: String, target: String },

    /// Failed to download a manifest or archive.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Network timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The manifest is not well-formed XML.
    #[error("failed to parse manifest from {url}: {reason}")]
    ManifestParseFailed { url: String, reason: String },

    /// A matched manifest entry lacks a required child element.
    #[error("manifest entry {name} is missing required element <{field}>")]
    MissingField { name: String, field: &'static str },

    /// No manifest entry matched any candidate name.
    #[error("package not found: version {version}, arch {arch}, component {component}")]
    PackageNotFound {
        version: String,
        arch: String,
        component: String,
    },

    /// Archive extraction failed.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },
}

impl ManagerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) | Self::ArchitectureRequired { .. } => ErrorKind::Configuration,
            Self::DownloadFailed { .. } | Self::Timeout { .. } | Self::HttpError(_) => {
                ErrorKind::Transport
            }
            Self::ManifestParseFailed { .. } | Self::MissingField { .. } => ErrorKind::Parse,
            Self::PackageNotFound { .. } => ErrorKind::Resolution,
            Self::ExtractionFailed { .. } => ErrorKind::Extraction,
            Self::ReadFailed { .. } | Self::WriteFailed { .. } | Self::CreateDirFailed { .. } => {
                ErrorKind::Io
            }
        }
    }
}
