//! Configuration for the package manager.

use std::path::PathBuf;
use std::time::Duration;

use super::download::DEFAULT_TIMEOUT_SECS;
use super::extractor::DEFAULT_ARCHIVE_TOOL;
use crate::package::DEFAULT_REPOSITORY_URL;

/// Fixed name of the transient archive file inside the install root.
pub const STAGING_FILENAME: &str = "package.7z";

/// Configuration for the package manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Root URL of the Qt online repository.
    pub repository_url: String,

    /// Directory archives are expanded into.
    ///
    /// Defaults to the current working directory. Two installs must not run
    /// against the same root at once since they share the staging file.
    pub install_root: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// 7-Zip executable used for extraction.
    pub archive_tool: PathBuf,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            install_root: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            archive_tool: PathBuf::from(DEFAULT_ARCHIVE_TOOL),
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration with the given install root.
    pub fn new(install_root: PathBuf) -> Self {
        Self {
            install_root,
            ..Default::default()
        }
    }

    /// Set the repository URL.
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the 7-Zip executable.
    pub fn with_archive_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.archive_tool = tool.into();
        self
    }

    /// Path of the transient archive file.
    pub fn staging_path(&self) -> PathBuf {
        self.install_root.join(STAGING_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.repository_url, DEFAULT_REPOSITORY_URL);
        assert_eq!(config.install_root, PathBuf::from("."));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.staging_path(), PathBuf::from("./package.7z"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ManagerConfig::new(PathBuf::from("/opt/qt"))
            .with_repository_url("https://mirror.example.org/qtsdkrepository/")
            .with_timeout(Duration::from_secs(60))
            .with_archive_tool("/usr/bin/7za");

        assert_eq!(config.install_root, PathBuf::from("/opt/qt"));
        assert_eq!(
            config.repository_url,
            "https://mirror.example.org/qtsdkrepository/"
        );
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.archive_tool, PathBuf::from("/usr/bin/7za"));
        assert_eq!(config.staging_path(), PathBuf::from("/opt/qt/package.7z"));
    }
}
