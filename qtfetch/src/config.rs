//! Configuration file handling.
//!
//! Settings live in `config.ini` under the user's configuration directory:
//!
//! ```ini
//! [repository]
//! base_url = https://download.qt.io/online/qtsdkrepository/
//! timeout_secs = 300
//!
//! [install]
//! install_root = /opt/qt
//! archive_tool = 7z
//! ```
//!
//! Every key is optional. Command-line arguments override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::manager::ManagerConfig;

/// Name of the application's configuration directory.
pub const APP_DIR_NAME: &str = "qtfetch";

/// Configuration file name.
pub const CONFIG_FILENAME: &str = "config.ini";

const SECTION_REPOSITORY: &str = "repository";
const SECTION_INSTALL: &str = "install";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write config file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// `[repository]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySettings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[install]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSettings {
    pub install_root: Option<PathBuf>,
    pub archive_tool: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub repository: RepositorySettings,
    pub install: InstallSettings,
}

/// Default configuration file location.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILENAME)
}

impl ConfigFile {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigFileError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse INI text.
    pub fn parse(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigFileError::ReadFailed {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let get = |section: &str, key: &str| {
            ini.section(Some(section))
                .and_then(|s| s.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = get(SECTION_REPOSITORY, "timeout_secs")
            .map(|v| {
                v.parse::<u64>().map_err(|_| ConfigFileError::InvalidValue {
                    key: format!("{}.timeout_secs", SECTION_REPOSITORY),
                    value: v.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            repository: RepositorySettings {
                base_url: get(SECTION_REPOSITORY, "base_url").map(str::to_string),
                timeout_secs,
            },
            install: InstallSettings {
                install_root: get(SECTION_INSTALL, "install_root").map(PathBuf::from),
                archive_tool: get(SECTION_INSTALL, "archive_tool").map(PathBuf::from),
            },
        })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        if let Some(ref url) = self.repository.base_url {
            ini.with_section(Some(SECTION_REPOSITORY)).set("base_url", url.as_str());
        }
        if let Some(secs) = self.repository.timeout_secs {
            ini.with_section(Some(SECTION_REPOSITORY))
                .set("timeout_secs", secs.to_string());
        }
        if let Some(ref root) = self.install.install_root {
            ini.with_section(Some(SECTION_INSTALL))
                .set("install_root", root.to_string_lossy());
        }
        if let Some(ref tool) = self.install.archive_tool {
            ini.with_section(Some(SECTION_INSTALL))
                .set("archive_tool", tool.to_string_lossy());
        }

        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::WriteFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigFileError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Effective manager configuration from file values over defaults.
    pub fn manager_config(&self) -> ManagerConfig {
        let mut config = ManagerConfig::default();
        if let Some(ref url) = self.repository.base_url {
            config = config.with_repository_url(url.clone());
        }
        if let Some(secs) = self.repository.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref root) = self.install.install_root {
            config.install_root = root.clone();
        }
        if let Some(ref tool) = self.install.archive_tool {
            config = config.with_archive_tool(tool.clone());
        }
        config
    }
}
