//! Shared setup for commands: configuration and logging.

use std::path::Path;

use qtfetch::config::{config_file_path, ConfigFile};
use qtfetch::logging::{self, WorkerGuard};
use qtfetch::manager::ManagerConfig;
use tracing::{info, warn};

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one invocation.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Initialize logging and load `config.ini`.
    ///
    /// An unreadable config file is reported and replaced by defaults.
    pub fn new(verbosity: u8, log_file: Option<&Path>) -> Result<Self, CliError> {
        let guard = logging::init(verbosity, log_file)?;

        let config = match ConfigFile::load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable configuration file");
                ConfigFile::default()
            }
        };

        Ok(Self {
            config,
            _log_guard: guard,
        })
    }

    /// Manager configuration from the file, before command-line overrides.
    pub fn manager_config(&self) -> ManagerConfig {
        self.config.manager_config()
    }

    /// Log the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            config = %config_file_path().display(),
            "qtfetch starting"
        );
    }
}
