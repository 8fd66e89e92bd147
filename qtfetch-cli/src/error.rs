//! CLI error type.

use std::fmt;

use qtfetch::config::ConfigFileError;
use qtfetch::manager::ManagerError;

/// Errors surfaced to the user by the `qtfetch` binary.
///
/// Every variant maps to exit code 1.
#[derive(Debug)]
pub enum CliError {
    /// Invalid arguments or configuration.
    Config(String),
    /// Failure inside the install engine.
    Install(ManagerError),
    /// Failure reading or writing `config.ini`.
    ConfigFile(ConfigFileError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Install(e) => write!(f, "{}", e),
            CliError::ConfigFile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Install(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
        }
    }
}

impl From<ManagerError> for CliError {
    fn from(e: ManagerError) -> Self {
        CliError::Install(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}
