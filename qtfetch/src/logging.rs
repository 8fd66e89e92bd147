//! Tracing subscriber setup.
//!
//! Console output goes to stderr so it never interleaves with the
//! installer's own stdout messages. An optional log file receives the same
//! events through a non-blocking writer.

use std::path::Path;

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::manager::{ManagerError, ManagerResult};

/// Default filter directive for a verbosity level.
///
/// `0` → warnings only, `1` → info, `2+` → debug.
pub fn level_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `verbosity` when set. The returned guard must be held
/// until exit so buffered file output is flushed.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> ManagerResult<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(verbosity)))
    };

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().ok_or_else(|| {
                ManagerError::InvalidConfig(format!("invalid log file path {}", path.display()))
            })?;
            std::fs::create_dir_all(dir).map_err(|e| ManagerError::CreateDirFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| ManagerError::InvalidConfig(format!("logging already initialized: {}", e)))?;

    Ok(guard)
}
