//! Archive extraction for package installation.
//!
//! Qt publishes its payload as 7-Zip archives. Extraction shells out to the
//! `7z` executable with its console output suppressed.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::{ManagerError, ManagerResult};
use super::traits::ArchiveExtractor;

/// Default 7-Zip executable name.
pub const DEFAULT_ARCHIVE_TOOL: &str = "7z";

/// Shell-based 7-Zip extractor.
#[derive(Debug, Clone)]
pub struct SevenZipExtractor {
    program: PathBuf,
}

impl Default for SevenZipExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SevenZipExtractor {
    /// Create an extractor using `7z` from `PATH`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_ARCHIVE_TOOL)
    }

    /// Create an extractor using a specific 7-Zip executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check that the 7-Zip executable can be spawned.
    pub fn check_available(&self) -> ManagerResult<()> {
        Command::new(&self.program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|e| ManagerError::ExtractionFailed {
                path: self.program.clone(),
                reason: format!(
                    "{} could not be run ({}). Please install 7-Zip.",
                    self.program.display(),
                    e
                ),
            })
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> ManagerResult<()> {
        let mut output_flag = std::ffi::OsString::from("-o");
        output_flag.push(dest_dir.as_os_str());

        let output = Command::new(&self.program)
            .arg("x")
            .arg("-y")
            .arg(output_flag)
            .arg(archive_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ManagerError::ExtractionFailed {
                path: archive_path.to_path_buf(),
                reason: format!("Failed to run {}: {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::ExtractionFailed {
                path: archive_path.to_path_buf(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(())
    }
}

/// Check that the configured archive tool can be run.
pub fn check_required_tools(program: &Path) -> ManagerResult<()> {
    let extractor = SevenZipExtractor::with_program(program);
    extractor.check_available()?;
    debug!(program = %extractor.program().display(), "Archive tool available");
    Ok(())
}
