//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qtfetch::manager::{
    describe, InstallProgressCallback, InstallReport, InstallStage, ManagerConfig,
};
use qtfetch::package::{
    component_package_name, HostOs, QtVersion, ResolvedPackage, Target, SUPPORT_PACKAGES,
};
use qtfetch::recipe::RECIPE_FEATURES;

use crate::error::CliError;

/// Host system selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum HostArg {
    /// Linux x86_64
    Linux,
    /// macOS
    Mac,
    /// Windows
    Windows,
}

impl From<HostArg> for HostOs {
    fn from(host: HostArg) -> Self {
        match host {
            HostArg::Linux => HostOs::Linux,
            HostArg::Mac => HostOs::Mac,
            HostArg::Windows => HostOs::Windows,
        }
    }
}

/// Target platform selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TargetArg {
    /// Desktop applications
    Desktop,
    /// Android cross builds
    Android,
    /// iOS cross builds (mac host only)
    Ios,
}

impl From<TargetArg> for Target {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Desktop => Target::Desktop,
            TargetArg::Android => Target::Android,
            TargetArg::Ios => Target::Ios,
        }
    }
}

/// Repository overrides shared by commands that talk to the repository.
#[derive(Debug, Clone, Default)]
pub struct RepositoryOverrides {
    pub install_root: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
}

impl RepositoryOverrides {
    /// Apply command-line values on top of the file configuration.
    pub fn apply(self, mut config: ManagerConfig) -> ManagerConfig {
        if let Some(root) = self.install_root {
            config.install_root = root;
        }
        if let Some(url) = self.base_url {
            config = config.with_repository_url(url);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Parse a `MAJOR.MINOR.PATCH` release argument.
pub fn parse_version(raw: &str) -> Result<QtVersion, CliError> {
    raw.parse::<QtVersion>()
        .map_err(|_| CliError::Config(format!("'{}' is not a Qt release (expected e.g. 6.5.0)", raw)))
}

/// Reject architecture tokens the repository does not publish for the pair.
pub fn validate_arch(host: HostOs, target: Target, arch: &str) -> Result<(), CliError> {
    let known = host.known_architectures(target);
    if known.contains(&arch) {
        return Ok(());
    }
    Err(CliError::Config(format!(
        "unknown architecture '{}' for {}/{} (expected one of: {})",
        arch,
        host,
        target,
        known.join(", ")
    )))
}

/// Module names accepted by `--packages`, without the `qt` prefix where it is optional.
pub fn known_components() -> impl Iterator<Item = &'static str> {
    RECIPE_FEATURES.iter().chain(SUPPORT_PACKAGES.iter()).copied()
}

/// Reject module names that are neither optional modules nor support packages.
pub fn validate_components(components: &[String]) -> Result<(), CliError> {
    let unknown = components.iter().find(|c| {
        let name = component_package_name(c);
        !known_components().any(|k| component_package_name(k) == name)
    });

    match unknown {
        None => Ok(()),
        Some(name) => Err(CliError::Config(format!(
            "unknown package '{}' (expected one of: {})",
            name,
            known_components().collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Spinner-backed progress callback for package installs.
pub fn progress_callback(bar: ProgressBar) -> InstallProgressCallback {
    Box::new(move |stage, _progress, message| {
        bar.set_prefix(stage.name());
        match stage {
            InstallStage::Starting => {
                bar.println(format!("{} {}", style(stage.name()).bold(), message))
            }
            InstallStage::Complete => {
                bar.println(format!("  {} {}", style("✓").green(), message))
            }
            InstallStage::Downloading | InstallStage::Extracting => {
                bar.set_message(message.to_string())
            }
        }
    })
}

/// Dry-run listing for one package: description line, then archive URLs.
pub fn plan_lines(package: &ResolvedPackage) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} [{}, {} archive(s)]",
        describe(package),
        package.version,
        package.archives.len()
    )];
    lines.extend(
        package
            .archives
            .iter()
            .map(|archive| format!("    {}{}{}", package.base_url, package.version, archive)),
    );
    lines
}

/// Spinner shown while archives download and extract.
pub fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print the installation banner.
pub fn print_banner(host: HostOs, target: Target, arch: &str, source_url: &str, components: &[String]) {
    let rule = "*".repeat(53);
    println!("{}", rule);
    println!("HOST:       {}", host);
    println!("TARGET:     {}", target);
    println!("ARCH:       {}", arch);
    println!("Source URL: {}", source_url);
    if !components.is_empty() {
        println!("Packages:   {}", components.join(", "));
    }
    println!("{}", rule);
}

/// Print a completed run.
pub fn print_report(report: &InstallReport) {
    let archives: usize = report.results.iter().map(|r| r.archives_installed).sum();
    let bytes: u64 = report.results.iter().map(|r| r.bytes_downloaded).sum();

    println!();
    println!(
        "{} Installed {} package(s), {} archive(s), {} into {}",
        style("Finished installation.").bold(),
        report.results.len(),
        archives,
        format_size(bytes),
        report.install_root.display()
    );
}

/// Human readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
