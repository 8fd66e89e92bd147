//! Configuration CLI commands.
//!
//! Provides `config path` and `config show`.

use clap::Subcommand;
use qtfetch::config::config_file_path;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective settings
    Show,
}

/// Run a config subcommand.
pub fn run(runner: &CliRunner, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(runner),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Show file values merged over defaults.
fn run_show(runner: &CliRunner) -> Result<(), CliError> {
    let path = config_file_path();
    let effective = runner.manager_config();

    println!("Configuration Settings");
    println!("======================");
    println!(
        "File: {}{}",
        path.display(),
        if path.exists() { "" } else { " (not present)" }
    );
    println!();
    println!("[repository]");
    println!("  base_url = {}", effective.repository_url);
    println!("  timeout_secs = {}", effective.timeout.as_secs());
    println!();
    println!("[install]");
    println!("  install_root = {}", effective.install_root.display());
    println!("  archive_tool = {}", effective.archive_tool.display());

    Ok(())
}
