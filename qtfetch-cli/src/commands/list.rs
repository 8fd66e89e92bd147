//! List command - show the packages a release publishes.

use qtfetch::manager::QtInstaller;
use qtfetch::package::{HostOs, Target};

use super::common::{parse_version, HostArg, RepositoryOverrides, TargetArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the list command.
pub fn run(
    runner: &CliRunner,
    version: &str,
    host: HostArg,
    target: TargetArg,
    overrides: RepositoryOverrides,
) -> Result<(), CliError> {
    runner.log_startup("list");

    let host = HostOs::from(host);
    let target = Target::from(target);
    let version = parse_version(version)?;
    if !host.supports_target(target) {
        return Err(CliError::Config(format!(
            "target '{}' is not available for host '{}'",
            target, host
        )));
    }

    let installer = QtInstaller::from_config(overrides.apply(runner.manager_config()))?;
    let manifest = installer.fetch_manifest(host, target, &version)?;

    if manifest.is_empty() {
        println!("No packages in {}", manifest.url());
        return Ok(());
    }

    for update in manifest.updates() {
        match update.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => println!("{:<50} {}", update.name, description),
            None => println!("{}", update.name),
        }
    }
    println!();
    println!("{} package(s) in {}", manifest.len(), manifest.url());

    Ok(())
}
