//! Install command - download and expand a Qt release.

use console::style;
use qtfetch::manager::{check_required_tools, InstallRequest, QtInstaller};
use qtfetch::package::{manifest_dir_url, normalize_arch, HostOs, Target};

use super::common::{
    parse_version, plan_lines, print_banner, print_report, progress_callback, spinner,
    validate_arch, validate_components, HostArg, RepositoryOverrides, TargetArg,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the install command.
pub struct InstallArgs {
    pub version: String,
    pub host: HostArg,
    pub target: TargetArg,
    pub arch: Option<String>,
    pub packages: Vec<String>,
    pub overrides: RepositoryOverrides,
    pub dry_run: bool,
}

/// Run the install command.
pub fn run(runner: &CliRunner, args: InstallArgs) -> Result<(), CliError> {
    runner.log_startup("install");

    let host = HostOs::from(args.host);
    let target = Target::from(args.target);
    let version = parse_version(&args.version)?;
    if let Some(ref arch) = args.arch {
        validate_arch(host, target, arch)?;
    }
    validate_components(&args.packages)?;

    let mut request = InstallRequest::new(version.clone(), host, target).with_components(args.packages);
    if let Some(arch) = args.arch {
        request = request.with_arch(arch);
    }
    request.validate()?;

    let config = args.overrides.apply(runner.manager_config());
    let arch = normalize_arch(
        host,
        target,
        request.arch.as_deref().unwrap_or(""),
        &version,
    )?;
    let source_url = manifest_dir_url(&config.repository_url, host, target, &version);

    println!("Qt version {}", style(&version).bold());
    print_banner(host, target, &arch, &source_url, &request.components);

    let installer = QtInstaller::from_config(config)?;

    if args.dry_run {
        let (_, plan) = installer.resolve_plan(&request)?;
        println!("Would install:");
        for package in plan.packages() {
            for line in plan_lines(package) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    check_required_tools(&installer.config().archive_tool)?;

    let bar = spinner();
    let callback = progress_callback(bar.clone());
    let result = installer.run(&request, Some(&callback));
    bar.finish_and_clear();

    print_report(&result?);
    Ok(())
}
