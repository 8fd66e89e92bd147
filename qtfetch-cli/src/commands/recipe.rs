//! Recipe command - install for build-system settings and export the result.

use std::path::Path;

use qtfetch::manager::{check_required_tools, QtInstaller};
use qtfetch::recipe::{write_qt_conf, CpuArch, PackageEnv, RecipeOs, RecipeSettings};

use super::common::{
    parse_version, print_report, progress_callback, spinner, RepositoryOverrides, TargetArg,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the recipe command.
pub struct RecipeArgs {
    pub version: String,
    pub os: String,
    pub compiler_version: Option<String>,
    pub cpu: String,
    pub target: Option<TargetArg>,
    pub with: Vec<String>,
    pub without: Vec<String>,
    pub overrides: RepositoryOverrides,
}

/// Run the recipe command.
pub fn run(runner: &CliRunner, args: RecipeArgs) -> Result<(), CliError> {
    runner.log_startup("recipe");

    let version = parse_version(&args.version)?;
    let os: RecipeOs = args.os.parse()?;
    let cpu: CpuArch = args.cpu.parse()?;

    let mut settings = RecipeSettings::new(os, cpu);
    for feature in args.with {
        settings = settings.with_feature(feature);
    }
    for feature in &args.without {
        settings = settings.without_feature(feature);
    }
    if let Some(compiler) = args.compiler_version {
        settings = settings.with_compiler_version(compiler);
    }
    if let Some(target) = args.target {
        settings = settings.with_target(target.into());
    }

    let request = settings.to_request(version)?;
    let installer = QtInstaller::from_config(args.overrides.apply(runner.manager_config()))?;
    check_required_tools(&installer.config().archive_tool)?;

    let bar = spinner();
    let callback = progress_callback(bar.clone());
    let result = installer.run(&request, Some(&callback));
    bar.finish_and_clear();
    let report = result?;

    let install_root = absolute(&report.install_root);
    let conf = write_qt_conf(&report.install_root, &install_root)?;
    print_report(&report);
    println!("Wrote {}", conf.display());

    for (name, value) in PackageEnv::for_install(&install_root, os).vars()? {
        println!("{}={}", name, value);
    }

    Ok(())
}

/// Absolute form of `path`, falling back to the path as given.
fn absolute(path: &Path) -> std::path::PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
