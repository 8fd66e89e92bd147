//! qtfetch CLI - install prebuilt Qt releases from the Qt online repository.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::common::{HostArg, RepositoryOverrides, TargetArg};
use commands::config::ConfigCommands;
use commands::install::InstallArgs;
use commands::recipe::RecipeArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "qtfetch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install prebuilt Qt distributions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that contact the repository.
#[derive(Debug, clap::Args)]
struct RepositoryOpts {
    /// Repository root URL (overrides config.ini)
    #[arg(long)]
    base_url: Option<String>,

    /// HTTP timeout in seconds (overrides config.ini)
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a Qt release and optional modules
    Install {
        /// Qt release, e.g. 6.5.0
        version: String,

        /// Host system the binaries run on
        #[arg(value_enum)]
        host: HostArg,

        /// Target platform
        #[arg(value_enum)]
        target: TargetArg,

        /// Architecture token, e.g. win64_msvc2019_64 (required on Windows)
        #[arg(short, long)]
        arch: Option<String>,

        /// Additional modules: webengine, webglplugin, virtualkeyboard, script,
        /// datavis3d, charts, networkauth, purchasing, remoteobjects,
        /// qt5compat, qtshadertools, qtquick3d
        #[arg(short, long, num_args = 1..)]
        packages: Vec<String>,

        /// Directory to expand archives into
        #[arg(long)]
        install_root: Option<PathBuf>,

        #[command(flatten)]
        repository: RepositoryOpts,

        /// Resolve packages and print archive URLs without downloading
        #[arg(long)]
        dry_run: bool,
    },

    /// List every package a release publishes for a host and target
    List {
        /// Qt release, e.g. 6.5.0
        version: String,

        /// Host system
        #[arg(value_enum)]
        host: HostArg,

        /// Target platform
        #[arg(value_enum)]
        target: TargetArg,

        #[command(flatten)]
        repository: RepositoryOpts,
    },

    /// Install for build-system settings, write qt.conf, print exported variables
    Recipe {
        /// Qt release, e.g. 5.15.2
        version: String,

        /// Operating system setting (Linux, Windows, Macos, iOS)
        #[arg(long)]
        os: String,

        /// Visual Studio compiler version (Windows only), e.g. 16
        #[arg(long)]
        compiler_version: Option<String>,

        /// CPU architecture setting (x86, x86_64)
        #[arg(long, default_value = "x86_64")]
        cpu: String,

        /// Target platform
        #[arg(long, value_enum)]
        target: Option<TargetArg>,

        /// Enable an optional module (repeatable), e.g. --with charts
        #[arg(long = "with")]
        with: Vec<String>,

        /// Disable a module enabled by default (webengine, script)
        #[arg(long = "without")]
        without: Vec<String>,

        /// Directory to expand archives into
        #[arg(long)]
        install_root: Option<PathBuf>,

        #[command(flatten)]
        repository: RepositoryOpts,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        println!("{}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Install {
            version,
            host,
            target,
            arch,
            packages,
            install_root,
            repository,
            dry_run,
        } => commands::install::run(
            &runner,
            InstallArgs {
                version,
                host,
                target,
                arch,
                packages,
                overrides: overrides(install_root, repository),
                dry_run,
            },
        ),

        Commands::List {
            version,
            host,
            target,
            repository,
        } => commands::list::run(
            &runner,
            &version,
            host,
            target,
            overrides(None, repository),
        ),

        Commands::Recipe {
            version,
            os,
            compiler_version,
            cpu,
            target,
            with,
            without,
            install_root,
            repository,
        } => commands::recipe::run(
            &runner,
            RecipeArgs {
                version,
                os,
                compiler_version,
                cpu,
                target,
                with,
                without,
                overrides: overrides(install_root, repository),
            },
        ),

        Commands::Config { command } => commands::config::run(&runner, command),
    }
}

fn overrides(install_root: Option<PathBuf>, repository: RepositoryOpts) -> RepositoryOverrides {
    RepositoryOverrides {
        install_root,
        base_url: repository.base_url,
        timeout: repository.timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install() {
        let cli = Cli::try_parse_from([
            "qtfetch", "install", "6.5.0", "linux", "desktop", "--packages", "charts", "qt5compat",
        ])
        .unwrap();

        match cli.command {
            Commands::Install {
                version,
                host,
                target,
                arch,
                packages,
                dry_run,
                ..
            } => {
                assert_eq!(version, "6.5.0");
                assert_eq!(host, HostArg::Linux);
                assert_eq!(target, TargetArg::Desktop);
                assert_eq!(arch, None);
                assert_eq!(packages, vec!["charts", "qt5compat"]);
                assert!(!dry_run);
            }
            _ => panic!("expected install command"),
        }
    }

    #[test]
    fn test_parse_recipe_features() {
        let cli = Cli::try_parse_from([
            "qtfetch",
            "-vv",
            "recipe",
            "5.15.2",
            "--os",
            "Windows",
            "--compiler-version",
            "16",
            "--with",
            "charts",
            "--with",
            "webengine",
            "--without",
            "script",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Recipe {
                with,
                without,
                cpu,
                os,
                ..
            } => {
                assert_eq!(with, vec!["charts", "webengine"]);
                assert_eq!(without, vec!["script"]);
                assert_eq!(cpu, "x86_64");
                assert_eq!(os, "Windows");
            }
            _ => panic!("expected recipe command"),
        }
    }

    #[test]
    fn test_unknown_host_rejected() {
        assert!(Cli::try_parse_from(["qtfetch", "list", "6.5.0", "solaris", "desktop"]).is_err());
    }
}
