//! Installation orchestrator.
//!
//! Sequences a full install: normalize the architecture, fetch the manifest,
//! then select and install the main package followed by each requested
//! component in order.
//!
//! ```text
//! START → ARCH_NORMALIZED → MANIFEST_FETCHED → MAIN_SELECTED → MAIN_INSTALLED
//!       → [COMPONENT_SELECTED → COMPONENT_INSTALLED]* → DONE
//! ```
//!
//! Any failure ends the run. Nothing is retried and archives already
//! expanded are left in place.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use super::client::ManifestClient;
use super::config::ManagerConfig;
use super::download::HttpDownloader;
use super::error::{ManagerError, ManagerResult};
use super::extractor::SevenZipExtractor;
use super::installer::{ArchiveInstaller, InstallProgressCallback, InstallResult};
use super::traits::{ArchiveExtractor, PackageDownloader};
use crate::package::{
    component_package_name, normalize_arch, select_package, updates_url, HostOs, Manifest,
    PackageRequest, QtVersion, ResolvedPackage, Target,
};

/// What to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: QtVersion,
    pub host: HostOs,
    pub target: Target,
    /// Explicit architecture; `None` selects the host/target default.
    pub arch: Option<String>,
    /// Components in install order, with or without the `qt` prefix.
    pub components: Vec<String>,
}

impl InstallRequest {
    pub fn new(version: QtVersion, host: HostOs, target: Target) -> Self {
        Self {
            version,
            host,
            target,
            arch: None,
            components: Vec::new(),
        }
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    /// Check the host/target pair before any network activity.
    pub fn validate(&self) -> ManagerResult<()> {
        if !self.host.supports_target(self.target) {
            return Err(ManagerError::InvalidConfig(format!(
                "target '{}' is not available for host '{}'",
                self.target, self.host
            )));
        }
        Ok(())
    }
}

/// Orchestrator progress through an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    ArchNormalized { arch: String },
    ManifestFetched { url: String },
    MainSelected { name: String },
    MainInstalled,
    ComponentSelected { name: String },
    ComponentInstalled { name: String },
    Done,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchNormalized { arch } => write!(f, "architecture {}", arch),
            Self::ManifestFetched { url } => write!(f, "manifest {}", url),
            Self::MainSelected { name } => write!(f, "selected {}", name),
            Self::MainInstalled => write!(f, "main package installed"),
            Self::ComponentSelected { name } => write!(f, "selected {}", name),
            Self::ComponentInstalled { name } => write!(f, "installed {}", name),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Resolved packages for one run: the main package plus components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationPlan {
    pub main: ResolvedPackage,
    pub components: Vec<ResolvedPackage>,
}

impl InstallationPlan {
    /// All packages in install order.
    pub fn packages(&self) -> impl Iterator<Item = &ResolvedPackage> {
        std::iter::once(&self.main).chain(self.components.iter())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Canonical architecture token used for resolution.
    pub arch: String,
    /// URL of the `Updates.xml` that was used.
    pub manifest_url: String,
    /// Directory the archives were expanded into.
    pub install_root: PathBuf,
    pub plan: InstallationPlan,
    /// Per-package results in install order.
    pub results: Vec<InstallResult>,
}

/// Runs installs against the Qt repository.
pub struct QtInstaller<D: PackageDownloader, E: ArchiveExtractor> {
    downloader: D,
    extractor: E,
    config: ManagerConfig,
}

impl QtInstaller<HttpDownloader, SevenZipExtractor> {
    /// Create an installer using HTTP and the 7-Zip command line tool.
    pub fn from_config(config: ManagerConfig) -> ManagerResult<Self> {
        let downloader = HttpDownloader::with_timeout(config.timeout)?;
        let extractor = SevenZipExtractor::with_program(&config.archive_tool);
        Ok(Self::new(downloader, extractor, config))
    }
}

impl<D: PackageDownloader, E: ArchiveExtractor> QtInstaller<D, E> {
    pub fn new(downloader: D, extractor: E, config: ManagerConfig) -> Self {
        Self {
            downloader,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    fn client(&self) -> ManifestClient<&D> {
        ManifestClient::new(&self.downloader, self.config.repository_url.as_str())
    }

    /// Fetch the manifest for a host/target/version triple.
    pub fn fetch_manifest(
        &self,
        host: HostOs,
        target: Target,
        version: &QtVersion,
    ) -> ManagerResult<Manifest> {
        self.client().fetch_manifest(host, target, version)
    }

    /// Resolve every package of `request` without downloading archives.
    pub fn resolve_plan(&self, request: &InstallRequest) -> ManagerResult<(String, InstallationPlan)> {
        let (arch, manifest) = self.prepare(request)?;

        let main = select_package(&manifest, &main_request(request, &arch))?;
        let components = request
            .components
            .iter()
            .map(|c| select_package(&manifest, &component_request(request, &arch, c)))
            .collect::<ManagerResult<Vec<_>>>()?;

        Ok((arch, InstallationPlan { main, components }))
    }

    /// Run a full install.
    ///
    /// Each package is installed immediately after it is resolved; the first
    /// failure aborts the remaining components.
    pub fn run(
        &self,
        request: &InstallRequest,
        on_progress: Option<&InstallProgressCallback>,
    ) -> ManagerResult<InstallReport> {
        let (arch, manifest) = self.prepare(request)?;
        let installer = ArchiveInstaller::new(
            &self.downloader,
            &self.extractor,
            self.config.install_root.clone(),
            self.config.staging_path(),
        );

        let main = select_package(&manifest, &main_request(request, &arch))?;
        transition(InstallState::MainSelected {
            name: main.name.clone(),
        });
        let mut results = vec![installer.install(&main, on_progress)?];
        transition(InstallState::MainInstalled);

        let mut components = Vec::with_capacity(request.components.len());
        for component in &request.components {
            let package = select_package(&manifest, &component_request(request, &arch, component))?;
            transition(InstallState::ComponentSelected {
                name: package.name.clone(),
            });
            results.push(installer.install(&package, on_progress)?);
            transition(InstallState::ComponentInstalled {
                name: package.name.clone(),
            });
            components.push(package);
        }

        transition(InstallState::Done);

        Ok(InstallReport {
            arch,
            manifest_url: updates_url(manifest.url()),
            install_root: self.config.install_root.clone(),
            plan: InstallationPlan { main, components },
            results,
        })
    }

    /// Validate, normalize the architecture, and fetch the manifest.
    fn prepare(&self, request: &InstallRequest) -> ManagerResult<(String, Manifest)> {
        request.validate()?;

        let arch = normalize_arch(
            request.host,
            request.target,
            request.arch.as_deref().unwrap_or(""),
            &request.version,
        )?;
        transition(InstallState::ArchNormalized { arch: arch.clone() });

        let manifest = self.fetch_manifest(request.host, request.target, &request.version)?;
        transition(InstallState::ManifestFetched {
            url: updates_url(manifest.url()),
        });

        Ok((arch, manifest))
    }
}

fn transition(state: InstallState) {
    info!(state = %state, "Install progress");
}

fn main_request(request: &InstallRequest, arch: &str) -> PackageRequest {
    PackageRequest::main(request.version.major(), request.version.token(), arch)
}

fn component_request(request: &InstallRequest, arch: &str, component: &str) -> PackageRequest {
    PackageRequest::component(
        request.version.major(),
        request.version.token(),
        arch,
        component_package_name(component),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = InstallRequest::new(QtVersion::new(6, 5, 0), HostOs::Linux, Target::Desktop)
            .with_arch("gcc_64")
            .with_components(["charts", "qt5compat"]);

        assert_eq!(request.arch.as_deref(), Some("gcc_64"));
        assert_eq!(request.components, vec!["charts", "qt5compat"]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_unsupported_target() {
        let request = InstallRequest::new(QtVersion::new(6, 5, 0), HostOs::Windows, Target::Ios);
        let err = request.validate().unwrap_err();
        assert!(matches!(err, ManagerError::InvalidConfig(_)));
    }

    #[test]
    fn test_component_request_adds_prefix() {
        let request = InstallRequest::new(QtVersion::new(6, 5, 0), HostOs::Linux, Target::Desktop);
        let component = component_request(&request, "gcc_64", "charts");
        assert_eq!(component.component.as_deref(), Some("qtcharts"));
        assert_eq!(component.version_token, "650");
    }

    #[test]
    fn test_install_state_display() {
        assert_eq!(InstallState::Done.to_string(), "done");
        assert_eq!(
            InstallState::ArchNormalized {
                arch: "gcc_64".to_string()
            }
            .to_string(),
            "architecture gcc_64"
        );
    }
}
