//! Manifest client for the Qt online repository.

use tracing::{debug, info};

use super::error::{ManagerError, ManagerResult};
use super::traits::PackageDownloader;
use crate::package::{manifest_dir_url, updates_url, HostOs, Manifest, QtVersion, Target};

/// Fetches and parses `Updates.xml` manifests.
#[derive(Debug)]
pub struct ManifestClient<D: PackageDownloader> {
    downloader: D,
    repository_url: String,
}

impl<D: PackageDownloader> ManifestClient<D> {
    pub fn new(downloader: D, repository_url: impl Into<String>) -> Self {
        Self {
            downloader,
            repository_url: repository_url.into(),
        }
    }

    /// Directory URL holding the manifest and packages for a triple.
    pub fn manifest_dir(&self, host: HostOs, target: Target, version: &QtVersion) -> String {
        manifest_dir_url(&self.repository_url, host, target, version)
    }

    /// Fetch and parse the manifest for a host/target/version triple.
    pub fn fetch_manifest(
        &self,
        host: HostOs,
        target: Target,
        version: &QtVersion,
    ) -> ManagerResult<Manifest> {
        let dir_url = self.manifest_dir(host, target, version);
        let url = updates_url(&dir_url);
        debug!(url = %url, "Fetching manifest");

        let bytes = self.downloader.fetch(&url)?;
        let xml = String::from_utf8(bytes).map_err(|e| ManagerError::ManifestParseFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let manifest = Manifest::parse(dir_url, &xml)?;
        info!(url = %url, entries = manifest.len(), "Manifest fetched");
        Ok(manifest)
    }
}
