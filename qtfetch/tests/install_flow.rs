//! Integration tests for the installation orchestrator.
//!
//! These tests drive `QtInstaller` end to end with an in-memory repository:
//! - manifest URL construction and parsing
//! - main package then components, in request order
//! - fail-fast behaviour on resolution and extraction errors
//!
//! Run with: `cargo test --test install_flow`

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use qtfetch::manager::{
    ArchiveExtractor, ErrorKind, InstallProgressCallback, InstallRequest, InstallStage,
    ManagerConfig, ManagerError, ManagerResult, PackageDownloader, QtInstaller,
};
use qtfetch::package::{HostOs, QtVersion, Target};
use qtfetch::recipe::{CpuArch, RecipeOs, RecipeSettings};

// ============================================================================
// Helpers
// ============================================================================

const REPO: &str = "https://repo.example.com/qtsdkrepository/";

const LINUX_650_XML: &str = r#"<Updates>
 <PackageUpdate>
  <Name>qt.qt6.650.gcc_64</Name>
  <Description>Qt 6.5.0 Linux and X11 gcc 64-bit</Description>
  <Version>6.5.0-0-202303291215</Version>
  <DownloadableArchives>qtbase-Linux.7z, qtsvg-Linux.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.650.gcc_64</Name>
  <Description>Legacy duplicate</Description>
  <Version>6.5.0-0-1</Version>
  <DownloadableArchives>legacy.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.qt6.650.addons.qtcharts.gcc_64</Name>
  <Description>Qt Charts for gcc 64-bit</Description>
  <Version>6.5.0-0-202303291215</Version>
  <DownloadableArchives>qtcharts-Linux.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.qt6.650.qt5compat.gcc_64</Name>
  <Description>Qt 5 Compatibility Module</Description>
  <Version>6.5.0-0-202303291215</Version>
  <DownloadableArchives>qt5compat-Linux.7z</DownloadableArchives>
 </PackageUpdate>
</Updates>"#;

const WINDOWS_5152_XML: &str = r#"<Updates>
 <PackageUpdate>
  <Name>qt.qt5.5152.win64_msvc2019_64</Name>
  <Description>MSVC 2019 64-bit</Description>
  <Version>5.15.2-0-202011130602</Version>
  <DownloadableArchives>qtbase-Windows.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.qt5.5152.qtcharts.win64_msvc2019_64</Name>
  <Description>Qt Charts</Description>
  <Version>5.15.2-0-202011130602</Version>
  <DownloadableArchives>qtcharts-Windows.7z</DownloadableArchives>
 </PackageUpdate>
</Updates>"#;

/// In-memory repository serving manifests by URL; archives echo their URL.
///
/// An archive whose URL contains `drop_connection_on` is written partially
/// and then fails.
struct FakeRepository {
    manifests: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
    downloaded: RefCell<Vec<String>>,
    drop_connection_on: Option<&'static str>,
}

impl FakeRepository {
    fn new() -> Self {
        let mut manifests = HashMap::new();
        manifests.insert(
            format!("{}linux_x64/desktop/qt6_650/Updates.xml", REPO),
            LINUX_650_XML.to_string(),
        );
        manifests.insert(
            format!("{}windows_x86/desktop/qt5_5152/Updates.xml", REPO),
            WINDOWS_5152_XML.to_string(),
        );
        Self {
            manifests,
            fetched: RefCell::new(Vec::new()),
            downloaded: RefCell::new(Vec::new()),
            drop_connection_on: None,
        }
    }
}

impl PackageDownloader for FakeRepository {
    fn fetch(&self, url: &str) -> ManagerResult<Vec<u8>> {
        self.fetched.borrow_mut().push(url.to_string());
        self.manifests
            .get(url)
            .map(|xml| xml.as_bytes().to_vec())
            .ok_or_else(|| ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: "GET request failed with status 404 Not Found".to_string(),
            })
    }

    fn download(&self, url: &str, dest: &Path) -> ManagerResult<u64> {
        self.downloaded.borrow_mut().push(url.to_string());
        let truncated = self.drop_connection_on.is_some_and(|m| url.contains(m));
        let body = if truncated { &url[..url.len() / 2] } else { url };
        fs::write(dest, body).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        if truncated {
            return Err(ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: "connection reset by peer".to_string(),
            });
        }
        Ok(url.len() as u64)
    }
}

/// Records staged archive contents; optionally fails for a given archive.
#[derive(Default)]
struct RecordingExtractor {
    extracted: RefCell<Vec<String>>,
    fail_when_contains: Option<&'static str>,
}

impl ArchiveExtractor for RecordingExtractor {
    fn extract(&self, archive_path: &Path, _dest_dir: &Path) -> ManagerResult<()> {
        let url = fs::read_to_string(archive_path).map_err(|e| ManagerError::ReadFailed {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
        if let Some(marker) = self.fail_when_contains {
            if url.contains(marker) {
                return Err(ManagerError::ExtractionFailed {
                    path: archive_path.to_path_buf(),
                    reason: "Data Error".to_string(),
                });
            }
        }
        self.extracted.borrow_mut().push(url);
        Ok(())
    }
}

fn config(root: &Path) -> ManagerConfig {
    ManagerConfig::new(root.to_path_buf()).with_repository_url(REPO)
}

fn linux_request() -> InstallRequest {
    InstallRequest::new(QtVersion::new(6, 5, 0), HostOs::Linux, Target::Desktop)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_linux_desktop_with_charts() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let report = installer
        .run(&linux_request().with_components(["qtcharts"]), None)
        .unwrap();

    assert_eq!(report.arch, "gcc_64");
    assert_eq!(
        report.manifest_url,
        format!("{}linux_x64/desktop/qt6_650/Updates.xml", REPO)
    );
    assert_eq!(report.plan.main.name, "qt.qt6.650.gcc_64");
    assert_eq!(report.plan.components.len(), 1);
    assert_eq!(
        report.plan.components[0].name,
        "qt.qt6.650.addons.qtcharts.gcc_64"
    );
    assert_eq!(report.results.len(), 2);

    let base = format!("{}linux_x64/desktop/qt6_650/", REPO);
    let expected = vec![
        format!("{}qt.qt6.650.gcc_64/6.5.0-0-202303291215qtbase-Linux.7z", base),
        format!("{}qt.qt6.650.gcc_64/6.5.0-0-202303291215qtsvg-Linux.7z", base),
        format!(
            "{}qt.qt6.650.addons.qtcharts.gcc_64/6.5.0-0-202303291215qtcharts-Linux.7z",
            base
        ),
    ];
    assert_eq!(*repo.downloaded.borrow(), expected);
    assert_eq!(*extractor.extracted.borrow(), expected);
    assert_eq!(repo.fetched.borrow().len(), 1);
    assert!(!temp.path().join("package.7z").exists());
}

#[test]
fn test_short_component_names_and_support_packages() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let report = installer
        .run(&linux_request().with_components(["charts", "qt5compat"]), None)
        .unwrap();

    let names: Vec<&str> = report.plan.packages().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "qt.qt6.650.gcc_64",
            "qt.qt6.650.addons.qtcharts.gcc_64",
            "qt.qt6.650.qt5compat.gcc_64",
        ]
    );
}

#[test]
fn test_windows_msvc2017_is_remapped() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let request = InstallRequest::new(QtVersion::new(5, 15, 2), HostOs::Windows, Target::Desktop)
        .with_arch("win64_msvc2017_64")
        .with_components(["charts"]);
    let report = installer.run(&request, None).unwrap();

    assert_eq!(report.arch, "win64_msvc2019_64");
    assert_eq!(report.plan.main.name, "qt.qt5.5152.win64_msvc2019_64");
    assert_eq!(
        report.plan.components[0].name,
        "qt.qt5.5152.qtcharts.win64_msvc2019_64"
    );
}

#[test]
fn test_missing_component_aborts_after_main() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let err = installer
        .run(
            &linux_request().with_components(["webengine", "charts"]),
            None,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(err.to_string().contains("qtwebengine"));
    // Main package was installed before the failure; charts never started.
    assert_eq!(repo.downloaded.borrow().len(), 2);
}

#[test]
fn test_extraction_failure_stops_the_plan() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor {
        fail_when_contains: Some("qtbase"),
        ..Default::default()
    };
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let err = installer
        .run(&linux_request().with_components(["charts"]), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert_eq!(repo.downloaded.borrow().len(), 1);
    assert!(extractor.extracted.borrow().is_empty());
    assert!(!temp.path().join("package.7z").exists());
}

#[test]
fn test_architecture_required_before_network() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let request = InstallRequest::new(QtVersion::new(5, 15, 2), HostOs::Windows, Target::Desktop);
    let err = installer.run(&request, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(repo.fetched.borrow().is_empty());
}

#[test]
fn test_unknown_version_is_transport_error() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let request = InstallRequest::new(QtVersion::new(6, 9, 9), HostOs::Linux, Target::Desktop);
    let err = installer.run(&request, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_resolve_plan_downloads_nothing() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let (arch, plan) = installer
        .resolve_plan(&linux_request().with_components(["charts"]))
        .unwrap();

    assert_eq!(arch, "gcc_64");
    assert_eq!(plan.packages().count(), 2);
    assert!(repo.downloaded.borrow().is_empty());
}

#[test]
fn test_recipe_settings_drive_install() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let settings = RecipeSettings::new(RecipeOs::Windows, CpuArch::X86_64)
        .with_compiler_version("15")
        .with_features(["charts"]);
    let request = settings.to_request(QtVersion::new(5, 15, 2)).unwrap();
    let report = installer.run(&request, None).unwrap();

    assert_eq!(report.arch, "win64_msvc2019_64");
    assert_eq!(report.install_root, PathBuf::from(temp.path()));
    assert_eq!(report.results.len(), 2);
}

#[test]
fn test_transport_failure_mid_archive_removes_staging_file() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository {
        drop_connection_on: Some("qtsvg"),
        ..FakeRepository::new()
    };
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let err = installer
        .run(&linux_request().with_components(["charts"]), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(repo.downloaded.borrow().len(), 2);
    assert_eq!(extractor.extracted.borrow().len(), 1);
    assert!(!temp.path().join("package.7z").exists());
}

#[test]
fn test_package_descriptions_are_reported() {
    let temp = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let extractor = RecordingExtractor::default();
    let installer = QtInstaller::new(&repo, &extractor, config(temp.path()));

    let started = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&started);
    let callback: InstallProgressCallback = Box::new(move |stage, _, message| {
        if stage == InstallStage::Starting {
            recorded.lock().unwrap().push(message.to_string());
        }
    });

    installer
        .run(&linux_request().with_components(["charts"]), Some(&callback))
        .unwrap();

    assert_eq!(
        started.lock().unwrap().as_slice(),
        [
            "Qt 6.5.0 Linux and X11 gcc 64-bit (qt.qt6.650.gcc_64)",
            "Qt Charts for gcc 64-bit (qt.qt6.650.addons.qtcharts.gcc_64)",
        ]
    );
}
