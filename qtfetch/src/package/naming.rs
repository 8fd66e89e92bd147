//! Centralized Qt repository naming conventions.
//!
//! This module is the single source of truth for how manifest entry names,
//! component names, and repository URLs are built:
//! - Manifest directory URLs (e.g. `.../linux_x64/desktop/qt6_650/`)
//! - Candidate entry names (e.g. `qt.qt6.650.addons.qtcharts.gcc_64`)
//! - Archive URLs (`{base_url}{version}{archive}`)
//!
//! All other modules should use these functions rather than constructing
//! names directly.

use super::{HostOs, QtVersion, Target};

/// Default public Qt online repository.
pub const DEFAULT_REPOSITORY_URL: &str = "https://download.qt.io/online/qtsdkrepository/";

/// Manifest filename inside each repository directory.
pub const UPDATES_FILENAME: &str = "Updates.xml";

/// Infix Qt 6 uses for add-on module entry names.
pub const ADDONS_INFIX: &str = "addons.";

/// Support packages published beside the base package, never under `addons.`.
pub const SUPPORT_PACKAGES: &[&str] = &["qt5compat", "qtshadertools", "qtquick3d"];

/// Manifest package name for a component.
///
/// Short names get the `qt` prefix; names already carrying it are kept.
///
/// ```
/// use qtfetch::package::component_package_name;
///
/// assert_eq!(component_package_name("charts"), "qtcharts");
/// assert_eq!(component_package_name("qt5compat"), "qt5compat");
/// ```
pub fn component_package_name(component: &str) -> String {
    let component = component.trim();
    if component.starts_with("qt") {
        component.to_string()
    } else {
        format!("qt{}", component)
    }
}

/// Infix inserted before a component name for this major version.
pub fn addon_infix(major_version: u64, component: &str) -> &'static str {
    if major_version >= 6 && !SUPPORT_PACKAGES.contains(&component) {
        ADDONS_INFIX
    } else {
        ""
    }
}

/// Candidate manifest entry names in priority order.
///
/// The first uses the `qt.qt{major}.` convention, the second the older
/// `qt.` convention.
///
/// ```
/// use qtfetch::package::candidate_names;
///
/// let names = candidate_names(6, "650", "gcc_64", Some("qtcharts"));
/// assert_eq!(names[0], "qt.qt6.650.addons.qtcharts.gcc_64");
/// assert_eq!(names[1], "qt.650.addons.qtcharts.gcc_64");
/// ```
pub fn candidate_names(
    major_version: u64,
    version_token: &str,
    arch: &str,
    component: Option<&str>,
) -> [String; 2] {
    let stem = match component {
        Some(name) => format!(
            "{}.{}{}.{}",
            version_token,
            addon_infix(major_version, name),
            name,
            arch
        ),
        None => format!("{}.{}", version_token, arch),
    };

    [
        format!("qt.qt{}.{}", major_version, stem),
        format!("qt.{}", stem),
    ]
}

/// Marker present in names following the `qt.qt{major}.` convention.
pub fn major_marker(major_version: u64) -> String {
    format!(".qt{}.", major_version)
}

/// Manifest directory URL for a host/target/version triple.
///
/// ```
/// use qtfetch::package::{manifest_dir_url, HostOs, QtVersion, Target};
///
/// assert_eq!(
///     manifest_dir_url("https://example.com/repo/", HostOs::Windows, Target::Desktop, &QtVersion::new(5, 15, 2)),
///     "https://example.com/repo/windows_x86/desktop/qt5_5152/"
/// );
/// ```
pub fn manifest_dir_url(base_url: &str, host: HostOs, target: Target, version: &QtVersion) -> String {
    format!(
        "{}{}/{}/qt{}_{}/",
        with_trailing_slash(base_url),
        host.repository_dir(),
        target,
        version.major(),
        version.token()
    )
}

/// URL of the `Updates.xml` manifest inside a directory URL.
pub fn updates_url(dir_url: &str) -> String {
    format!("{}{}", with_trailing_slash(dir_url), UPDATES_FILENAME)
}

/// Base URL for a matched package's archives.
pub fn package_base_url(dir_url: &str, path_segment: &str) -> String {
    format!("{}{}/", with_trailing_slash(dir_url), path_segment)
}

/// Full URL of one archive: `{base_url}{version}{archive}`.
pub fn archive_url(base_url: &str, version: &str, archive: &str) -> String {
    format!("{}{}{}", base_url, version, archive)
}

/// Ensure a URL ends with `/`.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
