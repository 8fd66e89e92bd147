//! Package selection against a parsed manifest.

use std::fmt;

use super::manifest::Manifest;
use super::naming::{candidate_names, major_marker, package_base_url};
use crate::manager::{ManagerError, ManagerResult};

/// A resolution query for a single package.
///
/// `component` is `None` for the main Qt package and the manifest package
/// name (e.g. `qtcharts`) for an add-on or support package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub major_version: u64,
    pub version_token: String,
    pub arch: String,
    pub component: Option<String>,
}

impl PackageRequest {
    /// Request for the main package.
    pub fn main(major_version: u64, version_token: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            major_version,
            version_token: version_token.into(),
            arch: arch.into(),
            component: None,
        }
    }

    /// Request for a named component.
    pub fn component(
        major_version: u64,
        version_token: impl Into<String>,
        arch: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            major_version,
            version_token: version_token.into(),
            arch: arch.into(),
            component: Some(component.into()),
        }
    }

    /// Candidate manifest names for this request, in priority order.
    pub fn candidates(&self) -> [String; 2] {
        candidate_names(
            self.major_version,
            &self.version_token,
            &self.arch,
            self.component.as_deref(),
        )
    }

    fn not_found(&self) -> ManagerError {
        ManagerError::PackageNotFound {
            version: self.version_token.clone(),
            arch: self.arch.clone(),
            component: self
                .component
                .clone()
                .unwrap_or_else(|| "(main)".to_string()),
        }
    }
}

/// A package resolved to concrete archives.
///
/// `version` and `archives` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Matched manifest entry name.
    pub name: String,
    pub description: String,
    /// Authoritative version from the manifest.
    pub version: String,
    pub archives: Vec<String>,
    /// Directory URL the archives live under, with trailing `/`.
    pub base_url: String,
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Resolve `request` against `manifest`.
///
/// The first entry in document order whose name equals either candidate
/// wins. The archive path segment follows the naming convention of the
/// matched entry.
pub fn select_package(manifest: &Manifest, request: &PackageRequest) -> ManagerResult<ResolvedPackage> {
    let candidates = request.candidates();

    let update = manifest
        .find_first(&candidates)
        .ok_or_else(|| request.not_found())?;
    let entry = update.entry()?.ok_or_else(|| request.not_found())?;

    let [modern, legacy] = candidates;
    let path_segment = if entry.name.contains(&major_marker(request.major_version)) {
        modern
    } else {
        legacy
    };

    tracing::debug!(
        name = %entry.name,
        version = %entry.version,
        archives = entry.archives.len(),
        "Matched manifest entry"
    );

    Ok(ResolvedPackage {
        name: entry.name,
        description: entry.description,
        version: entry.version,
        archives: entry.archives,
        base_url: package_base_url(manifest.url(), &path_segment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::manifest::PackageUpdate;

    const DIR: &str = "https://example.com/linux_x64/desktop/qt6_650/";

    fn update(name: &str, version: &str, archives: &[&str]) -> PackageUpdate {
        PackageUpdate {
            name: name.to_string(),
            version: Some(version.to_string()),
            archives: Some(archives.iter().map(|a| a.to_string()).collect()),
            description: Some(format!("{} description", name)),
        }
    }

    #[test]
    fn test_prefers_qt_prefixed_candidate() {
        let manifest = Manifest::new(
            DIR,
            vec![
                update("qt.qt6.650.gcc_64", "6.5.0-0-1", &["qtbase.7z"]),
                update("qt.650.gcc_64", "6.5.0-0-2", &["legacy.7z"]),
            ],
        );

        let resolved = select_package(&manifest, &PackageRequest::main(6, "650", "gcc_64")).unwrap();
        assert_eq!(resolved.name, "qt.qt6.650.gcc_64");
        assert_eq!(resolved.version, "6.5.0-0-1");
        assert_eq!(resolved.base_url, format!("{}qt.qt6.650.gcc_64/", DIR));
    }

    #[test]
    fn test_legacy_name_uses_legacy_segment() {
        let manifest = Manifest::new(
            DIR,
            vec![update("qt.5120.gcc_64", "5.12.0-0-1", &["qtbase.7z"])],
        );

        let resolved = select_package(&manifest, &PackageRequest::main(5, "5120", "gcc_64")).unwrap();
        assert_eq!(resolved.base_url, format!("{}qt.5120.gcc_64/", DIR));
    }

    #[test]
    fn test_component_resolution_with_addons_infix() {
        let manifest = Manifest::new(
            DIR,
            vec![
                update("qt.qt6.650.gcc_64", "6.5.0-0-1", &["qtbase.7z"]),
                update("qt.qt6.650.addons.qtcharts.gcc_64", "6.5.0-0-1", &["qtcharts.7z"]),
                update("qt.qt6.650.qt5compat.gcc_64", "6.5.0-0-1", &["qt5compat.7z"]),
            ],
        );

        let charts = PackageRequest::component(6, "650", "gcc_64", "qtcharts");
        let resolved = select_package(&manifest, &charts).unwrap();
        assert_eq!(resolved.archives, vec!["qtcharts.7z"]);

        let compat = PackageRequest::component(6, "650", "gcc_64", "qt5compat");
        let resolved = select_package(&manifest, &compat).unwrap();
        assert_eq!(resolved.name, "qt.qt6.650.qt5compat.gcc_64");
    }

    #[test]
    fn test_missing_component_is_not_found() {
        let manifest = Manifest::new(DIR, vec![update("qt.qt6.650.gcc_64", "6.5.0", &["qtbase.7z"])]);

        let request = PackageRequest::component(6, "650", "gcc_64", "qtwebengine");
        let err = select_package(&manifest, &request).unwrap_err();
        assert!(matches!(err, ManagerError::PackageNotFound { ref component, .. } if component == "qtwebengine"));
    }

    #[test]
    fn test_empty_archives_is_not_found() {
        let manifest = Manifest::new(DIR, vec![update("qt.qt6.650.gcc_64", "6.5.0", &[])]);

        let err = select_package(&manifest, &PackageRequest::main(6, "650", "gcc_64")).unwrap_err();
        assert!(matches!(err, ManagerError::PackageNotFound { .. }));
    }

    #[test]
    fn test_empty_version_is_not_found() {
        let manifest = Manifest::new(DIR, vec![update("qt.qt6.650.gcc_64", "", &["qtbase.7z"])]);

        let err = select_package(&manifest, &PackageRequest::main(6, "650", "gcc_64")).unwrap_err();
        assert!(matches!(err, ManagerError::PackageNotFound { .. }));
    }

    #[test]
    fn test_missing_version_element_is_parse_error() {
        let mut entry = update("qt.qt6.650.gcc_64", "", &["qtbase.7z"]);
        entry.version = None;
        let manifest = Manifest::new(DIR, vec![entry]);

        let err = select_package(&manifest, &PackageRequest::main(6, "650", "gcc_64")).unwrap_err();
        assert!(matches!(err, ManagerError::MissingField { field: "Version", .. }));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_resolved_packages_are_never_partial(
                version in "(|6\\.5\\.0-0-[0-9]{4})",
                archives in proptest::collection::vec("[a-z]{1,8}\\.7z", 0..4),
                legacy in any::<bool>(),
            ) {
                let name = if legacy { "qt.650.gcc_64" } else { "qt.qt6.650.gcc_64" };
                let archive_refs: Vec<&str> = archives.iter().map(String::as_str).collect();
                let manifest = Manifest::new(DIR, vec![update(name, &version, &archive_refs)]);

                match select_package(&manifest, &PackageRequest::main(6, "650", "gcc_64")) {
                    Ok(resolved) => {
                        prop_assert!(!resolved.version.is_empty());
                        prop_assert!(!resolved.archives.is_empty());
                        let expected_suffix = format!("{}/", name);
                        prop_assert!(resolved.base_url.ends_with(&expected_suffix));
                    }
                    Err(err) => {
                        prop_assert!(version.is_empty() || archives.is_empty());
                        let is_not_found = matches!(err, ManagerError::PackageNotFound { .. });
                        prop_assert!(is_not_found);
                    }
                }
            }
        }
    }
}
