//! `Updates.xml` manifest model and parser.
//!
//! The Qt online repository publishes one `Updates.xml` per
//! host/target/version directory:
//!
//! ```text
//! <Updates>
//!   <PackageUpdate>
//!     <Name>qt.qt6.650.gcc_64</Name>
//!     <Description>Qt 6.5.0 Linux and X11 gcc 64-bit</Description>
//!     <Version>6.5.0-0-202303291215</Version>
//!     <DownloadableArchives>qtbase-Linux.7z, qtsvg-Linux.7z</DownloadableArchives>
//!   </PackageUpdate>
//!   ...
//! </Updates>
//! ```
//!
//! Required children are only checked on the entry that gets matched, so a
//! malformed unrelated record does not prevent installing anything else.

use roxmltree::{Document, Node};

use crate::manager::{ManagerError, ManagerResult};

/// Separator between archive names in `DownloadableArchives`.
const ARCHIVE_SEPARATOR: &str = ", ";

/// One `PackageUpdate` record as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdate {
    pub name: String,
    pub version: Option<String>,
    pub archives: Option<Vec<String>>,
    pub description: Option<String>,
}

/// A validated, installable manifest entry.
///
/// `version` and `archives` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
    pub archives: Vec<String>,
    pub description: String,
}

impl PackageUpdate {
    /// Validate this record into a [`ManifestEntry`].
    ///
    /// Returns `Ok(None)` when the record is present but not actionable
    /// (empty version or no archives), and an error when a required element
    /// is missing altogether.
    pub fn entry(&self) -> ManagerResult<Option<ManifestEntry>> {
        let version = self.required(self.version.as_ref(), "Version")?;
        let archives = self.required(self.archives.as_ref(), "DownloadableArchives")?;
        let description = self.required(self.description.as_ref(), "Description")?;

        if version.is_empty() || archives.is_empty() {
            return Ok(None);
        }

        Ok(Some(ManifestEntry {
            name: self.name.clone(),
            version: version.clone(),
            archives: archives.clone(),
            description: description.clone(),
        }))
    }

    fn required<'a, T>(&self, value: Option<&'a T>, field: &'static str) -> ManagerResult<&'a T> {
        value.ok_or_else(|| ManagerError::MissingField {
            name: self.name.clone(),
            field,
        })
    }
}

/// Parsed manifest for one repository directory.
#[derive(Debug, Clone)]
pub struct Manifest {
    url: String,
    updates: Vec<PackageUpdate>,
}

impl Manifest {
    /// Build a manifest from already parsed records.
    pub fn new(url: impl Into<String>, updates: Vec<PackageUpdate>) -> Self {
        Self {
            url: url.into(),
            updates,
        }
    }

    /// Parse an `Updates.xml` document fetched from directory `url`.
    pub fn parse(url: impl Into<String>, xml: &str) -> ManagerResult<Self> {
        let url = url.into();
        let doc = Document::parse(xml).map_err(|e| ManagerError::ManifestParseFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let updates = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name("PackageUpdate"))
            .filter_map(parse_update)
            .collect();

        Ok(Self { url, updates })
    }

    /// Directory URL the manifest was fetched from (with trailing `/`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Records in document order.
    pub fn updates(&self) -> &[PackageUpdate] {
        &self.updates
    }

    /// First record whose name equals any of `candidates`.
    pub fn find_first(&self, candidates: &[String]) -> Option<&PackageUpdate> {
        self.updates
            .iter()
            .find(|u| candidates.iter().any(|c| *c == u.name))
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Parse one `PackageUpdate` element; records without a name are skipped.
fn parse_update(node: Node<'_, '_>) -> Option<PackageUpdate> {
    let name = child_text(node, "Name")?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(PackageUpdate {
        name,
        version: child_text(node, "Version").map(|v| v.trim().to_string()),
        archives: child_text(node, "DownloadableArchives").map(split_archives),
        description: child_text(node, "Description").map(|d| d.trim().to_string()),
    })
}

/// Text of the first child element named `tag`; empty for an empty element.
fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .map(|n| n.text().unwrap_or(""))
}

fn split_archives(text: &str) -> Vec<String> {
    text.split(ARCHIVE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
