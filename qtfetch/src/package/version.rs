//! Qt release version handling.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::manager::{ManagerError, ManagerResult};

/// A Qt release version in `MAJOR.MINOR.PATCH` form.
///
/// # Example
///
/// ```
/// use qtfetch::package::QtVersion;
///
/// let version: QtVersion = "6.5.0".parse().unwrap();
/// assert_eq!(version.major(), 6);
/// assert_eq!(version.token(), "650");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QtVersion(Version);

impl QtVersion {
    /// Create a version from its numeric parts.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Concatenated version code used inside manifest names and URLs.
    ///
    /// ```
    /// use qtfetch::package::QtVersion;
    ///
    /// assert_eq!(QtVersion::new(5, 15, 2).token(), "5152");
    /// assert_eq!(QtVersion::new(6, 5, 0).token(), "650");
    /// ```
    pub fn token(&self) -> String {
        format!("{}{}{}", self.major(), self.minor(), self.patch())
    }
}

impl FromStr for QtVersion {
    type Err = ManagerError;

    fn from_str(s: &str) -> ManagerResult<Self> {
        let version = Version::parse(s.trim()).map_err(|e| {
            ManagerError::InvalidConfig(format!("{:?} is not a MAJOR.MINOR.PATCH version: {}", s, e))
        })?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(ManagerError::InvalidConfig(format!(
                "{:?} must not carry pre-release or build metadata",
                s
            )));
        }

        Ok(Self(version))
    }
}

impl fmt::Display for QtVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
