//! Host systems, targets, and architecture normalization.
//!
//! The Qt online repository identifies each platform/toolchain combination
//! with a canonical architecture token such as `gcc_64` or
//! `win64_msvc2019_64`. [`normalize_arch`] turns a caller request into that
//! token, filling in per-host defaults and applying the toolchain remaps the
//! repository layout requires.

use std::fmt;
use std::str::FromStr;

use super::QtVersion;
use crate::manager::{ManagerError, ManagerResult};

/// Operating system the Qt binaries are built to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    Linux,
    Mac,
    Windows,
}

impl HostOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::Windows => "windows",
        }
    }

    /// Repository directory for this host, e.g. `linux_x64`.
    pub fn repository_dir(&self) -> String {
        match self {
            Self::Windows => format!("{}_x86", self.as_str()),
            _ => format!("{}_x64", self.as_str()),
        }
    }

    /// Whether the repository publishes `target` for this host.
    pub fn supports_target(&self, target: Target) -> bool {
        matches!(
            (self, target),
            (Self::Linux, Target::Desktop)
                | (Self::Linux, Target::Android)
                | (Self::Mac, Target::Desktop)
                | (Self::Mac, Target::Ios)
                | (Self::Windows, Target::Desktop)
                | (Self::Windows, Target::Android)
        )
    }

    /// Architecture tokens accepted for explicit `--arch` requests.
    ///
    /// Empty when the repository does not publish `target` for this host.
    pub fn known_architectures(&self, target: Target) -> &'static [&'static str] {
        match (self, target) {
            (Self::Linux, Target::Desktop) => &["gcc_64"],
            (Self::Linux, Target::Android) => &[
                "android_armv7",
                "android_arm64_v8a",
                "android_x86",
                "android_x86_64",
            ],
            (Self::Mac, Target::Desktop) => &["clang_64"],
            (Self::Mac, Target::Ios) => &["ios"],
            (Self::Windows, Target::Desktop) => &[
                "win64_msvc2022_64",
                "win64_msvc2019_64",
                "win64_msvc2017_64",
                "win64_msvc2015_64",
                "win32_msvc2019",
                "win32_msvc2017",
                "win32_msvc2017_64",
                "win32_msvc2015",
                "win64_mingw81",
                "win32_mingw53",
            ],
            (Self::Windows, Target::Android) => &["android_armv7", "android_arm64_v8a", "android_x86"],
            (Self::Linux, Target::Ios)
            | (Self::Mac, Target::Android)
            | (Self::Windows, Target::Ios) => &[],
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostOs {
    type Err = ManagerError;

    fn from_str(s: &str) -> ManagerResult<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "mac" => Ok(Self::Mac),
            "windows" => Ok(Self::Windows),
            other => Err(ManagerError::InvalidConfig(format!(
                "unknown host system '{}' (expected linux, mac or windows)",
                other
            ))),
        }
    }
}

/// Platform the installed Qt build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Desktop,
    Android,
    Ios,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ManagerError;

    fn from_str(s: &str) -> ManagerResult<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(ManagerError::InvalidConfig(format!(
                "unknown target '{}' (expected desktop, android or ios)",
                other
            ))),
        }
    }
}

/// Default architecture for a host/target pair, if the repository has one.
pub fn default_arch(host: HostOs, target: Target) -> Option<&'static str> {
    match (host, target) {
        (HostOs::Linux, Target::Desktop) => Some("gcc_64"),
        (HostOs::Mac, Target::Desktop) => Some("clang_64"),
        (HostOs::Mac, Target::Ios) => Some("ios"),
        (HostOs::Linux, _) | (HostOs::Mac, _) | (HostOs::Windows, _) => None,
    }
}

/// Resolve the canonical architecture token for a request.
///
/// An explicit `raw_arch` goes through [`remap_toolchain`]; an empty one is
/// replaced by [`default_arch`], failing when the pair has no default.
///
/// # Example
///
/// ```
/// use qtfetch::package::{normalize_arch, HostOs, QtVersion, Target};
///
/// let version = QtVersion::new(6, 5, 0);
/// let arch = normalize_arch(HostOs::Linux, Target::Desktop, "", &version).unwrap();
/// assert_eq!(arch, "gcc_64");
/// ```
pub fn normalize_arch(
    host: HostOs,
    target: Target,
    raw_arch: &str,
    version: &QtVersion,
) -> ManagerResult<String> {
    let raw_arch = raw_arch.trim();
    if !raw_arch.is_empty() {
        return Ok(remap_toolchain(host, raw_arch, version));
    }

    default_arch(host, target)
        .map(str::to_string)
        .ok_or_else(|| ManagerError::ArchitectureRequired {
            host: host.to_string(),
            target: target.to_string(),
        })
}

/// Apply version-conditioned MSVC generation substitutions.
///
/// Qt 5.15 and later ship no MSVC 2017 builds; the binary compatible 2019
/// build is used instead. Qt 6 before 6.8 ships no MSVC 2022 builds either.
pub fn remap_toolchain(host: HostOs, arch: &str, version: &QtVersion) -> String {
    let remaps_2017 = (version.major() == 5 && version.minor() == 15) || version.major() >= 6;
    if host != HostOs::Windows || !remaps_2017 {
        return arch.to_string();
    }

    let arch = match arch {
        "win64_msvc2017_64" => "win64_msvc2019_64",
        "win32_msvc2017_64" => "win32_msvc2019_64",
        other => other,
    };

    if version.major() == 6 && version.minor() < 8 {
        if let Some(prefix) = arch.strip_suffix("_msvc2022_64") {
            return format!("{}_msvc2019_64", prefix);
        }
    }

    arch.to_string()
}
