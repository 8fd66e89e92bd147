//! Build-system recipe integration.
//!
//! A package-manager recipe describes the consumer's build with settings
//! (operating system, compiler version, CPU architecture) and one boolean
//! option per optional Qt module. This module maps those settings onto an
//! [`InstallRequest`] and produces what the recipe publishes afterwards: a
//! `qt.conf` pointing at the install root and the environment variables
//! downstream builds use to find Qt.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::manager::{InstallRequest, ManagerError, ManagerResult};
use crate::package::{HostOs, QtVersion, Target};

/// Optional Qt modules a recipe can enable, in install order.
pub const RECIPE_FEATURES: &[&str] = &[
    "webengine",
    "webglplugin",
    "virtualkeyboard",
    "script",
    "datavis3d",
    "charts",
    "networkauth",
    "purchasing",
    "remoteobjects",
];

/// Modules a recipe enables unless told otherwise.
pub const DEFAULT_RECIPE_FEATURES: &[&str] = &["webengine", "script"];

/// File name of the generated Qt configuration.
pub const QT_CONF_FILENAME: &str = "qt.conf";

/// Operating system as named by recipe settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOs {
    Linux,
    Windows,
    Macos,
    Ios,
}

impl RecipeOs {
    /// Repository host system serving this OS.
    pub fn host(&self) -> HostOs {
        match self {
            Self::Linux => HostOs::Linux,
            Self::Windows => HostOs::Windows,
            Self::Macos | Self::Ios => HostOs::Mac,
        }
    }
}

impl FromStr for RecipeOs {
    type Err = ManagerError;

    fn from_str(s: &str) -> ManagerResult<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "ios" => Ok(Self::Ios),
            _ => Err(ManagerError::InvalidConfig(format!(
                "unsupported recipe os '{}'",
                s
            ))),
        }
    }
}

/// CPU architecture as named by recipe settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuArch {
    X86,
    X86_64,
}

impl FromStr for CpuArch {
    type Err = ManagerError;

    fn from_str(s: &str) -> ManagerResult<Self> {
        match s.to_lowercase().as_str() {
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::X86_64),
            _ => Err(ManagerError::InvalidConfig(format!(
                "unsupported cpu architecture '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for CpuArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => f.write_str("x86"),
            Self::X86_64 => f.write_str("x86_64"),
        }
    }
}

/// Settings handed over by the build system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSettings {
    pub os: RecipeOs,
    /// Compiler version, e.g. `15` for Visual Studio 2017. Only used on Windows.
    pub compiler_version: Option<String>,
    pub arch: CpuArch,
    pub target: Target,
    /// Enabled optional modules (see [`RECIPE_FEATURES`]).
    ///
    /// Starts as [`DEFAULT_RECIPE_FEATURES`].
    pub features: Vec<String>,
}

impl RecipeSettings {
    pub fn new(os: RecipeOs, arch: CpuArch) -> Self {
        Self {
            os,
            compiler_version: None,
            arch,
            target: Target::Desktop,
            features: DEFAULT_RECIPE_FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Enable one module in addition to those already enabled.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        let feature = feature.into();
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    /// Disable one module.
    pub fn without_feature(mut self, feature: &str) -> Self {
        self.features.retain(|f| f != feature);
        self
    }

    /// Target platform; an iOS build always targets `ios`.
    pub fn effective_target(&self) -> Target {
        match self.os {
            RecipeOs::Ios => Target::Ios,
            _ => self.target,
        }
    }

    /// Repository architecture token for these settings.
    ///
    /// ```
    /// use qtfetch::recipe::{CpuArch, RecipeOs, RecipeSettings};
    ///
    /// let settings = RecipeSettings::new(RecipeOs::Windows, CpuArch::X86_64)
    ///     .with_compiler_version("15");
    /// assert_eq!(settings.arch_token().unwrap(), "win64_msvc2017_64");
    /// ```
    pub fn arch_token(&self) -> ManagerResult<String> {
        match self.os {
            RecipeOs::Linux => Ok("gcc_64".to_string()),
            RecipeOs::Macos => Ok("clang_64".to_string()),
            RecipeOs::Ios => Ok("ios".to_string()),
            RecipeOs::Windows => {
                let year = self.msvc_year()?;
                Ok(match self.arch {
                    CpuArch::X86 => format!("win32_msvc{}", year),
                    CpuArch::X86_64 => format!("win64_msvc{}_64", year),
                })
            }
        }
    }

    fn msvc_year(&self) -> ManagerResult<u32> {
        let version = self.compiler_version.as_deref().unwrap_or("").trim();
        let major = version.split('.').next().unwrap_or("");

        match major {
            "12" => Ok(2013),
            "14" => Ok(2015),
            "15" => Ok(2017),
            "16" => Ok(2019),
            "17" => Ok(2022),
            _ => Err(ManagerError::InvalidConfig(format!(
                "unsupported Visual Studio compiler version '{}' for {}",
                version, self.arch
            ))),
        }
    }

    /// Enabled features in install order, rejecting unknown names.
    pub fn components(&self) -> ManagerResult<Vec<String>> {
        if let Some(unknown) = self
            .features
            .iter()
            .find(|f| !RECIPE_FEATURES.contains(&f.as_str()))
        {
            return Err(ManagerError::InvalidConfig(format!(
                "unknown Qt module option '{}'",
                unknown
            )));
        }

        Ok(RECIPE_FEATURES
            .iter()
            .filter(|f| self.features.iter().any(|enabled| enabled == *f))
            .map(|f| f.to_string())
            .collect())
    }

    /// Build the install request for `version`.
    pub fn to_request(&self, version: QtVersion) -> ManagerResult<InstallRequest> {
        let request = InstallRequest::new(version, self.os.host(), self.effective_target())
            .with_arch(self.arch_token()?)
            .with_components(self.components()?);
        request.validate()?;
        Ok(request)
    }
}

/// Content of `qt.conf` for an install root.
///
/// ```
/// use std::path::Path;
/// use qtfetch::recipe::qt_conf;
///
/// assert_eq!(qt_conf(Path::new("/opt/qt")), "[Paths]\nPrefix = /opt/qt");
/// ```
pub fn qt_conf(install_root: &Path) -> String {
    format!(
        "[Paths]\nPrefix = {}",
        install_root.to_string_lossy().replace('\\', "/")
    )
}

/// Write `qt.conf` into `dir`, returning its path.
pub fn write_qt_conf(dir: &Path, install_root: &Path) -> ManagerResult<PathBuf> {
    let path = dir.join(QT_CONF_FILENAME);
    fs::write(&path, qt_conf(install_root)).map_err(|e| ManagerError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Environment a recipe exports to downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageEnv {
    pub cmake_prefix_path: Vec<PathBuf>,
    pub path: Vec<PathBuf>,
}

impl PackageEnv {
    /// Environment for Qt installed at `install_root` on `os`.
    pub fn for_install(install_root: &Path, os: RecipeOs) -> Self {
        let path = match os {
            RecipeOs::Windows => vec![install_root.join("bin")],
            _ => Vec::new(),
        };

        Self {
            cmake_prefix_path: vec![install_root.to_path_buf()],
            path,
        }
    }

    /// Variables to append, keyed by name; empty lists are omitted.
    pub fn vars(&self) -> ManagerResult<BTreeMap<&'static str, String>> {
        let mut vars = BTreeMap::new();
        for (name, paths) in [("CMAKE_PREFIX_PATH", &self.cmake_prefix_path), ("PATH", &self.path)] {
            if paths.is_empty() {
                continue;
            }
            let joined = std::env::join_paths(paths).map_err(|e| {
                ManagerError::InvalidConfig(format!("cannot export {}: {}", name, e))
            })?;
            vars.insert(name, joined.to_string_lossy().into_owned());
        }
        Ok(vars)
    }
}
