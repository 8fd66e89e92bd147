//! Qt repository package model, naming, and resolution.
//!
//! This module provides the pure, network-free half of qtfetch: everything
//! needed to turn an install request into concrete archive URLs once the
//! `Updates.xml` manifest is in hand.
//!
//! # Overview
//!
//! - **QtVersion**: `MAJOR.MINOR.PATCH` release and its repository token
//! - **HostOs / Target**: platform enums and architecture normalization
//! - **Manifest**: parsed `Updates.xml` records
//! - **Naming**: candidate entry names and repository URLs
//! - **Selection**: matching a [`PackageRequest`] to a [`ResolvedPackage`]
//!
//! # Resolution Flow
//!
//! ```text
//! (host, target, arch?, version) ──normalize_arch──▶ canonical arch
//!                                                        │
//! Updates.xml ──Manifest::parse──▶ Manifest              │
//!                                     │                  ▼
//!                                     └──select_package(PackageRequest)──▶ ResolvedPackage
//! ```

mod manifest;
mod naming;
mod platform;
mod select;
mod version;

pub use manifest::{Manifest, ManifestEntry, PackageUpdate};
pub use naming::{
    addon_infix, archive_url, candidate_names, component_package_name, major_marker,
    manifest_dir_url, package_base_url, updates_url, with_trailing_slash, ADDONS_INFIX,
    DEFAULT_REPOSITORY_URL, SUPPORT_PACKAGES, UPDATES_FILENAME,
};
pub use platform::{default_arch, normalize_arch, remap_toolchain, HostOs, Target};
pub use select::{select_package, PackageRequest, ResolvedPackage};
pub use version::QtVersion;
