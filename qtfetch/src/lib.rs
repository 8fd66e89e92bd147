//! qtfetch - Prebuilt Qt distribution installer
//!
//! This library resolves a Qt release, host system, target platform,
//! architecture, and optional modules against the Qt online repository's
//! `Updates.xml` manifest, then downloads and expands the matching 7-Zip
//! archives into an install root.
//!
//! - [`package`]: version, platform, manifest, naming, and selection
//! - [`manager`]: HTTP transport, extraction, installation orchestration
//! - [`recipe`]: build-system settings and exported install location
//! - [`config`]: `config.ini` handling
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod manager;
pub mod package;
pub mod recipe;
