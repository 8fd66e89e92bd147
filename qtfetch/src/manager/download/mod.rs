//! HTTP transport for manifests and package archives.
//!
//! This module provides the production [`PackageDownloader`] implementation:
//! - In-memory fetches for `Updates.xml` (`fetch`)
//! - Streaming archive downloads with progress callbacks (`download`)
//!
//! [`PackageDownloader`]: crate::manager::PackageDownloader

mod http;

pub use http::{HttpDownloader, DEFAULT_TIMEOUT_SECS};
