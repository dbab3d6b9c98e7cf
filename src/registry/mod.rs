//! Registry adapters for fetching the latest release of a package
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API adapter
//! - GitLab PyPI package registry adapter

mod client;
mod gitlab;
mod pypi;

pub use client::HttpClient;
pub use gitlab::{GitLabAdapter, GitLabConfig};
pub use pypi::PyPIAdapter;

use crate::domain::with_marker;
use crate::error::RegistryError;
use async_trait::async_trait;
use serde::Serialize;

/// Latest release information of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    /// Package name as reported by the registry
    pub name: String,
    /// Latest version, carrying the version marker (`v2.31.0`)
    pub version: String,
    /// Project home page
    pub home_url: Option<String>,
    /// Python versions the latest release supports (`>=3.8`)
    pub requires_python: Option<String>,
}

impl ProjectInfo {
    /// Creates project information, prefixing the version with the marker
    pub fn new(name: impl Into<String>, version: &str) -> Self {
        Self {
            name: name.into(),
            version: with_marker(version.trim()),
            home_url: None,
            requires_python: None,
        }
    }

    /// Sets the home page, ignoring empty values
    pub fn with_home_url(mut self, home_url: Option<String>) -> Self {
        self.home_url = home_url.filter(|url| !url.trim().is_empty());
        self
    }

    /// Sets the supported Python versions, ignoring empty values
    pub fn with_requires_python(mut self, requires_python: Option<String>) -> Self {
        self.requires_python = requires_python.filter(|spec| !spec.trim().is_empty());
        self
    }
}

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the latest release of a package
    ///
    /// Returns `Ok(None)` when the registry does not know the package.
    async fn fetch_project(&self, package: &str) -> Result<Option<ProjectInfo>, RegistryError>;
}
