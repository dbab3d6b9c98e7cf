//! GitLab PyPI package registry adapter
//!
//! Looks packages up in a GitLab project's package registry.
//! API endpoint: {project_api_packages_url}?package_type=pypi&package_name={package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, ProjectInfo, RegistryAdapter};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header carrying the GitLab access token
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Access to a GitLab project package registry (`[gitlab]` configuration table)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// Packages API of the project, e.g. `https://gitlab.example.com/api/v4/projects/42/packages`
    #[serde(default)]
    pub project_api_packages_url: String,
    /// Personal or project access token
    #[serde(default)]
    pub private_token: Option<String>,
}

impl GitLabConfig {
    /// Returns true if a registry URL is configured
    pub fn is_configured(&self) -> bool {
        !self.project_api_packages_url.trim().is_empty()
    }
}

/// GitLab adapter
pub struct GitLabAdapter {
    client: HttpClient,
    config: GitLabConfig,
}

/// One package entry of the packages API
#[derive(Debug, Deserialize)]
struct GitLabPackage {
    name: String,
    version: String,
    #[serde(rename = "_links", default)]
    links: GitLabLinks,
}

#[derive(Debug, Default, Deserialize)]
struct GitLabLinks {
    #[serde(default)]
    web_path: String,
}

impl GitLabAdapter {
    /// Create a new GitLab adapter
    pub fn new(client: HttpClient, config: GitLabConfig) -> Self {
        Self { client, config }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!(
            "{}?package_type=pypi&package_name={}",
            self.config.project_api_packages_url, package
        )
    }

    /// Joins the package web path to the scheme and host of the configured URL
    fn home_url(&self, package: &str, web_path: &str) -> Result<Option<String>, RegistryError> {
        if web_path.is_empty() {
            return Ok(None);
        }

        let invalid = |message: String| RegistryError::InvalidResponse {
            package: package.to_string(),
            registry: self.registry_name().to_string(),
            message,
        };

        let base = Url::parse(&self.config.project_api_packages_url)
            .map_err(|e| invalid(format!("invalid registry URL: {}", e)))?;
        let home = base
            .join(&format!("/{}", web_path.trim_start_matches('/')))
            .map_err(|e| invalid(format!("invalid web path '{}': {}", web_path, e)))?;

        Ok(Some(home.to_string()))
    }
}

#[async_trait]
impl RegistryAdapter for GitLabAdapter {
    fn registry_name(&self) -> &'static str {
        "GitLab"
    }

    async fn fetch_project(&self, package: &str) -> Result<Option<ProjectInfo>, RegistryError> {
        let url = self.build_url(package);
        debug!("Fetching GitLab package: {}", url);

        let headers: Vec<(&str, &str)> = self
            .config
            .private_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| vec![(PRIVATE_TOKEN_HEADER, token)])
            .unwrap_or_default();

        let mut packages: Vec<GitLabPackage> = match self
            .client
            .get_json(&url, &headers, package, self.registry_name())
            .await
        {
            Ok(packages) => packages,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if packages.len() > 1 {
            return Err(RegistryError::AmbiguousPackage {
                package: package.to_string(),
                registry: self.registry_name().to_string(),
            });
        }

        let Some(found) = packages.pop() else {
            return Ok(None);
        };

        let home_url = self.home_url(package, &found.links.web_path)?;

        Ok(Some(
            ProjectInfo::new(found.name, &found.version).with_home_url(home_url),
        ))
    }
}
