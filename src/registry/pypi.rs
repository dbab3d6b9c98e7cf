//! PyPI JSON API adapter
//!
//! Fetches the latest release of a package from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::error::RegistryError;
use crate::registry::{HttpClient, ProjectInfo, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// PyPI base URL
const PYPI_BASE_URL: &str = "https://pypi.org";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PyPIInfo,
}

/// Metadata of the latest release
#[derive(Debug, Deserialize)]
struct PyPIInfo {
    name: String,
    version: String,
    home_page: Option<String>,
    project_url: Option<String>,
    package_url: Option<String>,
    requires_python: Option<String>,
}

impl PyPIInfo {
    /// First non-empty URL among the home page and the PyPI project pages
    fn home_url(&self) -> Option<String> {
        [&self.home_page, &self.project_url, &self.package_url]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .cloned()
    }
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_BASE_URL)
    }

    /// Create an adapter for a PyPI mirror
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_project(&self, package: &str) -> Result<Option<ProjectInfo>, RegistryError> {
        let url = self.build_url(package);
        debug!("Fetching PyPI package: {}", url);

        let response: PyPIResponse = match self
            .client
            .get_json(&url, &[], package, self.registry_name())
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let home_url = response.info.home_url();
        let info = response.info;

        Ok(Some(
            ProjectInfo::new(info.name, &info.version)
                .with_home_url(home_url)
                .with_requires_python(info.requires_python),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn adapter(base_url: String) -> PyPIAdapter {
        PyPIAdapter::with_base_url(HttpClient::new().unwrap().with_max_retries(0), base_url)
    }

    #[test]
    fn test_build_url() {
        let adapter = PyPIAdapter::new(HttpClient::new().unwrap());
        assert_eq!(
            adapter.build_url("flask-restful"),
            "https://pypi.org/pypi/flask-restful/json"
        );
        assert_eq!(adapter.registry_name(), "PyPI");
    }

    #[tokio::test]
    async fn test_fetch_project() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "info": {
                        "name": "requests",
                        "version": "2.31.0",
                        "home_page": "https://requests.readthedocs.io",
                        "project_url": "https://pypi.org/project/requests/",
                        "requires_python": ">=3.7"
                    },
                    "releases": {}
                }"#,
            )
            .create_async()
            .await;

        let info = adapter(server.url())
            .fetch_project("requests")
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;

        assert_eq!(info.name, "requests");
        assert_eq!(info.version, "v2.31.0");
        assert_eq!(
            info.home_url.as_deref(),
            Some("https://requests.readthedocs.io")
        );
        assert_eq!(info.requires_python.as_deref(), Some(">=3.7"));
    }

    #[tokio::test]
    async fn test_fetch_project_home_url_fallback() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pypi/envyaml/json")
            .with_status(200)
            .with_body(
                r#"{
                    "info": {
                        "name": "envyaml",
                        "version": "1.10.211231",
                        "home_page": "",
                        "project_url": "https://pypi.org/project/envyaml/",
                        "requires_python": null
                    }
                }"#,
            )
            .create_async()
            .await;

        let info = adapter(server.url())
            .fetch_project("envyaml")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(info.version, "v1.10.211231");
        assert_eq!(
            info.home_url.as_deref(),
            Some("https://pypi.org/project/envyaml/")
        );
        assert!(info.requires_python.is_none());
    }

    #[tokio::test]
    async fn test_fetch_project_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/nonexistent/json")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = adapter(server.url()).fetch_project("nonexistent").await;

        mock.assert_async().await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_project_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pypi/broken/json")
            .with_status(200)
            .with_body(r#"{"message": "Internal error"}"#)
            .create_async()
            .await;

        let result = adapter(server.url()).fetch_project("broken").await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse { .. })));
    }
}
