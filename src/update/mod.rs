//! Update checking for dependencies
//!
//! This module provides:
//! - The `Checker` trait answering "which update does this package need?"
//! - A registry-backed checker honoring the project's Python requirement
//! - A composite checker trying several registries in order
//! - The filter deciding which updates are fatal

mod composite;
mod filter;

pub use composite::CompositeChecker;
pub use filter::UpdateFilter;

use crate::domain::{are_compatible, Requirement, UpdateLevel};
use crate::error::{AppError, VersionError};
use crate::parser::parse_requirement;
use crate::registry::{ProjectInfo, RegistryAdapter};
use async_trait::async_trait;
use tracing::debug;

/// Outcome of checking one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCheck {
    /// Latest version known to the registry (`None` if the package was not found)
    pub latest: Option<String>,
    /// Severity of the required update
    pub level: UpdateLevel,
    /// Project home page
    pub home_url: Option<String>,
}

impl UpdateCheck {
    /// The package is unknown to the registry
    pub fn not_found() -> Self {
        Self::default()
    }

    /// The package was found; `level` is the required update
    pub fn found(info: ProjectInfo, level: UpdateLevel) -> Self {
        Self {
            latest: Some(info.version),
            level,
            home_url: info.home_url,
        }
    }

    /// Returns true if an update is required
    pub fn is_update(&self) -> bool {
        self.level.is_update()
    }
}

/// Trait for update checkers
#[async_trait]
pub trait Checker: Send + Sync {
    /// Decide which update, if any, `package` needs to satisfy its latest release
    async fn required_update(
        &self,
        package: &str,
        requirement: &Requirement,
    ) -> Result<UpdateCheck, AppError>;
}

/// Checker backed by a single registry
pub struct RegistryChecker {
    adapter: Box<dyn RegistryAdapter>,
    python_requirement: Requirement,
}

impl RegistryChecker {
    /// Create a checker for a registry, without Python version constraint
    pub fn new(adapter: Box<dyn RegistryAdapter>) -> Self {
        Self {
            adapter,
            python_requirement: Requirement::empty(),
        }
    }

    /// Only propose updates whose supported Python versions are compatible with `requirement`
    pub fn with_python_requirement(mut self, requirement: Requirement) -> Self {
        self.python_requirement = requirement;
        self
    }

    /// Returns false if the package declares Python versions the project cannot use
    ///
    /// A `requires_python` that does not parse is an error.
    fn supports_project_python(&self, info: &ProjectInfo) -> Result<bool, VersionError> {
        if self.python_requirement.is_empty() {
            return Ok(true);
        }

        let Some(requires_python) = info.requires_python.as_deref() else {
            return Ok(true);
        };

        let package_python = parse_requirement(requires_python)?;
        Ok(are_compatible(&self.python_requirement, &package_python))
    }
}

#[async_trait]
impl Checker for RegistryChecker {
    async fn required_update(
        &self,
        package: &str,
        requirement: &Requirement,
    ) -> Result<UpdateCheck, AppError> {
        let Some(info) = self.adapter.fetch_project(package).await? else {
            debug!("{} not found in {}", package, self.adapter.registry_name());
            return Ok(UpdateCheck::not_found());
        };

        if !self.supports_project_python(&info)? {
            debug!(
                "{} {} does not support Python {}",
                package, info.version, self.python_requirement
            );
            return Ok(UpdateCheck::found(info, UpdateLevel::None));
        }

        if !requirement.needs_update(&info.version) {
            return Ok(UpdateCheck::found(info, UpdateLevel::None));
        }

        let level = requirement.update_level(&info.version)?;
        Ok(UpdateCheck::found(info, level))
    }
}
