//! Dependency information structures

use super::Requirement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a dependency is needed at runtime or only for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Build/development-only dependency (`[dev-packages]`)
    Dev,
    /// Runtime dependency (`[packages]`)
    Runtime,
}

impl DependencyKind {
    /// Returns the label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Dev => "dev",
            DependencyKind::Runtime => "runtime",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A declared package dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Parsed version requirement
    pub requirement: Requirement,
    /// Runtime or development dependency
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(name: impl Into<String>, requirement: Requirement, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            requirement,
            kind,
        }
    }

    /// Creates a new runtime dependency
    pub fn runtime(name: impl Into<String>, requirement: Requirement) -> Self {
        Self::new(name, requirement, DependencyKind::Runtime)
    }

    /// Creates a new development dependency
    pub fn dev(name: impl Into<String>, requirement: Requirement) -> Self {
        Self::new(name, requirement, DependencyKind::Dev)
    }

    pub fn is_dev(&self) -> bool {
        self.kind == DependencyKind::Dev
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.requirement, self.kind)
    }
}
