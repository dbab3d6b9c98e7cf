//! Pipfile parser for Pipenv projects
//!
//! Handles:
//! - `[packages]` (runtime dependencies)
//! - `[dev-packages]` (development dependencies)
//! - `[requires]` `python_version` / `python_full_version`
//!
//! Entries installed from a local path or VCS (`{ path = "." }`,
//! `{ git = "..." }`) carry no version and are skipped.

use crate::domain::{Dependency, DependencyKind, Requirement};
use crate::error::ManifestError;
use crate::parser::parse_requirement;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

/// Keys marking an entry that is not installed from a registry
const LOCAL_SOURCE_KEYS: [&str; 4] = ["path", "git", "file", "editable"];

/// Parsed Pipfile content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipfile {
    /// `[packages]`, sorted by name
    pub runtime: Vec<Dependency>,
    /// `[dev-packages]`, sorted by name
    pub dev: Vec<Dependency>,
    /// Python version required by the project (empty when not declared)
    pub python_requirement: Requirement,
}

impl Pipfile {
    /// Reads and parses a Pipfile from disk
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::not_found(path));
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

        Self::parse_with_path(&content, path)
    }

    /// Parses Pipfile content
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Self::parse_with_path(content, Path::new("Pipfile"))
    }

    fn parse_with_path(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let table: Table = toml::from_str(content)
            .map_err(|e: toml::de::Error| ManifestError::toml_parse_error(path, e.to_string()))?;

        let mut pipfile = Pipfile::default();

        for (section, value) in &table {
            match section.as_str() {
                "packages" => {
                    pipfile.runtime = parse_section(value, DependencyKind::Runtime)?;
                }
                "dev-packages" => {
                    pipfile.dev = parse_section(value, DependencyKind::Dev)?;
                }
                "requires" => {
                    pipfile.python_requirement = parse_requires(value)?;
                }
                _ => debug!("Ignoring section '{}' in {}", section, path.display()),
            }
        }

        Ok(pipfile)
    }

    /// Returns the dependencies of one kind
    pub fn dependencies(&self, kind: DependencyKind) -> &[Dependency] {
        match kind {
            DependencyKind::Runtime => &self.runtime,
            DependencyKind::Dev => &self.dev,
        }
    }

    /// Returns true if no dependency is declared at all
    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.dev.is_empty()
    }
}

fn parse_section(value: &Value, kind: DependencyKind) -> Result<Vec<Dependency>, ManifestError> {
    let Some(entries) = value.as_table() else {
        return Err(ManifestError::InvalidEntry {
            package: kind.label().to_string(),
            message: "expected a table of packages".to_string(),
        });
    };

    let mut dependencies = Vec::with_capacity(entries.len());

    for (name, entry) in entries {
        let Some(spec) = entry_specifier(name, entry)? else {
            debug!("Skipping '{}': not installed from a registry", name);
            continue;
        };

        let requirement =
            parse_requirement(spec).map_err(|e| ManifestError::invalid_specifier(name, e))?;
        dependencies.push(Dependency::new(name.clone(), requirement, kind));
    }

    dependencies.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(dependencies)
}

/// Extracts the version specifier of one entry, `None` for local/VCS installs
fn entry_specifier<'a>(name: &str, entry: &'a Value) -> Result<Option<&'a str>, ManifestError> {
    match entry {
        Value::String(spec) => Ok(Some(spec)),
        Value::Table(fields) => match fields.get("version") {
            Some(Value::String(spec)) => Ok(Some(spec)),
            Some(_) => Err(ManifestError::InvalidEntry {
                package: name.to_string(),
                message: "'version' must be a string".to_string(),
            }),
            None if LOCAL_SOURCE_KEYS.iter().any(|k| fields.contains_key(*k)) => Ok(None),
            None => Err(ManifestError::MissingVersionField {
                package: name.to_string(),
            }),
        },
        _ => Err(ManifestError::InvalidEntry {
            package: name.to_string(),
            message: "expected a specifier string or a table".to_string(),
        }),
    }
}

fn parse_requires(value: &Value) -> Result<Requirement, ManifestError> {
    let spec = value
        .get("python_full_version")
        .or_else(|| value.get("python_version"))
        .and_then(Value::as_str);

    match spec {
        Some(spec) => {
            parse_requirement(spec).map_err(|e| ManifestError::invalid_specifier("python", e))
        }
        None => Ok(Requirement::empty()),
    }
}

/// Resolves the Pipfile path given on the command line, accepting a project directory
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join("Pipfile")
    } else {
        path.to_path_buf()
    }
}
