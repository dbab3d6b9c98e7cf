//! Configuration file reader
//!
//! Reads the TOML file passed with `-c`:
//! - top-level settings (`check_dev_packages`, `excluded_packages`, `update_level`)
//! - `[gitlab]` private package registry access

use crate::domain::UpdateLevel;
use crate::error::ConfigError;
use crate::registry::GitLabConfig;
use crate::update::UpdateFilter;
use serde::Deserialize;
use std::path::Path;

/// Settings applied when no configuration file is given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Also check `[dev-packages]`
    pub check_dev_packages: bool,
    /// Packages whose updates never fail the run
    pub excluded_packages: Vec<String>,
    /// Minimum fatal update level
    pub update_level: UpdateLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_dev_packages: false,
            excluded_packages: Vec::new(),
            update_level: UpdateLevel::Minor,
        }
    }
}

impl Settings {
    /// Build the update filter for these settings
    pub fn filter(&self) -> UpdateFilter {
        UpdateFilter::new()
            .with_min_level(self.update_level)
            .with_excluded(self.excluded_packages.clone())
    }
}

/// Loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
    /// GitLab registry, only when a packages URL is configured
    pub gitlab: Option<GitLabConfig>,
}

/// File layout as written by users
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    check_dev_packages: bool,
    #[serde(default)]
    excluded_packages: Vec<String>,
    update_level: Option<String>,
    gitlab: Option<GitLabConfig>,
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration content; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let update_level = match file.update_level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => level.parse()?,
            _ => Settings::default().update_level,
        };

        Ok(Self {
            settings: Settings {
                check_dev_packages: file.check_dev_packages,
                excluded_packages: file.excluded_packages,
                update_level,
            },
            gitlab: file.gitlab.filter(GitLabConfig::is_configured),
        })
    }
}
