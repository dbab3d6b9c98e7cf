//! Update severity levels

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How far a candidate version is ahead of a requirement's tightest bound
///
/// Ordered `None < Patch < Minor < Major`, so a level can be compared
/// directly against a configured threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UpdateLevel {
    /// No update
    #[default]
    None = 0,
    /// Backward-compatible bug fixes
    Patch = 1,
    /// Backward-compatible features
    Minor = 2,
    /// Backward-incompatible changes
    Major = 3,
}

impl UpdateLevel {
    /// Returns the plain label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            UpdateLevel::None => "<none>",
            UpdateLevel::Patch => "patch",
            UpdateLevel::Minor => "minor",
            UpdateLevel::Major => "major",
        }
    }

    /// Returns true if an update is available at all
    pub fn is_update(&self) -> bool {
        *self != UpdateLevel::None
    }
}

impl fmt::Display for UpdateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UpdateLevel {
    type Err = ConfigError;

    /// Parses a configured threshold; `none` is not a valid threshold
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patch" => Ok(UpdateLevel::Patch),
            "minor" => Ok(UpdateLevel::Minor),
            "major" => Ok(UpdateLevel::Major),
            _ => Err(ConfigError::InvalidUpdateLevel {
                value: s.to_string(),
            }),
        }
    }
}
