//! Update filter configuration
//!
//! This module provides the UpdateFilter struct that decides which
//! available updates are fatal and which packages are excluded.

use crate::domain::UpdateLevel;

/// Filter configuration for update reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFilter {
    /// Updates at or above this level are fatal
    pub min_level: UpdateLevel,
    /// Packages whose updates never fail the run
    pub excluded: Vec<String>,
}

impl Default for UpdateFilter {
    fn default() -> Self {
        Self {
            min_level: UpdateLevel::Minor,
            excluded: Vec::new(),
        }
    }
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (minor threshold, no exclusions)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fatal threshold
    pub fn with_min_level(mut self, min_level: UpdateLevel) -> Self {
        self.min_level = min_level;
        self
    }

    /// Set packages to exclude
    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Check if a package is excluded
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|p| p == name)
    }

    /// Check if an update of the given level reaches the threshold
    pub fn is_fatal(&self, level: UpdateLevel) -> bool {
        level.is_update() && level >= self.min_level
    }
}
