//! Core domain models for wilf
//!
//! This module contains the version requirement engine and the types built on it:
//! - Canonical version normalization
//! - Operators, constraints and constraint evaluation
//! - Requirements: update decisions, severity and compatibility
//! - Update levels and dependency information

mod constraint;
mod dependency;
mod requirement;
mod update_level;
mod version;

pub use constraint::{compile_pattern, Constraint, Operator, ANY_TOKEN};
pub use dependency::{Dependency, DependencyKind};
pub use requirement::{are_compatible, Requirement};
pub use update_level::UpdateLevel;
pub use version::{is_valid_version, normalize, with_marker, CanonicalVersion, VERSION_MARKER};
