//! Manifest file parsing
//!
//! This module provides functionality to:
//! - Locate the Pipfile of a project
//! - Parse runtime and development dependencies into requirements
//! - Read the Python version the project requires

mod pipfile;

pub use pipfile::{resolve_path, Pipfile};
