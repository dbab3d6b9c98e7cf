//! wilf - Pipfile update checker library
//!
//! This library provides:
//! - A PEP 440 flavored version requirement engine (parsing, evaluation,
//!   update severity and requirement compatibility)
//! - A Pipfile reader
//! - PyPI and GitLab package registry lookups
//! - Update reporters (tables, JUnit XML, JSON)

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
