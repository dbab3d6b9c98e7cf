//! Version specifier parsing
//!
//! This module turns PEP 440 specifier strings into [`Requirement`](crate::domain::Requirement)s:
//! - Operator recognition (longest operator first)
//! - Version marker prefixing and validation
//! - Wildcard operands rewritten into pattern constraints

mod specifier;

pub use specifier::{parse_constraint, parse_requirement};
