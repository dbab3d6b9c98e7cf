//! Version constraints and their evaluation
//!
//! A constraint pairs an [`Operator`] with a version token. Tokens carry the
//! version marker (`v1.2.3`), wildcard patterns keep their `*` segments
//! (`v1.2.*`), and the [`Operator::Any`] sentinel uses `*`.

use super::version::{normalize, with_marker, CanonicalVersion};
use crate::error::VersionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

/// Token used by the [`Operator::Any`] sentinel
pub const ANY_TOKEN: &str = "*";

/// Closed set of constraint operators (PEP 440 family plus internal pattern forms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `===`: raw string equality, no normalization
    ArbitraryEqual,
    /// `~`: wildcard pattern match (rewritten from `==` with a wildcard operand)
    WildcardMatch,
    /// `!~`: wildcard pattern non-match (rewritten from `!=` with a wildcard operand)
    WildcardNotMatch,
    /// `<=`
    LessEq,
    /// `<`
    Less,
    /// `!=`
    NotEqual,
    /// `~=`: same major, at or above the bound
    CompatibleRelease,
    /// `==`
    Equal,
    /// `>=`
    GreaterEq,
    /// `>`
    Greater,
    /// `*`: no real constraint
    Any,
}

impl Operator {
    /// Operators a specifier may start with, longest first so that no operator
    /// is shadowed by one of its prefixes
    pub const PREFIXES: [Operator; 8] = [
        Operator::ArbitraryEqual,
        Operator::LessEq,
        Operator::NotEqual,
        Operator::Equal,
        Operator::GreaterEq,
        Operator::CompatibleRelease,
        Operator::Less,
        Operator::Greater,
    ];

    /// Returns the textual symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::WildcardMatch => "~",
            Operator::WildcardNotMatch => "!~",
            Operator::LessEq => "<=",
            Operator::Less => "<",
            Operator::NotEqual => "!=",
            Operator::CompatibleRelease => "~=",
            Operator::Equal => "==",
            Operator::GreaterEq => ">=",
            Operator::Greater => ">",
            Operator::Any => "*",
        }
    }

    /// Returns true for operators decided by a three-way ordered comparison
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::LessEq
                | Operator::Less
                | Operator::NotEqual
                | Operator::CompatibleRelease
                | Operator::Equal
                | Operator::GreaterEq
                | Operator::Greater
        )
    }

    /// Returns true for operators whose version is a floor for satisfying versions
    pub fn is_lower_bound(&self) -> bool {
        matches!(
            self,
            Operator::ArbitraryEqual
                | Operator::WildcardMatch
                | Operator::CompatibleRelease
                | Operator::Equal
                | Operator::GreaterEq
                | Operator::Greater
        )
    }

    /// Returns true for the wildcard pattern operators
    pub fn is_pattern(&self) -> bool {
        matches!(self, Operator::WildcardMatch | Operator::WildcardNotMatch)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `(operator, version token)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub operator: Operator,
    pub version: String,
}

impl Constraint {
    /// Creates a new constraint
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }

    /// The permanently satisfied `(*, *)` placeholder
    pub fn any() -> Self {
        Self::new(Operator::Any, ANY_TOKEN)
    }

    /// Returns true if this is the `*` sentinel
    pub fn is_any(&self) -> bool {
        self.operator == Operator::Any
    }

    /// Decides whether `latest` satisfies this constraint
    ///
    /// Returns an error when the constraint cannot be evaluated at all, either
    /// because a version does not normalize or because the pattern does not
    /// compile. Callers that only need a yes/no answer use [`Constraint::matches`].
    pub fn evaluate(&self, latest: &str) -> Result<bool, VersionError> {
        match self.operator {
            Operator::Any => Ok(true),
            Operator::ArbitraryEqual => Ok(self.version == latest),
            op if op.is_pattern() => {
                let pattern = compile_pattern(&self.version)?;
                let matched = pattern.is_match(&pattern_subject(latest));
                Ok(if op == Operator::WildcardMatch {
                    matched
                } else {
                    !matched
                })
            }
            op if op.is_ordering() => {
                // A wildcard operand used as candidate compares with its `*` segments as 0
                let candidate = CanonicalVersion::parse_bound(latest)?;
                let bound = CanonicalVersion::parse_bound(&self.version)?;
                Ok(self.compare(&candidate, &bound))
            }
            _ => Ok(false),
        }
    }

    /// Lenient form of [`Constraint::evaluate`]: an invalid evaluation is logged
    /// and reported as not matching
    pub fn matches(&self, latest: &str) -> bool {
        self.evaluate(latest).unwrap_or_else(|e| {
            warn!("cannot evaluate '{}' against {}: {}", latest, self, e);
            false
        })
    }

    fn compare(&self, candidate: &CanonicalVersion, bound: &CanonicalVersion) -> bool {
        let ordering = candidate.cmp(bound);
        match self.operator {
            Operator::LessEq => ordering != Ordering::Greater,
            Operator::Less => ordering == Ordering::Less,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::CompatibleRelease => {
                candidate.major == bound.major && ordering != Ordering::Less
            }
            Operator::Equal => ordering == Ordering::Equal,
            Operator::GreaterEq => ordering != Ordering::Less,
            Operator::Greater => ordering == Ordering::Greater,
            _ => false,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str(ANY_TOKEN);
        }
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// Compiles a wildcard operand into an anchored regular expression
///
/// Every `*` matches any sequence; everything else is literal.
pub fn compile_pattern(matching: &str) -> Result<Regex, VersionError> {
    let body = matching
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).map_err(|_| VersionError::invalid_matching(matching))
}

/// Text a wildcard pattern is matched against: the canonical form when the
/// version normalizes, the marker-prefixed raw token otherwise
fn pattern_subject(latest: &str) -> String {
    match normalize(latest) {
        Ok(version) => version.to_string(),
        Err(_) => with_marker(latest.trim()),
    }
}
