//! Requirements: ordered, ANDed lists of constraints
//!
//! Provides the aggregate decisions made over a whole requirement:
//! - whether a candidate version calls for an update
//! - how severe that update is
//! - whether two requirements can hold at the same time

use super::constraint::{Constraint, Operator};
use super::update_level::UpdateLevel;
use super::version::{normalize, CanonicalVersion};
use crate::error::VersionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// An ordered sequence of constraints that must all hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirement(Vec<Constraint>);

impl Requirement {
    /// Creates a requirement from constraints, keeping their order
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self(constraints)
    }

    /// Creates a requirement without constraints
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a constraint
    pub fn push(&mut self, constraint: Constraint) {
        self.0.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the requirement contains the `*` sentinel anywhere
    pub fn is_unconstrained(&self) -> bool {
        self.0.iter().any(Constraint::is_any)
    }

    /// Decides whether `latest` falls outside this requirement
    ///
    /// A `*` constraint anywhere in the list means the dependency is
    /// intentionally unconstrained and never needs updating. Otherwise any
    /// constraint that `latest` fails, or that cannot be evaluated, calls for
    /// an update.
    pub fn needs_update(&self, latest: &str) -> bool {
        if self.is_unconstrained() {
            return false;
        }

        self.0.iter().any(|constraint| match constraint.evaluate(latest) {
            Ok(satisfied) => !satisfied,
            Err(e) => {
                debug!("treating {} as unsatisfied by '{}': {}", constraint, latest, e);
                true
            }
        })
    }

    /// Classifies how far `latest` is from the tightest stated lower bound
    ///
    /// The bound is the highest version named by a lower-bounding constraint
    /// (`>=`, `>`, `==`, `~=`, `===`, wildcard match), falling back to the
    /// highest version named by any constraint when there is none. Wildcard
    /// segments count as `0`. A requirement naming no real version yields
    /// [`UpdateLevel::None`].
    pub fn update_level(&self, latest: &str) -> Result<UpdateLevel, VersionError> {
        if self.0.is_empty() {
            return Err(VersionError::MissingRequirement);
        }

        let mut lower: Option<CanonicalVersion> = None;
        let mut any: Option<CanonicalVersion> = None;
        for constraint in self.0.iter().filter(|c| !c.is_any()) {
            let bound = CanonicalVersion::parse_bound(&constraint.version)?;
            if constraint.operator.is_lower_bound() {
                lower = max_of(lower, bound.clone());
            }
            any = max_of(any, bound);
        }

        let highest = lower.or(any).unwrap_or(CanonicalVersion::ZERO);
        if highest == CanonicalVersion::ZERO {
            return Ok(UpdateLevel::None);
        }

        let latest = normalize(latest)?;

        Ok(if latest.major != highest.major {
            UpdateLevel::Major
        } else if !latest.same_minor_line(&highest) {
            UpdateLevel::Minor
        } else if latest != highest {
            UpdateLevel::Patch
        } else {
            UpdateLevel::None
        })
    }

    /// Decides whether this requirement and `other` can both hold
    ///
    /// This is a pairwise approximation, not an interval intersection: every
    /// real constraint of one side is checked against every real constraint of
    /// the other, using each constraint's version as a candidate for the
    /// opposite constraint. An `==` constraint on either side only needs its
    /// version to satisfy the opposite constraint.
    pub fn is_compatible_with(&self, other: &Requirement) -> bool {
        for ours in self.0.iter().filter(|c| !c.is_any()) {
            for theirs in other.0.iter().filter(|c| !c.is_any()) {
                if theirs.operator == Operator::Equal && ours.matches(&theirs.version) {
                    continue;
                }

                if ours.operator == Operator::Equal && theirs.matches(&ours.version) {
                    continue;
                }

                if !ours.matches(&theirs.version) || !theirs.matches(&ours.version) {
                    debug!("{} and {} are not compatible", ours, theirs);
                    return false;
                }
            }
        }

        true
    }
}

fn max_of(current: Option<CanonicalVersion>, bound: CanonicalVersion) -> Option<CanonicalVersion> {
    match current {
        Some(current) if current >= bound => Some(current),
        _ => Some(bound),
    }
}

/// Free-function form of [`Requirement::is_compatible_with`]
pub fn are_compatible(a: &Requirement, b: &Requirement) -> bool {
    a.is_compatible_with(b)
}

impl From<Vec<Constraint>> for Requirement {
    fn from(constraints: Vec<Constraint>) -> Self {
        Self::new(constraints)
    }
}

impl FromIterator<Constraint> for Requirement {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Requirement {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}
