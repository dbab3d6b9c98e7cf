//! Canonical version normalization
//!
//! Turns raw version tokens into an ordered `major.minor.patch` form:
//! - Standard versions: `1.2.3`, `v1.2.3`, `1.2.3-rc.1`, `1.2.3+build`
//! - Shorthand versions: `1`, `1.2` (missing segments are zero)
//! - Non-standard versions: `1.2.3.4` (truncated to the first three segments)
//!
//! Non-standard versions carrying pre-release or build metadata are rejected.

use crate::error::VersionError;
use semver::Prerelease;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Marker prepended to every canonical version
pub const VERSION_MARKER: char = 'v';

/// A normalized version, ordered by `(major, minor, patch, pre-release)`
///
/// Build metadata is accepted on input but ignored, so it never affects ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
}

impl CanonicalVersion {
    /// The floor used when looking for the highest bound of a requirement
    pub const ZERO: CanonicalVersion = CanonicalVersion {
        major: 0,
        minor: 0,
        patch: 0,
        pre: Prerelease::EMPTY,
    };

    /// Creates a release version without pre-release identifiers
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
        }
    }

    /// Normalizes a raw version token
    pub fn parse(token: &str) -> Result<Self, VersionError> {
        normalize(token)
    }

    /// Normalizes a bound, replacing wildcard segments with `0` first
    ///
    /// `1.2.*` becomes `1.2.0`.
    pub fn parse_bound(token: &str) -> Result<Self, VersionError> {
        normalize(&token.replace('*', "0"))
    }

    /// Returns true if both versions share the same major and minor components
    pub fn same_minor_line(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl Ord for CanonicalVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| self.pre.cmp(&other.pre))
    }
}

impl PartialOrd for CanonicalVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CanonicalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}.{}.{}",
            VERSION_MARKER, self.major, self.minor, self.patch
        )?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        Ok(())
    }
}

impl FromStr for CanonicalVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

/// Prefixes a token with the version marker unless it already carries one
pub fn with_marker(token: &str) -> String {
    if token.starts_with(VERSION_MARKER) {
        token.to_string()
    } else {
        format!("{}{}", VERSION_MARKER, token)
    }
}

/// Normalizes any version token into a [`CanonicalVersion`]
pub fn normalize(token: &str) -> Result<CanonicalVersion, VersionError> {
    let invalid = || VersionError::invalid_version(token);

    let trimmed = token.trim();
    let body = trimmed.strip_prefix(VERSION_MARKER).unwrap_or(trimmed);

    if body.is_empty() {
        return Err(invalid());
    }

    // Pre-release or build metadata: only the standard three-segment form is allowed
    if body.contains(['-', '+']) {
        let parsed = semver::Version::parse(body).map_err(|_| invalid())?;
        return Ok(CanonicalVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: parsed.pre,
        });
    }

    // Segments past the third are dropped unchecked (`2.8.2.post1` is `2.8.2`)
    let mut segments = [0u64; 3];
    for (index, segment) in body.split('.').take(3).enumerate() {
        if !is_numeric(segment) {
            return Err(invalid());
        }
        segments[index] = segment.parse().map_err(|_| invalid())?;
    }

    Ok(CanonicalVersion::new(segments[0], segments[1], segments[2]))
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if the token is a version a specifier may carry
///
/// Stricter than [`normalize`]: every dot segment of a non-standard version
/// must be numeric, so `1.2.3.post1` is rejected here.
pub fn is_valid_version(token: &str) -> bool {
    let trimmed = token.trim();
    let body = trimmed.strip_prefix(VERSION_MARKER).unwrap_or(trimmed);

    if body.contains(['-', '+']) {
        return normalize(body).is_ok();
    }

    body.split('.').all(is_numeric) && normalize(body).is_ok()
}
