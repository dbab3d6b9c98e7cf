//! PEP 440 version specifier parser
//!
//! Handles specifier formats:
//! - Comparison: `==1.2.3`, `!=1.2.3`, `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Compatible release: `~=1.2`
//! - Arbitrary equality: `===1.2.3`
//! - Wildcard matching: `==1.2.*`, `!=1.*`
//! - Bare version (implicit `==`): `1.2.3`
//! - Any version: `*`
//! - Comma-separated lists: `>=1.21.0, <1.22.0`

use crate::domain::{is_valid_version, with_marker, Constraint, Operator, Requirement, ANY_TOKEN};
use crate::error::VersionError;
use std::str::FromStr;

/// Parses a comma-separated specifier into a [`Requirement`]
///
/// The first invalid piece aborts parsing; no partial requirement is returned.
pub fn parse_requirement(spec: &str) -> Result<Requirement, VersionError> {
    spec.split(',').map(parse_constraint).collect()
}

/// Parses a single constraint expression such as `>=1.2.3` or `==1.*`
pub fn parse_constraint(piece: &str) -> Result<Constraint, VersionError> {
    let piece = piece.trim();

    if piece == ANY_TOKEN {
        return Ok(Constraint::any());
    }

    let (operator, operand) = split_operator(piece);
    let operand = operand.trim();

    if operand.is_empty() {
        return Err(VersionError::missing_version(piece));
    }

    let version = with_marker(operand);
    let zero_filled = version.replace('*', "0");

    if zero_filled != version {
        // Wildcard operand: only equality and inequality become pattern matches
        if !is_valid_version(&zero_filled) {
            return Err(VersionError::invalid_version(piece));
        }

        let operator = match operator {
            Operator::Equal => Operator::WildcardMatch,
            Operator::NotEqual => Operator::WildcardNotMatch,
            _ => return Err(VersionError::invalid_matching(piece)),
        };

        crate::domain::compile_pattern(&version)
            .map_err(|_| VersionError::invalid_matching(piece))?;

        return Ok(Constraint::new(operator, version));
    }

    if !is_valid_version(&version) {
        return Err(VersionError::invalid_version(operand));
    }

    Ok(Constraint::new(operator, version))
}

/// Splits the longest known operator off the front of a piece; a piece with
/// no operator is an implicit `==`
fn split_operator(piece: &str) -> (Operator, &str) {
    Operator::PREFIXES
        .iter()
        .find_map(|op| piece.strip_prefix(op.symbol()).map(|rest| (*op, rest)))
        .unwrap_or((Operator::Equal, piece))
}

impl FromStr for Requirement {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_requirement(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpdateLevel;

    fn single(spec: &str) -> Constraint {
        let requirement = parse_requirement(spec).unwrap();
        assert_eq!(requirement.len(), 1, "{}", spec);
        requirement.constraints()[0].clone()
    }

    #[test]
    fn test_parse_operators() {
        let cases = [
            ("==2.26.0", Operator::Equal, "v2.26.0"),
            ("!=1.2.3", Operator::NotEqual, "v1.2.3"),
            (">=1.21.0", Operator::GreaterEq, "v1.21.0"),
            (">1.0", Operator::Greater, "v1.0"),
            ("<=2.0.0", Operator::LessEq, "v2.0.0"),
            ("<1.22.0", Operator::Less, "v1.22.0"),
            ("~=6.0", Operator::CompatibleRelease, "v6.0"),
            ("===1.2.3", Operator::ArbitraryEqual, "v1.2.3"),
        ];

        for (spec, operator, version) in cases {
            assert_eq!(single(spec), Constraint::new(operator, version), "{}", spec);
        }
    }

    #[test]
    fn test_parse_any() {
        assert_eq!(single("*"), Constraint::any());
        assert_eq!(single("  *  "), Constraint::any());
    }

    #[test]
    fn test_parse_bare_version_is_implicit_equal() {
        assert_eq!(single("1.10.211231"), Constraint::new(Operator::Equal, "v1.10.211231"));
    }

    #[test]
    fn test_parse_non_standard_version() {
        assert_eq!(single("==1.5.5.1"), Constraint::new(Operator::Equal, "v1.5.5.1"));
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let requirement = parse_requirement(">=1.21.0, <1.22.0").unwrap();
        assert_eq!(
            requirement.constraints(),
            &[
                Constraint::new(Operator::GreaterEq, "v1.21.0"),
                Constraint::new(Operator::Less, "v1.22.0"),
            ]
        );
    }

    #[test]
    fn test_parse_whitespace_after_operator() {
        assert_eq!(single(">= 1.2.3"), Constraint::new(Operator::GreaterEq, "v1.2.3"));
    }

    #[test]
    fn test_wildcard_rewrite() {
        assert_eq!(single("==1.*"), Constraint::new(Operator::WildcardMatch, "v1.*"));
        assert_eq!(
            single("!=3.0.*"),
            Constraint::new(Operator::WildcardNotMatch, "v3.0.*")
        );
        assert_eq!(single("1.2.*"), Constraint::new(Operator::WildcardMatch, "v1.2.*"));
    }

    #[test]
    fn test_wildcard_with_ordering_operator_fails() {
        for spec in [">=1.2.*", "<1.*", "~=1.*", "===1.*"] {
            assert_eq!(
                parse_requirement(spec).unwrap_err(),
                VersionError::invalid_matching(spec),
                "{}",
                spec
            );
        }
    }

    #[test]
    fn test_invalid_wildcard_operand_fails() {
        assert!(matches!(
            parse_requirement("==abc.*"),
            Err(VersionError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_missing_version() {
        for spec in [">=", "==", "~=", "< ", ""] {
            assert!(
                matches!(
                    parse_requirement(spec),
                    Err(VersionError::MissingVersion { .. })
                ),
                "{}",
                spec
            );
        }
    }

    #[test]
    fn test_invalid_version() {
        for spec in ["==latest", ">=1.2.3.4-beta", "1.2.x", "==1.2.3.post1"] {
            assert!(
                matches!(
                    parse_requirement(spec),
                    Err(VersionError::InvalidVersion { .. })
                ),
                "{}",
                spec
            );
        }
    }

    #[test]
    fn test_one_bad_piece_fails_everything() {
        assert!(parse_requirement(">=1.0.0, <=").is_err());
        assert!(parse_requirement(">=1.0.0, >=2.*").is_err());
    }

    #[test]
    fn test_from_str() {
        let requirement: Requirement = "~=1.2".parse().unwrap();
        assert_eq!(
            requirement.constraints(),
            &[Constraint::new(Operator::CompatibleRelease, "v1.2")]
        );
    }

    #[test]
    fn test_end_to_end_range() {
        let requirement = parse_requirement(">=1.21.0, <1.22.0").unwrap();
        assert_eq!(requirement.len(), 2);

        // Severity is only consulted once an update is needed
        let check = |latest: &str| {
            if requirement.needs_update(latest) {
                (true, requirement.update_level(latest).unwrap())
            } else {
                (false, UpdateLevel::None)
            }
        };

        assert_eq!(check("1.21.5"), (false, UpdateLevel::None));
        assert_eq!(check("1.22.0"), (true, UpdateLevel::Minor));
        assert_eq!(check("2.0.0"), (true, UpdateLevel::Major));
    }

    #[test]
    fn test_end_to_end_any_never_updates() {
        let requirement = parse_requirement("*").unwrap();
        assert!(!requirement.needs_update("v99.0.0"));
        assert_eq!(requirement.update_level("v99.0.0").unwrap(), UpdateLevel::None);
    }
}
