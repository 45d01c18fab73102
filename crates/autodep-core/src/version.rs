//! Strict semantic-version comparison.
//!
//! Installed and requested versions are compared with full semver
//! precedence (pre-releases sort below their release, build metadata is
//! ignored). A single leading `v` or `=` is accepted, as npm does; anything
//! else that is not a valid semver string is an error rather than a guess.
//!
//! ```
//! use autodep_core::version;
//! use std::cmp::Ordering;
//!
//! assert_eq!(version::compare("1.0.0", "v1.0.0").unwrap(), Ordering::Equal);
//! assert!(version::is_older("1.2.3", "1.10.0").unwrap());
//! assert!(version::compare("1.2", "1.2.0").is_err());
//! ```

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Parse a version string strictly.
pub fn parse(version: &str) -> Result<semver::Version> {
    let trimmed = version.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed);

    semver::Version::parse(bare).map_err(|source| Error::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

/// Order two version strings by semver precedence.
pub fn compare(left: &str, right: &str) -> Result<Ordering> {
    let left = parse(left)?;
    let right = parse(right)?;
    Ok(left.cmp_precedence(&right))
}

/// `true` when `installed` sorts strictly below `wanted`.
pub fn is_older(installed: &str, wanted: &str) -> Result<bool> {
    Ok(compare(installed, wanted)? == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0.0", "2.0.0", Ordering::Less)]
    #[case("2.0.0", "1.9.9", Ordering::Greater)]
    #[case("1.2.3", "1.2.3", Ordering::Equal)]
    #[case("1.2.3", "1.10.0", Ordering::Less)]
    #[case("1.0.0-beta.1", "1.0.0", Ordering::Less)]
    #[case("1.0.0-alpha", "1.0.0-beta", Ordering::Less)]
    #[case("1.0.0+build.5", "1.0.0", Ordering::Equal)]
    #[case("v1.0.0", "=1.0.0", Ordering::Equal)]
    #[case("  1.0.1 ", "1.0.0", Ordering::Greater)]
    fn test_compare(#[case] left: &str, #[case] right: &str, #[case] expected: Ordering) {
        assert_eq!(compare(left, right).unwrap(), expected);
    }

    #[rstest]
    #[case("1.2")]
    #[case("latest")]
    #[case("")]
    #[case("^1.0.0")]
    fn test_malformed_is_error(#[case] bad: &str) {
        let err = compare(bad, "1.0.0").unwrap_err();
        assert!(
            matches!(err, Error::InvalidVersion { ref version, .. } if version == bad),
            "expected InvalidVersion, got: {err:?}"
        );
    }

    #[test]
    fn test_malformed_right_side_is_error() {
        assert!(compare("1.0.0", "not-a-version").is_err());
    }

    #[test]
    fn test_is_older_equal_is_not_older() {
        assert!(!is_older("2.0.0", "2.0.0").unwrap());
        assert!(is_older("1.9.9", "2.0.0").unwrap());
        assert!(!is_older("2.0.1", "2.0.0").unwrap());
    }
}
