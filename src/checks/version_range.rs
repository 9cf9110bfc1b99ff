//! Build-tools version comparison.
//!
//! Build-tools versions are plain `major.minor.patch` triplets (`28.0.3`).
//! A requirement is satisfied only by an installed version with the same
//! triplet; nearby versions are reported but never accepted.

use semver::Version;

use crate::error::{DoctorError, Result};

/// Parse a build-tools version as a strict triplet
///
/// Preview suffixes (`30.0.0-rc4`) and short forms (`28.0`) are rejected so
/// they never match a release requirement.
pub fn parse_build_tools_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let parsed = Version::parse(version).ok()?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return None;
    }

    Some(parsed)
}

/// Check whether any installed version satisfies the required one
pub fn is_satisfied<S: AsRef<str>>(installed: &[S], required: &str) -> Result<bool> {
    let required_version = parse_required(required)?;

    Ok(installed
        .iter()
        .filter_map(|v| parse_build_tools_version(v.as_ref()))
        .any(|v| v == required_version))
}

/// Highest installed version not exceeding the required one
pub fn closest_installed<S: AsRef<str>>(installed: &[S], required: &str) -> Result<Option<Version>> {
    let required_version = parse_required(required)?;

    Ok(installed
        .iter()
        .filter_map(|v| parse_build_tools_version(v.as_ref()))
        .filter(|v| v <= &required_version)
        .max())
}

fn parse_required(required: &str) -> Result<Version> {
    if required.trim().is_empty() {
        return Err(DoctorError::input("required build-tools version is empty"));
    }

    parse_build_tools_version(required).ok_or_else(|| {
        DoctorError::input(format!(
            "required build-tools version '{}' is not a major.minor.patch triplet",
            required
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_version_is_satisfied() {
        assert!(is_satisfied(&["28.0.3"], "28.0.3").unwrap());
    }

    #[test]
    fn test_older_version_is_not_satisfied() {
        assert!(!is_satisfied(&["25.0.3"], "28.0.3").unwrap());
    }

    #[test]
    fn test_newer_version_is_not_satisfied() {
        assert!(!is_satisfied(&["29.0.2", "30.0.3"], "28.0.3").unwrap());
    }

    #[test]
    fn test_any_installed_version_can_match() {
        let installed = vec!["25.0.3".to_string(), "28.0.3".to_string(), "33.0.1".to_string()];
        assert!(is_satisfied(installed.as_slice(), "28.0.3").unwrap());
    }

    #[test]
    fn test_empty_installed_list() {
        let installed: Vec<String> = Vec::new();
        assert!(!is_satisfied(installed.as_slice(), "28.0.3").unwrap());
    }

    #[test]
    fn test_malformed_installed_versions_never_match() {
        assert!(!is_satisfied(&["28.0", "latest", "28.0.3-rc1", ""], "28.0.3").unwrap());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert!(is_satisfied(&[" 28.0.3\r"], "28.0.3 ").unwrap());
    }

    #[test]
    fn test_empty_requirement_is_input_error() {
        let err = is_satisfied(&["28.0.3"], "  ").unwrap_err();
        assert!(matches!(err, DoctorError::Input { .. }));
    }

    #[test]
    fn test_malformed_requirement_is_input_error() {
        let err = is_satisfied(&["28.0.3"], "28").unwrap_err();
        assert!(err.to_string().contains("not a major.minor.patch triplet"));
    }

    #[test]
    fn test_closest_installed_skips_newer_versions() {
        let closest = closest_installed(&["25.0.3", "27.0.3", "29.0.2"], "28.0.3").unwrap();
        assert_eq!(closest, Some(Version::new(27, 0, 3)));
    }

    #[test]
    fn test_closest_installed_none_when_all_newer() {
        let closest = closest_installed(&["30.0.3"], "28.0.3").unwrap();
        assert_eq!(closest, None);
    }
}
