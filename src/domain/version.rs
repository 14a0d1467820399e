use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-(.*))?$").expect("version pattern is valid")
});

/// Semantic version representation
///
/// The pre-release suffix is carried verbatim; nothing beyond its presence is
/// validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
}

impl SemanticVersion {
    /// Create a new version without a pre-release suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// Parse a `MAJOR.MINOR.PATCH[-suffix]` string
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ReleaseError::InvalidVersionFormat(text.to_string());

        let caps = VERSION_RE.captures(text).ok_or_else(invalid)?;
        let component = |i: usize| caps[i].parse::<u64>().map_err(|_| invalid());

        Ok(SemanticVersion {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Bump version according to bump kind, dropping any pre-release suffix.
    ///
    /// Fails with [ReleaseError::VersionOverflow] when the incremented
    /// component is already `u64::MAX`.
    pub fn bump(&self, kind: BumpKind) -> Result<Self> {
        let overflow = || ReleaseError::VersionOverflow {
            version: self.to_string(),
            kind,
        };

        Ok(match kind {
            BumpKind::Major => {
                SemanticVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            BumpKind::Minor => SemanticVersion::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            BumpKind::Patch => SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }

    /// Name of the annotated tag that marks this version (e.g. "v1.2.3")
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

/// Which component of the version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// How the next version is chosen: bumped from the current one, or given outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpRequest {
    Kind(BumpKind),
    Explicit(SemanticVersion),
}

impl BumpRequest {
    /// Build a request from the two optional CLI inputs.
    ///
    /// Exactly one of `kind` and `explicit` must be supplied; the explicit
    /// version is validated here.
    pub fn from_parts(kind: Option<BumpKind>, explicit: Option<&str>) -> Result<Self> {
        match (kind, explicit) {
            (Some(kind), None) => Ok(BumpRequest::Kind(kind)),
            (None, Some(text)) => Ok(BumpRequest::Explicit(SemanticVersion::parse(text)?)),
            (Some(_), Some(_)) => Err(ReleaseError::bump_request(
                "specify either a bump kind or an explicit version, not both",
            )),
            (None, None) => Err(ReleaseError::bump_request(
                "must specify either a bump kind or an explicit version",
            )),
        }
    }

    /// Resolve the next version from the current manifest version string.
    ///
    /// The current version only has to parse when bumping by kind.
    pub fn resolve(&self, current: &str) -> Result<SemanticVersion> {
        match self {
            BumpRequest::Kind(kind) => SemanticVersion::parse(current)?.bump(*kind),
            BumpRequest::Explicit(version) => Ok(version.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert_eq!(v.pre_release, None);
    }

    #[test]
    fn test_version_parse_with_suffix() {
        let v = SemanticVersion::parse("2.0.0-rc.1").unwrap();
        assert_eq!(v.pre_release.as_deref(), Some("rc.1"));
        assert_eq!(v.to_string(), "2.0.0-rc.1");
    }

    #[test]
    fn test_version_parse_rejects_tag_prefix() {
        assert!(SemanticVersion::parse("v1.2.3").is_err());
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in ["1.2", "a.b.c", "1.2.3.4", "", "1.2.x", " 1.2.3"] {
            let err = SemanticVersion::parse(input).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidVersionFormat(ref s) if s == input),
                "expected InvalidVersionFormat for {:?}, got {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_version_bump_drops_suffix() {
        let v = SemanticVersion::parse("1.4.0-beta").unwrap();
        assert_eq!(v.bump(BumpKind::Patch).unwrap().to_string(), "1.4.1");
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = SemanticVersion::new(1, 2, 3).bump(BumpKind::Major).unwrap();
        assert_eq!(bumped, SemanticVersion::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = SemanticVersion::new(1, 2, 3).bump(BumpKind::Minor).unwrap();
        assert_eq!(bumped, SemanticVersion::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = SemanticVersion::new(1, 2, 3).bump(BumpKind::Patch).unwrap();
        assert_eq!(bumped, SemanticVersion::new(1, 2, 4));
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(SemanticVersion::new(1, 1, 0).tag_name(), "v1.1.0");
    }

    #[test]
    fn test_bump_request_exclusive() {
        assert!(matches!(
            BumpRequest::from_parts(None, None),
            Err(ReleaseError::InvalidBumpRequest(_))
        ));
        assert!(matches!(
            BumpRequest::from_parts(Some(BumpKind::Patch), Some("1.0.0")),
            Err(ReleaseError::InvalidBumpRequest(_))
        ));
        assert_eq!(
            BumpRequest::from_parts(Some(BumpKind::Minor), None).unwrap(),
            BumpRequest::Kind(BumpKind::Minor)
        );
    }

    #[test]
    fn test_bump_request_validates_explicit_version() {
        assert!(matches!(
            BumpRequest::from_parts(None, Some("1.5")),
            Err(ReleaseError::InvalidVersionFormat(_))
        ));
    }

    #[test]
    fn test_explicit_request_ignores_unparsable_current() {
        let request = BumpRequest::from_parts(None, Some("1.5.0")).unwrap();
        assert_eq!(request.resolve("dev").unwrap().to_string(), "1.5.0");
    }

    #[test]
    fn test_kind_request_requires_parsable_current() {
        let request = BumpRequest::Kind(BumpKind::Patch);
        assert!(request.resolve("dev").is_err());
    }

    #[test]
    fn test_bump_at_component_limit_overflows() {
        let v = SemanticVersion::parse("18446744073709551615.0.0").unwrap();
        assert!(matches!(
            v.bump(BumpKind::Major),
            Err(ReleaseError::VersionOverflow {
                kind: BumpKind::Major,
                ..
            })
        ));
        assert_eq!(
            v.bump(BumpKind::Minor).unwrap().to_string(),
            "18446744073709551615.1.0"
        );

        let v = SemanticVersion::new(1, u64::MAX, u64::MAX);
        assert!(v.bump(BumpKind::Minor).is_err());
        assert!(v.bump(BumpKind::Patch).is_err());
        assert_eq!(v.bump(BumpKind::Major).unwrap(), SemanticVersion::new(2, 0, 0));
    }

    #[test]
    fn test_resolve_propagates_overflow() {
        let request = BumpRequest::Kind(BumpKind::Patch);
        assert!(matches!(
            request.resolve("1.0.18446744073709551615"),
            Err(ReleaseError::VersionOverflow { .. })
        ));
    }
}
