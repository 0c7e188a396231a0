//! Go toolchain version handling for version-gated rules.
//!
//! A compilation unit declares the minimum Go version it targets (the `go`
//! directive of its module). Rules whose replacement API appeared in a later
//! release only fire when that declared version is recent enough.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoVersion {
    pub major: u32,
    pub minor: u32,
}

impl GoVersion {
    /// `testing.T.Chdir` and `testing.T.Context` were added in Go 1.24.
    pub const GO1_24: GoVersion = GoVersion::new(1, 24);

    /// Version assumed for strings that do not parse and for modules without
    /// a `go` directive.
    pub const FALLBACK: GoVersion = GoVersion::new(1, 16);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `go1.24`, `1.24` or `1.24.3`. Only major and minor are kept;
    /// a pre-release minor such as `24rc1` does not parse.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("go").unwrap_or(trimmed);
        let mut parts = trimmed.split('.');

        let major = number(parts.next()?)?;
        let minor = match parts.next() {
            Some(part) => number(part)?,
            None => 0,
        };

        Some(Self::new(major, minor))
    }

    pub fn parse_or_fallback(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Self::FALLBACK)
    }
}

fn number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What the host knows about a unit's declared Go version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitVersion {
    /// The host cannot report per-unit versions.
    Unsupported,
    /// Empty version string: a development toolchain, newer than any release.
    Devel,
    Declared(GoVersion),
}

impl UnitVersion {
    /// Interpret a declared version string as reported by the host.
    pub fn from_declared(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Devel
        } else {
            Self::Declared(GoVersion::parse_or_fallback(raw))
        }
    }
}

/// The unit's effective version, computed once before traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedVersion {
    /// Every gate passes.
    Newest,
    At(GoVersion),
    /// Every gate fails.
    Unknown,
}

impl ResolvedVersion {
    pub fn resolve(unit: UnitVersion, skip_detection: bool) -> Self {
        if skip_detection {
            return Self::Newest;
        }

        match unit {
            UnitVersion::Unsupported => Self::Unknown,
            UnitVersion::Devel => Self::Newest,
            UnitVersion::Declared(version) => Self::At(version),
        }
    }

    pub fn satisfies(&self, minimum: GoVersion) -> bool {
        match self {
            Self::Newest => true,
            Self::At(version) => *version >= minimum,
            Self::Unknown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_forms() {
        assert_eq!(GoVersion::parse("go1.24"), Some(GoVersion::new(1, 24)));
        assert_eq!(GoVersion::parse("1.22"), Some(GoVersion::new(1, 22)));
        assert_eq!(GoVersion::parse("1.23.4"), Some(GoVersion::new(1, 23)));
        assert_eq!(GoVersion::parse("go1.25rc1"), None);
        assert_eq!(GoVersion::parse("+1.24"), None);
        assert_eq!(GoVersion::parse("2"), Some(GoVersion::new(2, 0)));
        assert_eq!(GoVersion::parse("devel"), None);
        assert_eq!(GoVersion::parse(""), None);
    }

    #[test]
    fn test_minor_versions_compare_numerically() {
        assert!(GoVersion::new(1, 9) < GoVersion::GO1_24);
        assert!(GoVersion::new(1, 100) > GoVersion::GO1_24);
        assert!(GoVersion::new(2, 0) > GoVersion::GO1_24);
    }

    #[test]
    fn test_unit_version_from_declared() {
        assert_eq!(UnitVersion::from_declared(""), UnitVersion::Devel);
        assert_eq!(
            UnitVersion::from_declared("go1.24"),
            UnitVersion::Declared(GoVersion::GO1_24)
        );
        assert_eq!(
            UnitVersion::from_declared("garbage"),
            UnitVersion::Declared(GoVersion::FALLBACK)
        );
        assert_eq!(
            UnitVersion::from_declared("1.24rc1"),
            UnitVersion::Declared(GoVersion::FALLBACK)
        );
    }

    #[test]
    fn test_resolved_version_gates() {
        let go123 = ResolvedVersion::resolve(UnitVersion::Declared(GoVersion::new(1, 23)), false);
        assert!(!go123.satisfies(GoVersion::GO1_24));

        let go124 = ResolvedVersion::resolve(UnitVersion::Declared(GoVersion::GO1_24), false);
        assert!(go124.satisfies(GoVersion::GO1_24));

        let devel = ResolvedVersion::resolve(UnitVersion::Devel, false);
        assert!(devel.satisfies(GoVersion::GO1_24));

        let unknown = ResolvedVersion::resolve(UnitVersion::Unsupported, false);
        assert!(!unknown.satisfies(GoVersion::GO1_24));
    }

    #[test]
    fn test_skip_detection_always_passes() {
        for unit in [
            UnitVersion::Unsupported,
            UnitVersion::Devel,
            UnitVersion::Declared(GoVersion::new(1, 20)),
        ] {
            assert!(ResolvedVersion::resolve(unit, true).satisfies(GoVersion::GO1_24));
        }
    }
}
