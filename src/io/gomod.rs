//! Per-package Go version from the enclosing module's `go.mod`.

use crate::config::directory_ancestors;
use crate::lint::{GoVersion, UnitVersion};
use std::fs;
use std::path::{Path, PathBuf};

pub const GO_MOD: &str = "go.mod";

/// Nearest `go.mod` at or above `dir`.
pub fn find_go_mod(dir: &Path) -> Option<PathBuf> {
    // Relative paths such as `.` have no ancestors of their own.
    let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    directory_ancestors(start, usize::MAX)
        .map(|dir| dir.join(GO_MOD))
        .find(|candidate| candidate.is_file())
}

/// The argument of the `go` directive, if any.
pub fn parse_go_directive(contents: &str) -> Option<&str> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or(line).trim();
        let version = line.strip_prefix("go")?;
        // `go` must be a whole word: `godebug` and `golang.org/...` are not directives.
        if !version.starts_with(char::is_whitespace) {
            return None;
        }
        Some(version.trim())
    })
}

/// Version declared for the package in `dir`.
///
/// A package outside any module has an empty version, i.e. the newest
/// release. A `go.mod` without a `go` directive targets the oldest
/// module-aware release; an unreadable one leaves the version unknown.
pub fn unit_version(dir: &Path) -> UnitVersion {
    let Some(path) = find_go_mod(dir) else {
        tracing::debug!(dir = %dir.display(), "no go.mod found");
        return UnitVersion::Devel;
    };

    match fs::read_to_string(&path) {
        Ok(contents) => match parse_go_directive(&contents) {
            Some(version) => UnitVersion::from_declared(version),
            None => UnitVersion::Declared(GoVersion::FALLBACK),
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read go.mod");
            UnitVersion::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_go_directive() {
        let contents = indoc! {"
            module example.com/m

            // go 1.10 in a comment is ignored
            godebug default=go1.21
            go 1.24.1 // toolchain pinned separately
            toolchain go1.25.0
        "};
        assert_eq!(parse_go_directive(contents), Some("1.24.1"));
        assert_eq!(parse_go_directive("module m\n"), None);
    }

    #[test]
    fn test_unit_version_from_nearest_module() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GO_MOD), "module m\n\ngo 1.22\n").unwrap();
        let pkg = temp.path().join("internal").join("pkg");
        fs::create_dir_all(&pkg).unwrap();

        assert_eq!(
            unit_version(&pkg),
            UnitVersion::Declared(GoVersion::new(1, 22))
        );

        fs::write(pkg.join(GO_MOD), "module m/pkg\n").unwrap();
        assert_eq!(unit_version(&pkg), UnitVersion::Declared(GoVersion::FALLBACK));
    }

    #[test]
    fn test_unit_version_without_module_is_devel() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("src").join("p");
        fs::create_dir_all(&pkg).unwrap();

        assert_eq!(unit_version(&pkg), UnitVersion::Devel);
    }

    #[test]
    fn test_find_go_mod_from_relative_dir() {
        let cwd = std::env::current_dir().unwrap();
        let found = find_go_mod(Path::new("."));
        assert_eq!(
            found.is_some(),
            cwd.ancestors().any(|dir| dir.join(GO_MOD).is_file())
        );
    }
}
