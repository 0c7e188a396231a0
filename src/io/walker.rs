use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The `.go` files of one directory.
///
/// A directory can hold a package and its external `_test` package; the
/// caller splits them by package clause after parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoPackage {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

pub struct PackageWalker {
    roots: Vec<PathBuf>,
    tests_only: bool,
    ignore_patterns: Vec<String>,
}

impl PackageWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            tests_only: false,
            ignore_patterns: vec![],
        }
    }

    /// Only collect `_test.go` files.
    pub fn with_tests_only(mut self, tests_only: bool) -> Self {
        self.tests_only = tests_only;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<GoPackage>> {
        let patterns = self
            .ignore_patterns
            .iter()
            .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;

        let mut packages: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for root in &self.roots {
            for file in self.walk_root(root)? {
                if self.should_process(&file, &patterns) {
                    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
                    packages.entry(dir).or_default().push(file);
                }
            }
        }

        Ok(packages
            .into_iter()
            .map(|(dir, mut files)| {
                files.sort();
                files.dedup();
                GoPackage { dir, files }
            })
            .collect())
    }

    fn walk_root(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }
        if !root.is_dir() {
            anyhow::bail!("Path not found: {}", root.display());
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_some_and(|ft| ft.is_dir())
                    || !is_skipped_dir(&entry.file_name().to_string_lossy())
            })
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn should_process(&self, path: &Path, patterns: &[glob::Pattern]) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if !name.ends_with(".go") {
            return false;
        }
        if self.tests_only && !name.ends_with("_test.go") {
            return false;
        }

        let path_str = path.to_string_lossy();
        !patterns.iter().any(|p| p.matches(&path_str))
    }
}

/// Directories the go tool never treats as part of a package tree.
fn is_skipped_dir(name: &str) -> bool {
    name == "vendor" || name == "testdata" || name.starts_with('.') || name.starts_with('_')
}

pub fn find_packages(root: &Path) -> Result<Vec<GoPackage>> {
    PackageWalker::new(vec![root.to_path_buf()]).walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    #[test]
    fn test_groups_files_by_directory() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/a.go");
        touch(temp.path(), "a/a_test.go");
        touch(temp.path(), "b/b_test.go");
        touch(temp.path(), "b/notes.txt");

        let packages = find_packages(temp.path()).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].dir, temp.path().join("a"));
        assert_eq!(packages[0].files.len(), 2);
        assert_eq!(packages[1].files, vec![temp.path().join("b/b_test.go")]);
    }

    #[test]
    fn test_skips_vendor_testdata_and_hidden() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "keep/k_test.go");
        touch(temp.path(), "vendor/v/v_test.go");
        touch(temp.path(), "keep/testdata/t_test.go");
        touch(temp.path(), ".cache/c_test.go");
        touch(temp.path(), "_old/o_test.go");

        let packages = find_packages(temp.path()).unwrap();
        let dirs: Vec<_> = packages.iter().map(|p| p.dir.clone()).collect();
        assert_eq!(dirs, vec![temp.path().join("keep")]);
    }

    #[test]
    fn test_tests_only_and_excludes() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "p/p.go");
        touch(temp.path(), "p/p_test.go");
        touch(temp.path(), "gen/g_test.go");

        let packages = PackageWalker::new(vec![temp.path().to_path_buf()])
            .with_tests_only(true)
            .with_ignore_patterns(vec!["*/gen/*".to_string()])
            .walk()
            .unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].files, vec![temp.path().join("p/p_test.go")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(find_packages(&temp.path().join("missing")).is_err());
    }
}
