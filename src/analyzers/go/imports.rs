use crate::core::ast::{ImportName, SourceFile};
use crate::lint::resolver::{NameRef, SymbolResolver};
use std::collections::{HashMap, HashSet};

/// Exports of the standard packages whose names the analyzer asks about.
/// Any package missing from this table is assumed to export every name.
const KNOWN_EXPORTS: &[(&str, &[&str])] = &[
    (
        "os",
        &[
            "Args", "Chdir", "Chmod", "Chown", "Chtimes", "Clearenv", "CopyFS", "Create",
            "CreateTemp", "DevNull", "DirEntry", "DirFS", "Environ", "ErrClosed", "ErrExist",
            "ErrNotExist", "ErrPermission", "Executable", "Exit", "Expand", "ExpandEnv", "File",
            "FileInfo", "FileMode", "Getenv", "Getpid", "Getwd", "Hostname", "LookupEnv",
            "Lstat", "Mkdir", "MkdirAll", "MkdirTemp", "NewFile", "Open", "OpenFile",
            "PathError", "Process", "ReadDir", "ReadFile", "Readlink", "Remove", "RemoveAll",
            "Rename", "Root", "Setenv", "Signal", "Stat", "Stderr", "Stdin", "Stdout",
            "Symlink", "TempDir", "Truncate", "Unsetenv", "UserCacheDir", "UserConfigDir",
            "UserHomeDir", "WriteFile",
        ],
    ),
    (
        "context",
        &[
            "AfterFunc", "Background", "CancelCauseFunc", "CancelFunc", "Canceled", "Cause",
            "Context", "DeadlineExceeded", "TODO", "WithCancel", "WithCancelCause",
            "WithDeadline", "WithDeadlineCause", "WithTimeout", "WithTimeoutCause", "WithValue",
            "WithoutCancel",
        ],
    ),
    (
        "testing",
        &[
            "AllocsPerRun", "B", "Benchmark", "BenchmarkResult", "Cover", "CoverBlock",
            "CoverMode", "Coverage", "F", "Init", "InternalBenchmark", "InternalExample",
            "InternalFuzzTarget", "InternalTest", "M", "Main", "MainStart", "PB",
            "RegisterCover", "RunBenchmarks", "RunExamples", "RunTests", "Short", "T", "TB",
            "Testing", "Verbose",
        ],
    ),
];

/// Resolves names through one file's import table.
///
/// Qualified references go through the file's named and default imports.
/// Bare references resolve only through dot imports, and only when the name
/// is not declared anywhere in the package and exactly one dot-imported
/// package can export it.
#[derive(Debug)]
pub struct ImportResolver<'a> {
    qualifiers: HashMap<&'a str, &'a str>,
    dot_imports: Vec<&'a str>,
    declared: &'a HashSet<String>,
}

impl<'a> ImportResolver<'a> {
    /// `declared` holds the names bound anywhere in the file's package.
    pub fn new(file: &'a SourceFile, declared: &'a HashSet<String>) -> Self {
        let mut qualifiers = HashMap::new();
        let mut dot_imports = Vec::new();

        for import in &file.imports {
            let path = import.path.as_str();
            match &import.name {
                ImportName::Default => {
                    qualifiers.insert(default_package_name(path), path);
                }
                ImportName::Alias(alias) => {
                    qualifiers.insert(alias.as_str(), path);
                }
                ImportName::Dot => dot_imports.push(path),
                ImportName::Blank => {}
            }
        }

        Self {
            qualifiers,
            dot_imports,
            declared,
        }
    }

    fn resolve_bare(&self, name: &str) -> Option<&'a str> {
        if self.declared.contains(name) {
            return None;
        }

        let mut candidates = self
            .dot_imports
            .iter()
            .copied()
            .filter(|path| may_export(path, name));
        match (candidates.next(), candidates.next()) {
            (Some(path), None) => Some(path),
            _ => None,
        }
    }
}

impl SymbolResolver for ImportResolver<'_> {
    fn origin_module(&self, reference: NameRef<'_>) -> Option<&str> {
        match reference {
            NameRef::Qualified { qualifier, .. } => {
                self.qualifiers.get(qualifier.name.as_str()).copied()
            }
            NameRef::Bare(ident) => self.resolve_bare(&ident.name),
        }
    }
}

fn may_export(path: &str, name: &str) -> bool {
    KNOWN_EXPORTS
        .iter()
        .find(|(known, _)| *known == path)
        .map_or(true, |(_, exports)| exports.contains(&name))
}

/// The name an import is bound to when it has no alias: the last path
/// element, skipping a `/vN` major-version suffix, with a `go-` prefix and
/// anything after the first non-identifier character removed.
pub fn default_package_name(path: &str) -> &str {
    let mut elements = path.rsplit('/');
    let last = elements.next().unwrap_or(path);
    let base = if is_major_version(last) {
        elements.next().unwrap_or(last)
    } else {
        last
    };

    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(base.len());
    &base[..end]
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
