pub mod go;

pub use go::{GoParser, ImportResolver, ParsedFile};

use crate::core::Diagnostic;
use crate::lint::{UnitVersion, UseTestingAnalyzer};
use std::collections::HashSet;

/// Analyze the parsed files of one Go package.
///
/// Imports are file-scoped, so each file gets its own resolver, while
/// declared names are pooled across the package. The version gate is
/// resolved once for the whole package.
pub fn analyze_package(
    analyzer: &UseTestingAnalyzer,
    files: &[ParsedFile],
    version: UnitVersion,
) -> Vec<Diagnostic> {
    let rules = analyzer.rules_for(version);
    if rules.is_empty() {
        return Vec::new();
    }

    let declared: HashSet<String> = files
        .iter()
        .flat_map(|file| file.declared.iter().cloned())
        .collect();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for file in files {
        let resolver = ImportResolver::new(&file.ast, &declared);
        analyzer.check_file(&rules, &file.ast, &resolver, &mut diagnostics);
    }
    diagnostics
}
