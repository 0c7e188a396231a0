//! Detection of calls that duplicate helpers of Go's `testing` handles.
//!
//! Within functions whose first parameter is a test handle (`*testing.T`,
//! `*testing.B`, `*testing.F` or `testing.TB`), reports:
//!
//! - `os.MkdirTemp()` and `os.TempDir()` → `t.TempDir()`
//! - `os.CreateTemp("", ...)` → `os.CreateTemp(t.TempDir(), ...)`
//! - `os.Setenv()` → `t.Setenv()`
//! - `os.Chdir()` → `t.Chdir()` (Go 1.24+)
//! - `context.Background()` and `context.TODO()` → `t.Context()` (Go 1.24+)
//!
//! # Example
//!
//! ```rust
//! use usetesting::config::AnalyzerConfig;
//! use usetesting::core::ast::SourceFile;
//! use usetesting::lint::{StaticResolver, UnitVersion, UseTestingAnalyzer};
//!
//! let analyzer = UseTestingAnalyzer::new(AnalyzerConfig::default());
//! let rules = analyzer.rules_for(UnitVersion::Devel);
//! let resolver = StaticResolver::with_modules(["os", "testing"]);
//!
//! let mut diagnostics: Vec<usetesting::core::Diagnostic> = Vec::new();
//! analyzer.check_file(&rules, &SourceFile::default(), &resolver, &mut diagnostics);
//! assert!(diagnostics.is_empty());
//! ```

pub mod eligibility;
pub mod matcher;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod traversal;
pub mod version;

pub use eligibility::FunctionContext;
pub use report::DiagnosticSink;
pub use resolver::{NameRef, StaticResolver, SymbolResolver};
pub use rules::{Rule, RuleId, RuleSet, RULES};
pub use version::{GoVersion, ResolvedVersion, UnitVersion};

use crate::config::AnalyzerConfig;
use crate::core::ast::SourceFile;
use crate::core::Diagnostic;
use matcher::Matcher;
use traversal::Walker;

#[derive(Clone, Debug, Default)]
pub struct UseTestingAnalyzer {
    config: AnalyzerConfig,
}

impl UseTestingAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// False when every rule is disabled; callers can skip parsing entirely.
    pub fn is_active(&self) -> bool {
        self.config.any_enabled()
    }

    /// Resolve the unit's version once and keep the rules that can fire in it.
    pub fn rules_for(&self, version: UnitVersion) -> RuleSet {
        let resolved = ResolvedVersion::resolve(version, self.config.skip_go_version_detection);
        let rules = RuleSet::active(|id| self.config.is_enabled(id), resolved);

        tracing::debug!(?version, ?resolved, active = rules.ids().count(), "rules resolved");
        rules
    }

    /// Walk one file of a unit, reporting into `sink`.
    pub fn check_file(
        &self,
        rules: &RuleSet,
        file: &SourceFile,
        resolver: &dyn SymbolResolver,
        sink: &mut dyn DiagnosticSink,
    ) {
        if rules.is_empty() {
            return;
        }

        let _span = tracing::debug_span!("check_file", file = %file.path.display()).entered();
        let matcher = Matcher::new(rules, resolver);
        Walker::new(matcher, resolver, &file.path, sink).walk_file(file);
    }

    /// Analyze a whole unit whose files share one resolver.
    pub fn analyze_unit(
        &self,
        files: &[SourceFile],
        version: UnitVersion,
        resolver: &dyn SymbolResolver,
    ) -> Vec<Diagnostic> {
        let rules = self.rules_for(version);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        for file in files {
            self.check_file(&rules, file, resolver, &mut diagnostics);
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_when_all_rules_disabled() {
        let config = RuleId::ALL
            .into_iter()
            .fold(AnalyzerConfig::default(), |c, id| c.with_rule(id, false));
        let analyzer = UseTestingAnalyzer::new(config);

        assert!(!analyzer.is_active());
        assert!(analyzer.rules_for(UnitVersion::Devel).is_empty());
    }

    #[test]
    fn test_skip_detection_enables_gated_rules() {
        let config = AnalyzerConfig {
            skip_go_version_detection: true,
            ..AnalyzerConfig::all_enabled()
        };
        let rules = UseTestingAnalyzer::new(config).rules_for(UnitVersion::Unsupported);
        assert_eq!(rules.ids().count(), RuleId::ALL.len());

        let strict = UseTestingAnalyzer::new(AnalyzerConfig::all_enabled())
            .rules_for(UnitVersion::Unsupported);
        assert!(!strict.ids().any(|id| id == RuleId::OsChdir));
    }
}
