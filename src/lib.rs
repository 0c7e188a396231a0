//! Finds calls in Go tests that duplicate helpers of the `testing` package.
//!
//! The [`lint`] module holds the language-level engine: it walks a
//! [`core::ast::SourceFile`] and asks an injected [`lint::SymbolResolver`]
//! where names come from. [`analyzers::go`] is the host that produces those
//! trees from Go source with tree-sitter and resolves names through imports.

// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod lint;

// Re-export commonly used types
pub use crate::core::{Diagnostic, Error, Pos, Result};

pub use crate::analyzers::{analyze_package, GoParser, ImportResolver, ParsedFile};

pub use crate::config::{AnalyzerConfig, UseTestingConfig};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::lint::{
    DiagnosticSink, GoVersion, RuleId, StaticResolver, SymbolResolver, UnitVersion,
    UseTestingAnalyzer,
};
