// Test utility module for usetesting integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use usetesting::analyzers::{analyze_package, GoParser, ParsedFile};
use usetesting::config::AnalyzerConfig;
use usetesting::core::Diagnostic;
use usetesting::lint::{UnitVersion, UseTestingAnalyzer};

/// Parse one Go source as `x_test.go`.
pub fn parse(source: &str) -> ParsedFile {
    parse_named("x_test.go", source)
}

pub fn parse_named(name: &str, source: &str) -> ParsedFile {
    GoParser::new()
        .expect("Go grammar loads")
        .parse(source, Path::new(name))
        .unwrap_or_else(|e| panic!("fixture {name} does not parse: {e:#}"))
}

/// Analyze a single-file package with every rule enabled and the newest Go.
pub fn analyze(source: &str) -> Vec<Diagnostic> {
    analyze_with(source, AnalyzerConfig::all_enabled(), UnitVersion::Devel)
}

pub fn analyze_with(source: &str, config: AnalyzerConfig, version: UnitVersion) -> Vec<Diagnostic> {
    let analyzer = UseTestingAnalyzer::new(config);
    analyze_package(&analyzer, &[parse(source)], version)
}

/// `(line, message)` pairs, the shape most assertions compare against.
pub fn findings(diagnostics: &[Diagnostic]) -> Vec<(usize, String)> {
    diagnostics
        .iter()
        .map(|d| (d.pos.line, d.message.clone()))
        .collect()
}

pub fn lines(diagnostics: &[Diagnostic]) -> Vec<usize> {
    diagnostics.iter().map(|d| d.pos.line).collect()
}

// Binary execution result for tests that need to verify CLI behavior
#[derive(Debug)]
pub struct BinaryResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub fn run_binary(args: &[&str], cwd: &Path) -> BinaryResult {
    let output = Command::new(env!("CARGO_BIN_EXE_usetesting"))
        .args(args)
        .current_dir(cwd)
        .env_remove("USETESTING_SKIP_GO_VERSION_CHECK")
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run usetesting binary");

    BinaryResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

/// Write `files` (relative path, contents) under a fresh temporary directory.
pub fn create_module(files: &[(&str, &str)]) -> tempfile::TempDir {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    for (relative, contents) in files {
        let path: PathBuf = temp_dir.path().join(relative);
        std::fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create package dir");
        std::fs::write(&path, contents).expect("Failed to write test file");
    }
    temp_dir
}
