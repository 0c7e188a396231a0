use crate::analyzers::{analyze_package, GoParser, ParsedFile};
use crate::config::{discover_config, load_config_file, UseTestingConfig};
use crate::core::errors::Error;
use crate::core::Diagnostic;
use crate::io::{self, GoPackage, OutputFormat, PackageWalker};
use crate::lint::{GoVersion, UnitVersion, UseTestingAnalyzer};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub struct CheckConfig {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    /// `name=value` flag assignments applied over the config file.
    pub set: Vec<String>,
    pub skip_go_version_check: bool,
    pub go_version: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub tests_only: bool,
    pub exclude: Vec<String>,
}

/// Run the analyzer over every package under `config.paths` and write the
/// findings. Returns the number of diagnostics reported.
pub fn handle_check(config: CheckConfig) -> Result<usize> {
    let paths = if config.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        config.paths.clone()
    };

    let file_config = load_config(config.config.as_deref(), &paths)?;
    let mut rules = file_config.rules;
    rules.apply_assignments(config.set.iter().map(String::as_str))?;
    if config.skip_go_version_check {
        rules.skip_go_version_detection = true;
    }
    let version_override = config
        .go_version
        .as_deref()
        .map(parse_go_version_override)
        .transpose()?;

    let analyzer = UseTestingAnalyzer::new(rules);
    let diagnostics = if analyzer.is_active() {
        let mut exclude = file_config.ignore.patterns;
        exclude.extend(config.exclude.iter().cloned());

        let packages = PackageWalker::new(paths)
            .with_tests_only(config.tests_only)
            .with_ignore_patterns(exclude)
            .walk()?;
        log::info!("Analyzing {} Go package directories", packages.len());

        check_packages(&analyzer, &packages, version_override)?
    } else {
        log::info!("Every rule is disabled; nothing to analyze");
        Vec::new()
    };

    let destination = io::open_destination(config.output.as_deref())?;
    let mut writer = io::create_writer(config.format, destination);
    writer.write_diagnostics(&diagnostics)?;

    Ok(diagnostics.len())
}

fn load_config(explicit: Option<&Path>, paths: &[PathBuf]) -> Result<UseTestingConfig> {
    match explicit {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(paths
            .first()
            .map(|start| discover_config(start))
            .unwrap_or_default()),
    }
}

/// `--go-version` is user input, so unlike a `go.mod` directive a value that
/// does not parse is an error.
pub fn parse_go_version_override(raw: &str) -> Result<UnitVersion> {
    let version = GoVersion::parse(raw)
        .ok_or_else(|| Error::Config(format!("invalid Go version {raw:?}, expected e.g. 1.24")))?;
    Ok(UnitVersion::Declared(version))
}

pub fn check_packages(
    analyzer: &UseTestingAnalyzer,
    packages: &[GoPackage],
    version_override: Option<UnitVersion>,
) -> Result<Vec<Diagnostic>> {
    let per_package = packages
        .par_iter()
        .map(|package| check_package(analyzer, package, version_override))
        .collect::<Result<Vec<_>>>()?;

    let mut diagnostics: Vec<Diagnostic> = per_package.into_iter().flatten().collect();
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(diagnostics)
}

fn check_package(
    analyzer: &UseTestingAnalyzer,
    package: &GoPackage,
    version_override: Option<UnitVersion>,
) -> Result<Vec<Diagnostic>> {
    let _span = tracing::debug_span!("package", dir = %package.dir.display()).entered();
    let version = version_override.unwrap_or_else(|| io::unit_version(&package.dir));

    let mut parser = GoParser::new()?;
    // A directory may hold both `p` and its external test package `p_test`.
    let mut units: BTreeMap<String, Vec<ParsedFile>> = BTreeMap::new();
    for path in &package.files {
        match parser.parse_file(path) {
            Ok(parsed) => units
                .entry(parsed.ast.package.clone())
                .or_default()
                .push(parsed),
            Err(e) => tracing::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    Ok(units
        .values()
        .flat_map(|files| analyze_package(analyzer, files, version))
        .collect())
}
