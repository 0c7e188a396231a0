use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use usetesting::cli::{self, Cli, Commands};
use usetesting::commands::{self, CheckConfig};
use usetesting::config::{discover_config, load_config_file};

// Diagnostics found
const EXIT_FINDINGS: u8 = 1;
// Configuration or I/O failure
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    init_tracing(cli.command.verbosity());
    cli::configure_thread_pool();

    match run(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FINDINGS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default `warn` level.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Main orchestrator function; returns the number of diagnostics reported
fn run(cli: Cli) -> Result<usize> {
    match cli.command {
        Commands::Check {
            paths,
            config,
            set,
            skip_go_version_check,
            go_version,
            format,
            output,
            tests_only,
            exclude,
            verbosity: _,
        } => commands::handle_check(CheckConfig {
            paths,
            config,
            set,
            skip_go_version_check,
            go_version,
            format: format.into(),
            output,
            tests_only,
            exclude,
        }),
        Commands::Rules { config, set } => {
            let mut rules = match config {
                Some(path) => load_config_file(&path)?,
                None => discover_config(&std::env::current_dir()?),
            }
            .rules;
            rules.apply_assignments(set.iter().map(String::as_str))?;
            commands::write_rules(&mut std::io::stdout().lock(), &rules)?;
            Ok(0)
        }
        Commands::Init { force } => {
            commands::init_config(&std::env::current_dir()?, force)?;
            Ok(0)
        }
    }
}
