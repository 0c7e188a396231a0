use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "usetesting")]
#[command(
    about = "Reports calls in Go tests that the testing package can do for you",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze Go packages
    Check {
        /// Files or directories to analyze (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest .usetesting.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Set a rule flag, e.g. --set ossetenv=true (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Apply Go 1.24 rules regardless of the module's go directive
        #[arg(long = "skip-go-version-check", env = "USETESTING_SKIP_GO_VERSION_CHECK")]
        skip_go_version_check: bool,

        /// Go version to assume for every package instead of reading go.mod
        #[arg(long = "go-version", value_name = "X.Y")]
        go_version: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only analyze _test.go files
        #[arg(long = "tests-only")]
        tests_only: bool,

        /// Glob of paths to skip (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// List rules and whether they are enabled
    Rules {
        /// Configuration file (defaults to the nearest .usetesting.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Set a rule flag, e.g. --set ossetenv=true (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Check { verbosity, .. } => *verbosity,
            _ => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

/// Rayon worker stack size (8MB for deeply nested Go syntax trees)
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Configure the rayon global thread pool once at startup
pub fn configure_thread_pool() {
    let builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);
    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {e}");
    }
}
