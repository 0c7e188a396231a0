mod core;
mod loader;

// Re-export core types
pub use self::core::{AnalyzerConfig, IgnoreConfig, UseTestingConfig};

pub use self::loader::{
    directory_ancestors, discover_config, load_config_file, parse_config, CONFIG_FILE_NAME,
};
