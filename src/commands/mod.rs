//! CLI command implementations for usetesting.
//!
//! Available commands:
//! - **check**: Analyze Go packages and report replaceable calls in tests
//! - **rules**: List the rule table with each rule's effective state
//! - **init**: Write a default `.usetesting.toml`

pub mod check;
pub mod init;
pub mod rules;

pub use check::{handle_check, CheckConfig};
pub use init::init_config;
pub use rules::write_rules;
