pub mod ast;
pub mod errors;

use serde::Serialize;
use std::path::PathBuf;

pub use ast::Pos;
pub use errors::{Error, Result};

use crate::lint::rules::RuleId;

/// One finding handed to the reporting channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub pos: Pos,
    pub rule: RuleId,
    /// Name of the function the occurrence was found in.
    pub function: String,
    pub message: String,
}

impl Diagnostic {
    /// Ordering key used to make output deterministic across parallel runs.
    pub fn sort_key(&self) -> (&PathBuf, Pos) {
        (&self.file, self.pos)
    }
}
