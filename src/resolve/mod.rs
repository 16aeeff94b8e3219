//! Right-hand side resolution.
//!
//! A run joins against exactly one of:
//! - `RightIndex`: a file loaded into memory before streaming starts
//! - `ExecOracle`: an external command run once per streaming key

mod exec;
mod index;

pub use exec::{DEFAULT_SHELL, ExecOracle, KEY_PLACEHOLDER};
pub use index::{IndexEntry, RightIndex};

use crate::error::ExecError;
use crate::result::RightMatch;

/// The configured right-hand side of a run.
#[derive(Debug)]
pub enum Resolver {
    Index(RightIndex),
    Exec(ExecOracle),
}

impl Resolver {
    /// Resolve `key` against the right-hand side.
    ///
    /// `Ok(None)` means the index has no row for the key. An exec oracle
    /// always produces an outcome.
    pub fn resolve(&self, key: &str) -> Result<Option<RightMatch>, ExecError> {
        match self {
            Resolver::Index(index) => Ok(index.lookup(key)),
            Resolver::Exec(oracle) => oracle.run(key).map(Some),
        }
    }

    pub fn index(&self) -> Option<&RightIndex> {
        match self {
            Resolver::Index(index) => Some(index),
            Resolver::Exec(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolver::Index(_) => "index",
            Resolver::Exec(_) => "exec",
        }
    }
}
