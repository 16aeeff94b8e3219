//! Validated run options.

use crate::error::{ConfigError, ErrorPolicy};
use crate::extract::KeyRules;
use crate::result::JoinType;
use crate::stream::DEFAULT_CHUNK_SIZE;

/// Default number of join workers.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default capacity of the line-batch queue, in batches.
pub const DEFAULT_BUFFER_SIZE: usize = 5000;

/// Everything a `Joiner` needs besides its right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOptions {
    /// The join semantics applied to every result
    pub join_type: JoinType,
    /// Number of worker threads
    pub concurrency: usize,
    /// Capacity of the bounded queue between the reader and the workers
    pub buffer_size: usize,
    /// Bytes requested from the input per read
    pub chunk_size: usize,
    /// What a per-line failure does to the run
    pub error_policy: ErrorPolicy,
    /// Report suppressed rows on the diagnostics channel
    pub verbose: bool,
    /// Key rules for the streaming side
    pub left: KeyRules,
    /// Key rules for the index file
    pub right: KeyRules,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            join_type: JoinType::default(),
            concurrency: DEFAULT_CONCURRENCY,
            buffer_size: DEFAULT_BUFFER_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_policy: ErrorPolicy::default(),
            verbose: false,
            left: KeyRules::whole_row(),
            right: KeyRules::whole_row(),
        }
    }
}

impl JoinOptions {
    /// Check the options are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Zero("concurrency"));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::Zero("buffer size"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Zero("chunk size"));
        }
        self.left.validate()?;
        self.right.validate()
    }
}
