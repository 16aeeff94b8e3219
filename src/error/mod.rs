//! Error types and policies for join runs.
//!
//! This module provides:
//! - `ErrorPolicy`: Controls whether a per-line failure stops the run
//! - `Stage`: Indicates where in the pipeline an error occurred
//! - `SingleJoinError`: A single per-line error with the offending row
//! - `ConfigError`, `ExtractError`, `IndexError`, `ExecError`: typed failures
//! - `JoinError`: The error returned from a whole run

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first per-line error encountered
    #[default]
    FastFail,
    /// Report per-line errors on the diagnostics channel and keep going
    Continue,
}

impl ErrorPolicy {
    /// Parse a policy from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fast_fail" | "fastfail" | "fail_fast" => Some(ErrorPolicy::FastFail),
            "continue" | "continue_on_error" => Some(ErrorPolicy::Continue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Extracting a join key from a left-hand row
    Extract,
    /// Looking up or executing the right-hand side
    Resolve,
    /// Writing an emitted result
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "Extract"),
            Stage::Resolve => write!(f, "Resolve"),
            Stage::Emit => write!(f, "Emit"),
        }
    }
}

/// A failure while processing one line of the stream.
#[derive(Debug)]
pub struct SingleJoinError {
    /// Stage where the error occurred
    pub stage: Stage,
    /// The row being processed when it happened
    pub row: String,
    /// The underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl SingleJoinError {
    pub fn new(
        stage: Stage,
        row: impl Into<String>,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            stage,
            row: row.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for SingleJoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (row: {:?})", self.stage, self.error, self.row)
    }
}

impl std::error::Error for SingleJoinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

/// Invalid configuration, detected before any input is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no right-hand side configured: set either an index file or an exec template")]
    NoResolver,

    #[error("both an index file and an exec template are configured, only one may be used")]
    BothResolvers,

    #[error("could not read right join file {path}: {source}")]
    IndexUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is a directory, not a valid file to join on")]
    IndexIsDirectory { path: PathBuf },

    #[error("invalid JSON sub-query {path:?}: {reason}")]
    InvalidJsonPath { path: String, reason: String },

    #[error("not a valid join {0:?}, options are: 'inner', 'left', 'disjoint'")]
    InvalidJoinType(String),

    #[error("not a valid error policy {0:?}, options are: 'fast_fail', 'continue'")]
    InvalidErrorPolicy(String),

    #[error("a join column is set but no separator was given")]
    MissingSeparator,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("could not parse config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },
}

/// A row that could not be reduced to a join key.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(
        "couldn't split row with separator {separator:?} and get column {requested}, \
         only {found} columns found (zero-based index). Row contents: {row}"
    )]
    ColumnOutOfRange {
        requested: usize,
        found: usize,
        separator: String,
        row: String,
    },

    #[error("found unmatched quote, something is wrong with the line: {row}")]
    UnmatchedQuote { row: String },

    #[error("failure to deserialize JSON, {source}. Data {data}")]
    InvalidJson {
        data: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "JSON sub-query {path:?} did not return a primitive type, this can't be joined on. Got: {value}"
    )]
    NonScalar { path: String, value: String },
}

/// The external command of an exec join could not be run at all.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// The right-hand index could not be built.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index: {0}")]
    Io(#[from] std::io::Error),

    #[error("index line {line} could not be keyed: {source}")]
    Extract {
        line: usize,
        #[source]
        source: ExtractError,
    },
}

/// Error returned from building or running a join.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build right-hand index: {0}")]
    Index(#[from] IndexError),

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("join aborted: {0}")]
    Aborted(SingleJoinError),

    #[error("a join worker panicked")]
    WorkerPanicked,
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
