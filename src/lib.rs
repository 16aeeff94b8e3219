//! # smalljoin
//!
//! A streaming record-join engine for line-oriented data.
//!
//! ## Overview
//!
//! smalljoin reads an unbounded stream of lines (the left side) and joins
//! each one against a right-hand side that is either:
//! - **an index file**, loaded into memory once before streaming starts, or
//! - **an external command**, run once per left key with `{}` replaced by
//!   the key.
//!
//! Keys are taken from the whole line, from a column (CSV aware when the
//! separator is a comma), and optionally from a JSON sub-query over either.
//! Sub-queries are a JMESPath subset of keys and indexes, see [`JsonPath`].
//! Results are written as one JSON object per line, filtered by the join
//! type:
//!
//! | join        | emitted when                                    |
//! |-------------|-------------------------------------------------|
//! | `inner`     | the right side matched                          |
//! | `left`      | always                                          |
//! | `disjoint`  | the right side did not match (or exited non-0)  |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smalljoin::{ErrorPolicy, JoinType, JoinerBuilder, KeyRules};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let joiner = JoinerBuilder::new(JoinType::Inner)
//!         .with_index_file("users.csv")
//!         .with_right_rules(KeyRules::column(",", 0))
//!         .with_left_rules(KeyRules::column(",", 4).with_json_path("user.id")?)
//!         .with_mode(ErrorPolicy::Continue)
//!         .build()?;
//!
//!     let summary = joiner.run(std::io::stdin(), std::io::stdout(), std::io::stderr())?;
//!     eprintln!("{} lines, {} joined", summary.lines, summary.emitted);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `yaml` - load `JoinConfig` from YAML (enabled by default)
//! - `toml` - load `JoinConfig` from TOML
//! - `miette` - Pretty error reporting with miette
//! - `sarge` - the `smalljoin` command-line binary
//!
//! ## Streaming semantics
//!
//! - Input is read in fixed-size chunks and cut into lines at `\n`. Output
//!   lines never depend on how the input happened to be chunked.
//! - Lines are joined by a pool of worker threads, so output order is not
//!   input order.
//! - Memory is bounded by the index size plus `buffer_size` queued batches.

pub mod builder;
pub mod cli;
pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod extract;
pub mod io;
pub mod resolve;
pub mod result;
pub mod stream;

// Re-exports for convenience
pub use builder::JoinerBuilder;
pub use config::{JoinConfig, JoinOptions, SideConfig};
pub use engine::{JoinSummary, Joiner};
pub use error::{
    ConfigError, ErrorPolicy, ExecError, ExtractError, IndexError, JoinError, SingleJoinError,
    Stage,
};
pub use extract::{JsonPath, KeyRules};
pub use io::{
    FileInput, FileOutput, InMemorySink, InMemorySource, InputProvider, OutputTarget, StderrOutput,
    StdinInput, StdoutOutput,
};
pub use resolve::{ExecOracle, Resolver, RightIndex};
pub use result::{ExecOutcome, IndexFileResult, JoinResult, JoinType, LeftRow, RightMatch};

/// Build a Joiner from a JoinConfig.
pub fn build_joiner_from_config(config: JoinConfig) -> Result<Joiner, JoinError> {
    JoinerBuilder::from_config(config)?.build()
}

/// Build a Joiner from a JoinConfig, allowing the caller to adjust the
/// JoinerBuilder before the index is loaded.
pub fn build_joiner_from_config_with<F>(config: JoinConfig, customize: F) -> Result<Joiner, JoinError>
where
    F: FnOnce(JoinerBuilder) -> JoinerBuilder,
{
    let builder = JoinerBuilder::from_config(config)?;
    customize(builder).build()
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::JoinDiagnostic;

// Internal test modules (see src/tests)
#[cfg(test)]
mod tests;
