//! CLI integration helpers for smalljoin.
//!
//! `JoinArgs` holds the raw values a command-line parser produced and turns
//! them into a `JoinerBuilder`. A `--config` file, when given, is loaded
//! first and individual flags override it.
//!
//! # Example with sarge
//!
//! ```rust,ignore
//! use sarge::prelude::*;
//! use smalljoin::{JoinType, cli::JoinArgs};
//!
//! let mut reader = ArgumentReader::new();
//! let join = reader.add::<JoinType>(tag::long("join"));
//! let index = reader.add::<String>(tag::long("index-file"));
//! let args = reader.parse()?;
//!
//! let mut cli = JoinArgs::default();
//! if let Some(Ok(j)) = join.get(&args) {
//!     cli.join = Some(j);
//! }
//! cli.index_file = index.get(&args).and_then(Result::ok);
//! let joiner = cli.into_builder()?.build()?;
//! ```

#[cfg(feature = "sarge")]
mod sarge;

use crate::builder::JoinerBuilder;
use crate::config::{JoinConfig, SideConfig};
use crate::error::ConfigError;
use crate::result::JoinType;

/// Key rule flags for one side (`--left-*` or `--right-*`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideArgs {
    pub separator: Option<String>,
    /// Zero-based join column, `-1` for the whole row
    pub column: Option<i64>,
    pub json_subquery: Option<String>,
    pub clean: bool,
}

impl SideArgs {
    fn apply(self, side: &mut SideConfig) {
        if let Some(sep) = self.separator {
            side.separator = sep;
        }
        if let Some(col) = self.column {
            side.join_column = col;
        }
        if let Some(query) = self.json_subquery {
            side.json_subquery = Some(query);
        }
        side.clean |= self.clean;
    }
}

/// Everything the `smalljoin` command line can set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinArgs {
    /// Configuration file loaded before the flags are applied
    pub config: Option<String>,
    pub join: Option<JoinType>,
    pub index_file: Option<String>,
    pub exec: Option<String>,
    pub shell: Option<String>,
    pub left: SideArgs,
    pub right: SideArgs,
    pub concurrency: Option<usize>,
    pub buffer: Option<usize>,
    pub continue_on_error: bool,
    pub verbose: bool,
}

impl JoinArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the flags over the configuration file, if any.
    pub fn to_config(&self) -> Result<JoinConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => JoinConfig::from_path(path)?,
            None => JoinConfig::new(),
        };

        if let Some(join) = self.join {
            config.join = Some(join.to_string());
        }
        if let Some(path) = &self.index_file {
            config.index_file = Some(path.clone());
        }
        if let Some(template) = &self.exec {
            config.exec = Some(template.clone());
        }
        if let Some(shell) = &self.shell {
            config.shell = Some(shell.clone());
        }
        self.left.clone().apply(&mut config.left);
        self.right.clone().apply(&mut config.right);
        if self.concurrency.is_some() {
            config.concurrency = self.concurrency;
        }
        if self.buffer.is_some() {
            config.buffer_size = self.buffer;
        }
        if self.continue_on_error {
            config.error_policy = Some("continue".to_string());
        }
        config.verbose |= self.verbose;

        Ok(config)
    }

    /// Resolve the arguments into a builder.
    pub fn into_builder(self) -> Result<JoinerBuilder, ConfigError> {
        JoinerBuilder::from_config(self.to_config()?)
    }
}
