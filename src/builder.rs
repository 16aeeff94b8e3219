//! Builder for creating Joiner instances.

use std::path::PathBuf;

use crate::config::{JoinConfig, JoinOptions};
use crate::engine::Joiner;
use crate::error::{ConfigError, ErrorPolicy, JoinError};
use crate::extract::KeyRules;
use crate::resolve::{ExecOracle, Resolver, RightIndex};
use crate::result::JoinType;

#[derive(Debug, Clone, Default)]
pub struct JoinerBuilder {
    options: JoinOptions,
    index_file: Option<PathBuf>,
    exec: Option<String>,
    shell: Option<String>,
}

impl JoinerBuilder {
    pub fn new(join_type: JoinType) -> Self {
        Self {
            options: JoinOptions {
                join_type,
                ..JoinOptions::default()
            },
            ..Self::default()
        }
    }

    /// Join against the rows of an index file.
    pub fn with_index_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_file = Some(path.into());
        self
    }

    /// Join against the output of a command run once per key.
    pub fn with_exec(mut self, template: impl Into<String>) -> Self {
        self.exec = Some(template.into());
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn with_left_rules(mut self, rules: KeyRules) -> Self {
        self.options.left = rules;
        self
    }

    pub fn with_right_rules(mut self, rules: KeyRules) -> Self {
        self.options.right = rules;
        self
    }

    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.options.concurrency = workers;
        self
    }

    pub fn with_buffer_size(mut self, batches: usize) -> Self {
        self.options.buffer_size = batches;
        self
    }

    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.options.chunk_size = bytes;
        self
    }

    pub fn with_mode(mut self, policy: ErrorPolicy) -> Self {
        self.options.error_policy = policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    pub fn options(&self) -> &JoinOptions {
        &self.options
    }

    /// Validate the options, load or prepare the right-hand side and return a
    /// joiner ready to run.
    ///
    /// An index file is read completely here, so a bad index fails the build
    /// before any input is consumed.
    pub fn build(self) -> Result<Joiner, JoinError> {
        self.options.validate()?;

        let resolver = match (self.index_file, self.exec) {
            (None, None) => return Err(ConfigError::NoResolver.into()),
            (Some(_), Some(_)) => return Err(ConfigError::BothResolvers.into()),
            (Some(path), None) => Resolver::Index(RightIndex::load(&path, &self.options.right)?),
            (None, Some(template)) => {
                let mut oracle = ExecOracle::new(template);
                if let Some(shell) = self.shell {
                    oracle = oracle.with_shell(shell);
                }
                Resolver::Exec(oracle)
            }
        };

        tracing::debug!(
            join = %self.options.join_type,
            right = resolver.kind(),
            concurrency = self.options.concurrency,
            buffer_size = self.options.buffer_size,
            "joiner built"
        );
        Ok(Joiner::new(self.options, resolver)?)
    }

    /// Create a builder from a parsed configuration file.
    pub fn from_config(config: JoinConfig) -> Result<Self, ConfigError> {
        let join_type = match config.join.as_deref() {
            None => JoinType::default(),
            Some(s) => {
                JoinType::from_str(s).ok_or_else(|| ConfigError::InvalidJoinType(s.to_string()))?
            }
        };
        let mut builder = JoinerBuilder::new(join_type)
            .with_left_rules(config.left.to_rules()?)
            .with_right_rules(config.right.to_rules()?)
            .with_verbose(config.verbose);

        if let Some(policy_str) = config.error_policy.as_deref() {
            let policy = ErrorPolicy::from_str(policy_str)
                .ok_or_else(|| ConfigError::InvalidErrorPolicy(policy_str.to_string()))?;
            builder = builder.with_mode(policy);
        }
        if let Some(path) = config.index_file {
            builder = builder.with_index_file(path);
        }
        if let Some(template) = config.exec {
            builder = builder.with_exec(template);
        }
        if let Some(shell) = config.shell {
            builder = builder.with_shell(shell);
        }
        if let Some(n) = config.concurrency {
            builder = builder.with_concurrency(n);
        }
        if let Some(n) = config.buffer_size {
            builder = builder.with_buffer_size(n);
        }
        if let Some(n) = config.chunk_size {
            builder = builder.with_chunk_size(n);
        }

        Ok(builder)
    }
}
