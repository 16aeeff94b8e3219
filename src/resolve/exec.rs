//! Right-hand side backed by an external command run once per key.

use std::process::Command;

use crate::error::ExecError;
use crate::result::{ExecOutcome, RightMatch};

/// Placeholder replaced by the join key in exec templates.
pub const KEY_PLACEHOLDER: &str = "{}";

/// Default shell used to run exec templates.
pub const DEFAULT_SHELL: &str = "bash";

/// Runs a command template through a shell for each join key.
///
/// The key is substituted into the template verbatim; no quoting is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOracle {
    template: String,
    shell: String,
}

impl ExecOracle {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// The command line that will be run for `key`.
    pub fn command_for(&self, key: &str) -> String {
        self.template.replace(KEY_PLACEHOLDER, key)
    }

    /// Run the command for `key` and capture its output.
    ///
    /// A nonzero exit is returned as data; only a failure to run the command
    /// at all is an error. A command killed by a signal reports exit code -1.
    pub fn run(&self, key: &str) -> Result<RightMatch, ExecError> {
        let command = self.command_for(key);
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::trace!(%command, exit_code, "exec join finished");

        Ok(RightMatch::ExecResult(ExecOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        }))
    }
}
