//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{JoinError, SingleJoinError, Stage};

/// A diagnostic wrapper for join errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct JoinDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

fn stage_help(stage: Stage) -> &'static str {
    match stage {
        Stage::Extract => {
            "Check the separator, join column and JSON sub-query, or rerun with --continue-on-error to skip bad rows"
        }
        Stage::Resolve => "Check that the exec template runs in the configured shell",
        Stage::Emit => "Check that the output stream is writable",
    }
}

impl From<SingleJoinError> for JoinDiagnostic {
    fn from(e: SingleJoinError) -> Self {
        JoinDiagnostic {
            message: format!("[{}] on row {:?}", e.stage, e.row),
            help: Some(stage_help(e.stage).into()),
            source: Some(e.error),
            severity: Severity::Error,
        }
    }
}

impl From<JoinError> for JoinDiagnostic {
    fn from(err: JoinError) -> Self {
        let help = match &err {
            JoinError::Aborted(_) => None,
            JoinError::Config(_) => Some("Check the join options and the right-hand side"),
            JoinError::Index(_) => Some("Check the right-side separator, column and sub-query"),
            JoinError::Input(_) => Some("Check that the input stream is readable"),
            JoinError::Output(_) => Some(stage_help(Stage::Emit)),
            JoinError::WorkerPanicked => None,
        };
        match err {
            JoinError::Aborted(single) => JoinDiagnostic::from(single),
            other => JoinDiagnostic {
                message: other.to_string(),
                source: None,
                help: help.map(Into::into),
                severity: Severity::Error,
            },
        }
    }
}

impl From<JoinError> for miette::Report {
    fn from(err: JoinError) -> Self {
        miette::Report::new(JoinDiagnostic::from(err))
    }
}
