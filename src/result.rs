//! Join results and the join semantics that decide whether one is emitted.
//!
//! Results serialize to one JSON object per line:
//!
//! ```text
//! {"Left":{"Index":"a","Row":"1,a"},"Right":{"IndexFileResult":{"Index":"a","Row":"a"}}}
//! {"Left":{"Index":"c","Row":"3,c"},"Right":null}
//! {"Left":{"Index":"d","Row":"d"},"Right":{"ExecResult":{"Stdout":"","Stderr":"","ExitCode":1}}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The SQL-style join applied to the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// Left rows with a successful right match
    #[default]
    Inner,
    /// Every left row, with or without a right match
    Left,
    /// Left rows with no successful right match (anti-join)
    #[serde(alias = "disjoint", alias = "anti")]
    RightIsNull,
}

impl JoinType {
    /// Parse a join type name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Some(JoinType::Inner),
            "left" => Some(JoinType::Left),
            "disjoint" | "right-is-null" | "right_is_null" | "anti" => Some(JoinType::RightIsNull),
            _ => None,
        }
    }
}

impl std::str::FromStr for JoinType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JoinType::from_str(s).ok_or_else(|| ConfigError::InvalidJoinType(s.to_string()))
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::RightIsNull => write!(f, "disjoint"),
        }
    }
}

/// The streaming-side row and the key extracted from it.
///
/// Given the row `a, b, c` joined on its second column, `row` is `a, b, c`
/// and `index` is `b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeftRow {
    pub index: String,
    pub row: String,
}

/// A row of the right-hand index file that matched the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexFileResult {
    pub index: String,
    pub row: String,
}

/// The captured run of an exec join command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// The right-hand side of a result: either an index match or a command run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RightMatch {
    IndexFileResult(IndexFileResult),
    ExecResult(ExecOutcome),
}

/// The outcome of joining one streaming row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JoinResult {
    pub left: Option<LeftRow>,
    pub right: Option<RightMatch>,
}

impl JoinResult {
    /// A result for a row whose key was empty; never emitted.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(index: impl Into<String>, row: impl Into<String>, right: Option<RightMatch>) -> Self {
        Self {
            left: Some(LeftRow {
                index: index.into(),
                row: row.into(),
            }),
            right,
        }
    }

    /// Whether this result satisfies `join_type` and should be emitted.
    pub fn is_match(&self, join_type: JoinType) -> bool {
        if self.left.is_none() {
            return false;
        }
        match join_type {
            JoinType::Left => true,
            JoinType::Inner => match &self.right {
                Some(RightMatch::IndexFileResult(_)) => true,
                Some(RightMatch::ExecResult(exec)) => exec.exit_code == 0,
                None => false,
            },
            JoinType::RightIsNull => match &self.right {
                Some(RightMatch::IndexFileResult(_)) => false,
                Some(RightMatch::ExecResult(exec)) => exec.exit_code != 0,
                None => true,
            },
        }
    }

    /// Serialize as a single JSON line, newline included.
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl fmt::Display for JoinResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
