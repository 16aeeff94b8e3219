//! Join key extraction.
//!
//! A `KeyRules` value describes how a row is reduced to its join key:
//!
//! | column | sub-query | key                                              |
//! |--------|-----------|--------------------------------------------------|
//! | none   | none      | the whole trimmed row                            |
//! | none   | set       | the row parsed as JSON, queried                  |
//! | `n`    | any       | column `n` (CSV aware when the separator is `,`) |
//!
//! When both a column and a sub-query are set, the column's content is
//! parsed as JSON and queried.

mod csv;
mod json;

pub use csv::{CsvTokenizer, Segment};
pub use json::JsonPath;

use crate::error::{ConfigError, ExtractError};

/// Rules for reducing one side's rows to join keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRules {
    /// Column separator. A comma switches to the quote-aware CSV tokenizer.
    pub separator: String,
    /// Zero-based join column, `None` to join on the whole row.
    pub column: Option<usize>,
    /// Optional JSON sub-query applied to the row or the selected column.
    pub json_path: Option<JsonPath>,
    /// Retry JSON parsing with doubled quotes collapsed.
    pub clean: bool,
}

impl KeyRules {
    /// Join on the whole row.
    pub fn whole_row() -> Self {
        Self::default()
    }

    /// Join on column `index` after splitting on `separator`.
    pub fn column(separator: impl Into<String>, index: usize) -> Self {
        Self {
            separator: separator.into(),
            column: Some(index),
            ..Self::default()
        }
    }

    /// Build rules from the command-line convention where `-1` (or any
    /// negative number) means the whole row.
    pub fn from_column_index(separator: impl Into<String>, index: i64) -> Self {
        Self {
            separator: separator.into(),
            column: usize::try_from(index).ok(),
            ..Self::default()
        }
    }

    /// Set the JSON sub-query. An empty string clears it.
    pub fn with_json_path(mut self, path: &str) -> Result<Self, ConfigError> {
        self.json_path = if path.trim().is_empty() {
            None
        } else {
            Some(JsonPath::parse(path)?)
        };
        Ok(self)
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.column.is_some() && self.separator.is_empty() {
            return Err(ConfigError::MissingSeparator);
        }
        Ok(())
    }

    /// Extract the join key from `row`.
    ///
    /// A blank row yields an empty key.
    pub fn extract(&self, row: &str) -> Result<String, ExtractError> {
        let row = row.trim();
        if row.is_empty() {
            return Ok(String::new());
        }

        let Some(column) = self.column else {
            return match &self.json_path {
                None => Ok(row.to_string()),
                Some(path) => path.query(row, self.clean),
            };
        };

        let cell = if self.separator == "," {
            let mut columns = CsvTokenizer::default().columns(row)?;
            if column >= columns.len() {
                return Err(self.out_of_range(column, columns.len(), row));
            }
            columns.swap_remove(column)
        } else {
            let found = row.split(self.separator.as_str()).count();
            match row.split(self.separator.as_str()).nth(column) {
                Some(cell) => cell.to_string(),
                None => return Err(self.out_of_range(column, found, row)),
            }
        };

        match &self.json_path {
            None => Ok(cell.trim().to_string()),
            Some(path) => path.query(cell.trim(), self.clean),
        }
    }

    fn out_of_range(&self, requested: usize, found: usize, row: &str) -> ExtractError {
        ExtractError::ColumnOutOfRange {
            requested,
            found,
            separator: self.separator.clone(),
            row: row.to_string(),
        }
    }
}
