//! File-backed join configuration.
//!
//! ```yaml
//! join: left
//! index_file: users.csv
//! right:
//!   separator: ","
//!   join_column: 0
//! left:
//!   separator: ","
//!   join_column: 4
//!   json_subquery: data.user_id
//!   clean: true
//! concurrency: 8
//! error_policy: continue
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::extract::KeyRules;

/// Configuration for an entire join run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Join type: "inner", "left" or "disjoint"
    pub join: Option<String>,
    /// Right-hand index file
    pub index_file: Option<String>,
    /// Right-hand exec template, `{}` is replaced by the join key
    pub exec: Option<String>,
    /// Shell used to run the exec template
    pub shell: Option<String>,
    /// Key rules for the streaming side
    pub left: SideConfig,
    /// Key rules for the index file
    pub right: SideConfig,
    pub concurrency: Option<usize>,
    pub buffer_size: Option<usize>,
    pub chunk_size: Option<usize>,
    /// Error policy: "fast_fail" or "continue"
    pub error_policy: Option<String>,
    pub verbose: bool,
}

/// Key rules for one side, in their configuration-file form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SideConfig {
    pub separator: String,
    /// Zero-based join column; -1 joins on the whole row
    pub join_column: i64,
    pub json_subquery: Option<String>,
    pub clean: bool,
}

impl Default for SideConfig {
    fn default() -> Self {
        Self {
            separator: String::new(),
            join_column: -1,
            json_subquery: None,
            clean: false,
        }
    }
}

impl SideConfig {
    /// Compile into key rules.
    pub fn to_rules(&self) -> Result<KeyRules, ConfigError> {
        KeyRules::from_column_index(self.separator.clone(), self.join_column)
            .with_json_path(self.json_subquery.as_deref().unwrap_or(""))
            .map(|rules| rules.with_clean(self.clean))
    }
}

impl JoinConfig {
    /// Create a new empty join configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the join type.
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    /// Join against an index file.
    pub fn with_index_file(mut self, path: impl Into<String>) -> Self {
        self.index_file = Some(path.into());
        self
    }

    /// Join against an exec template.
    pub fn with_exec(mut self, template: impl Into<String>) -> Self {
        self.exec = Some(template.into());
        self
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: impl Into<String>) -> Self {
        self.error_policy = Some(policy.into());
        self
    }

    /// Parse a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Parse a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load a configuration file, picking the format from its extension.
    ///
    /// `.json` is always supported; `.yaml`/`.yml` and `.toml` need the
    /// matching crate feature.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let fail = |reason: String| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => serde_json::from_str(&text).map_err(|e| fail(e.to_string())),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::from_yaml_str(&text).map_err(|e| fail(e.to_string())),
            #[cfg(feature = "toml")]
            "toml" => Self::from_toml_str(&text).map_err(|e| fail(e.to_string())),
            other => Err(fail(format!(
                "unsupported config format {other:?}, enable the matching feature"
            ))),
        }
    }
}
