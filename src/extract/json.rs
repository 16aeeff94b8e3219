//! JSON sub-path queries used to pull a join key out of a JSON document.
//!
//! The supported syntax is a subset of JMESPath: a dotted key path with
//! array indexes, optionally rooted at `$`.
//!
//! - `foo.bar.baz[2]`, `$.data.index`, `[0].id`, `rows[1][0]`
//! - negative indexes count from the end: `rows[-1]`
//! - keys that are not plain identifiers are double quoted: `"a-b".c`
//!
//! Filters, projections, slices and functions are rejected when the path is
//! compiled.

use serde_json::{Number, Value};

use crate::error::{ConfigError, ExtractError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(i64),
}

/// A compiled JSON sub-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    steps: Vec<Step>,
}

impl JsonPath {
    /// Compile a path expression.
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidJsonPath {
            path: path.to_string(),
            reason,
        };

        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(invalid("path is empty".into()));
        }
        let mut rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let mut steps = Vec::new();
        let mut expect_key =
            !rest.is_empty() && !rest.starts_with('.') && !rest.starts_with('[');

        while !rest.is_empty() || expect_key {
            if let Some(stripped) = rest.strip_prefix('[') {
                let end = stripped
                    .find(']')
                    .ok_or_else(|| invalid("missing `]`".into()))?;
                let index_text = &stripped[..end];
                let index = index_text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("invalid array index `{index_text}`")))?;
                steps.push(Step::Index(index));
                rest = &stripped[end + 1..];
                expect_key = false;
                continue;
            }

            let stripped = if expect_key {
                rest
            } else {
                rest.strip_prefix('.')
                    .ok_or_else(|| invalid(format!("unexpected token near `{rest}`")))?
            };
            let (key, after) = if stripped.starts_with('"') {
                quoted_key(stripped).ok_or_else(|| invalid("unterminated quoted key".into()))?
            } else {
                let end = stripped
                    .find(|c: char| c == '.' || c == '[')
                    .unwrap_or(stripped.len());
                let key = &stripped[..end];
                if key.is_empty() {
                    return Err(invalid("empty key segment".into()));
                }
                if !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(invalid(format!(
                        "unsupported key `{key}`, quote keys with other characters"
                    )));
                }
                (key.to_string(), &stripped[end..])
            };
            steps.push(Step::Key(key));
            rest = after;
            expect_key = false;
        }

        Ok(Self {
            raw: trimmed.to_string(),
            steps,
        })
    }

    /// The expression this path was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk `root` along the path. `None` when any step is missing.
    pub fn select<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for step in &self.steps {
            current = match step {
                Step::Key(key) => current.get(key.as_str())?,
                Step::Index(index) => {
                    let items = current.as_array()?;
                    let at = if *index < 0 {
                        items.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
                    } else {
                        usize::try_from(*index).ok()?
                    };
                    items.get(at)?
                }
            };
        }
        Some(current)
    }

    /// Parse `data` as JSON and reduce the selected value to a join key.
    ///
    /// With `clean` set, a document that fails to parse is retried once with
    /// doubled quotes (`""`) collapsed, which undoes a second round of CSV
    /// quoting. Missing values and `null` yield an empty key.
    pub fn query(&self, data: &str, clean: bool) -> Result<String, ExtractError> {
        let doc: Value = match serde_json::from_str(data) {
            Ok(doc) => doc,
            Err(first) if clean => {
                serde_json::from_str(&data.replace("\"\"", "\"")).map_err(|_| {
                    ExtractError::InvalidJson {
                        data: data.to_string(),
                        source: first,
                    }
                })?
            }
            Err(source) => {
                return Err(ExtractError::InvalidJson {
                    data: data.to_string(),
                    source,
                });
            }
        };

        match self.select(&doc) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(number_key(n)),
            Some(other) => Err(ExtractError::NonScalar {
                path: self.raw.clone(),
                value: other.to_string(),
            }),
        }
    }
}

/// Split a leading `"..."` key off `text`, decoding JSON string escapes.
fn quoted_key(text: &str) -> Option<(String, &str)> {
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                let key = serde_json::from_str::<String>(&text[..=i]).ok()?;
                return Some((key, &text[i + 1..]));
            }
            _ => {}
        }
    }
    None
}

/// Render a JSON number as a join key.
///
/// Integers keep their exact digits. Floats use the shortest text that
/// round-trips, dropping a zero fraction (`1e3` and `1000.0` both give
/// `1000`) and switching to exponent form below `1e-4` or from `1e21` up,
/// with a signed two-digit exponent (`1e-07`, `1e+21`).
fn number_key(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    if (-4..21).contains(&exp) {
        format!("{f}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

impl std::str::FromStr for JsonPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}
