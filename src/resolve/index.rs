//! The in-memory right-hand index.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ConfigError, IndexError, JoinError};
use crate::extract::KeyRules;
use crate::result::{IndexFileResult, RightMatch};

/// One row of the right-hand file.
#[derive(Debug)]
pub struct IndexEntry {
    row: String,
    matches: AtomicU64,
}

impl IndexEntry {
    fn new(row: String) -> Self {
        Self {
            row,
            matches: AtomicU64::new(0),
        }
    }

    pub fn row(&self) -> &str {
        &self.row
    }

    /// How many streaming rows matched this entry so far. Diagnostic only.
    pub fn matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }
}

/// Join key to right-hand row, built once and read-only afterwards.
#[derive(Debug, Default)]
pub struct RightIndex {
    entries: HashMap<String, IndexEntry>,
}

impl RightIndex {
    /// Read and index the file at `path`.
    pub fn load(path: impl AsRef<Path>, rules: &KeyRules) -> Result<Self, JoinError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|source| ConfigError::IndexUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if meta.is_dir() {
            return Err(ConfigError::IndexIsDirectory {
                path: path.to_path_buf(),
            }
            .into());
        }
        let file = std::fs::File::open(path).map_err(|source| ConfigError::IndexUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::from_reader(file, rules)?;
        tracing::info!(path = %path.display(), entries = index.len(), "right index built");
        Ok(index)
    }

    /// Index every line of `reader`. Blank lines are skipped; when two rows
    /// share a key the later one wins.
    pub fn from_reader<R: Read>(mut reader: R, rules: &KeyRules) -> Result<Self, IndexError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let text = String::from_utf8_lossy(&data);

        let mut entries = HashMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let key = rules
                .extract(line)
                .map_err(|source| IndexError::Extract { line: n + 1, source })?;
            entries.insert(key, IndexEntry::new(line.to_string()));
        }
        Ok(Self { entries })
    }

    /// Look up `key`, counting the hit on the matched entry.
    pub fn lookup(&self, key: &str) -> Option<RightMatch> {
        let entry = self.entries.get(key)?;
        entry.matches.fetch_add(1, Ordering::Relaxed);
        Some(RightMatch::IndexFileResult(IndexFileResult {
            index: key.to_string(),
            row: entry.row.clone(),
        }))
    }

    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, row)` pairs in no particular order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, e)| (k.as_str(), e.row()))
    }
}

/// Two indexes are equal when they map the same keys to the same rows;
/// match counters are ignored.
impl PartialEq for RightIndex {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, e)| other.entries.get(k).is_some_and(|o| o.row == e.row))
    }
}

impl Eq for RightIndex {}
