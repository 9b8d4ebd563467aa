use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{normalize_code, normalize_keywords, Entry};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entry #{index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("entry #{index} has an empty code")]
    EmptyCode { index: usize },
    #[error("duplicate code: {code}")]
    DuplicateCode { code: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    code: Option<String>,
    descr: Option<String>,
    keywords: Option<String>,
}

impl RawEntry {
    fn into_entry(self, index: usize) -> Result<Entry, CatalogError> {
        let code = self
            .code
            .ok_or(CatalogError::MissingField { index, field: "code" })?;
        let descr = self
            .descr
            .ok_or(CatalogError::MissingField { index, field: "descr" })?;
        let keywords = self.keywords.ok_or(CatalogError::MissingField {
            index,
            field: "keywords",
        })?;
        Ok(Entry {
            code,
            descr,
            keywords,
        })
    }
}

/// The loaded-once set of entries, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Entry>,
    search_keywords: Vec<String>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawEntry> = serde_json::from_str(text)?;
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_entry(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    /// Validates the entries and sorts them by code.
    ///
    /// Ranking ties fall back to catalog order, so the sort here is what makes
    /// equal-score results come out alphabetically.
    pub fn from_entries(mut entries: Vec<Entry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let key = entry.code_key();
            if key.is_empty() {
                return Err(CatalogError::EmptyCode { index });
            }
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateCode {
                    code: entry.code.clone(),
                });
            }
        }

        entries.sort_by_cached_key(Entry::code_key);
        let search_keywords = entries
            .iter()
            .map(|entry| normalize_keywords(&entry.keywords))
            .collect();
        Ok(Self {
            entries,
            search_keywords,
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Uppercased keywords, index-aligned with [`Catalog::entries`].
    pub fn search_keywords(&self) -> &[String] {
        &self.search_keywords
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Entry> {
        let key = normalize_code(code);
        self.entries
            .binary_search_by(|entry| entry.code_key().cmp(&key))
            .ok()
            .map(|index| &self.entries[index])
    }
}
