//! Turns a hand-maintained markdown list of codes into catalog entries and
//! reports the ones the catalog does not have yet.
//!
//! Accepted lines look like ``- `SE16` Data Browser: display table``. Headings
//! (`#`), blank lines and `--` separators are skipped; anything else is
//! rejected and reported back so it can be fixed by hand.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::Catalog;
use crate::model::Entry;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub entries: Vec<Entry>,
    pub rejected: Vec<RejectedLine>,
}

fn list_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-\s+`(.*)`\s*(.*)$").expect("list pattern is valid"))
}

pub fn read_list(path: &Path) -> Result<ParsedList, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_list(&text))
}

pub fn parse_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();
    let mut items: Vec<(&str, &str)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if line.starts_with('#') || trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        match list_line_pattern().captures(line) {
            Some(captures) => {
                let (code, descr) = (captures.get(1), captures.get(2));
                if let (Some(code), Some(descr)) = (code, descr) {
                    items.push((code.as_str(), descr.as_str()));
                }
            }
            None => parsed.rejected.push(RejectedLine {
                line_number: index + 1,
                text: line.to_string(),
            }),
        }
    }

    // Ordered by the code as written, before any cleanup.
    items.sort_by(|a, b| a.0.cmp(b.0));
    parsed.entries = items
        .into_iter()
        .map(|(code, descr)| list_entry(code, descr))
        .collect();
    parsed
}

fn list_entry(raw_code: &str, raw_descr: &str) -> Entry {
    let code = raw_code.replace("/n", "").replace("/N", "").to_uppercase();
    let descr = raw_descr.replace(':', "").trim().to_string();
    Entry {
        code,
        keywords: descr.clone(),
        descr,
    }
}

/// Entries whose code does not appear verbatim in `catalog`, in list order.
pub fn missing_from<'a>(parsed: &'a ParsedList, catalog: &Catalog) -> Vec<&'a Entry> {
    parsed
        .entries
        .iter()
        .filter(|entry| !catalog.entries().iter().any(|known| known.code == entry.code))
        .collect()
}
