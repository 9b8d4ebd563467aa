use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub code: String,
    pub descr: String,
    pub keywords: String,
}

impl Entry {
    pub fn new(code: &str, descr: &str, keywords: &str) -> Self {
        Self {
            code: code.to_string(),
            descr: descr.to_string(),
            keywords: keywords.to_string(),
        }
    }

    /// Key used for uniqueness and ordering of codes.
    pub fn code_key(&self) -> String {
        normalize_code(&self.code)
    }
}

/// An entry paired with the score it earned for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredEntry {
    pub entry: Entry,
    pub score: u32,
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn normalize_query(input: &str) -> String {
    input.to_uppercase().trim().to_string()
}

pub fn normalize_keywords(input: &str) -> String {
    input.to_uppercase()
}

/// Renders the detail pane text for a selected entry.
pub fn describe(entry: &Entry, score: Option<u32>) -> String {
    let score = score
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\n{}\n\nKeywords ({score}): {}",
        entry.code, entry.descr, entry.keywords
    )
}
