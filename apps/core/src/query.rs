use std::sync::Arc;

use crate::catalog::Catalog;
use crate::model::{normalize_keywords, normalize_query, Entry, ScoredEntry};

const WHOLE_WORD_SCORE: u32 = 2;
const SUBSTRING_SCORE: u32 = 1;

/// Ranks entries against a free-text query.
///
/// Results are ordered by score, highest first. Entries with equal scores keep
/// their relative order in `entries`.
pub fn rank(entries: &[Entry], query: &str) -> Vec<ScoredEntry> {
    let keywords: Vec<String> = entries
        .iter()
        .map(|entry| normalize_keywords(&entry.keywords))
        .collect();
    rank_prepared(entries, &keywords, query)
}

/// Ranks a catalog using the keywords it uppercased at load time.
pub fn rank_catalog(catalog: &Catalog, query: &str) -> Vec<ScoredEntry> {
    rank_prepared(catalog.entries(), catalog.search_keywords(), query)
}

/// Same ordering as [`rank`]; `keywords[i]` must be the uppercased keywords
/// of `entries[i]`.
pub fn rank_prepared(entries: &[Entry], keywords: &[String], query: &str) -> Vec<ScoredEntry> {
    let normalized = normalize_query(query);
    let tokens = tokenize(&normalized);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, usize, &Entry)> = entries
        .iter()
        .zip(keywords)
        .enumerate()
        .filter_map(|(index, (entry, keywords))| {
            let score = score_keywords(keywords, &tokens);
            (score > 0).then_some((score, index, entry))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    scored
        .into_iter()
        .map(|(score, _, entry)| ScoredEntry {
            entry: entry.clone(),
            score,
        })
        .collect()
}

/// Splits an already normalized query. Single characters are dropped.
pub fn tokenize(normalized_query: &str) -> Vec<&str> {
    normalized_query
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .collect()
}

/// Sums token scores against keywords that are already uppercased.
pub fn score_keywords(keywords: &str, tokens: &[&str]) -> u32 {
    tokens
        .iter()
        .map(|token| score_token(keywords, token))
        .sum()
}

fn score_token(keywords: &str, token: &str) -> u32 {
    let mut score = 0;
    for (start, _) in keywords.match_indices(token) {
        if is_word_at(keywords, start, token.len()) {
            return WHOLE_WORD_SCORE;
        }
        score = SUBSTRING_SCORE;
    }
    score
}

// Word boundaries are the string edges and literal spaces only. Tokens never
// contain spaces, so non-overlapping matches cover every whole-word hit.
fn is_word_at(keywords: &str, start: usize, len: usize) -> bool {
    let bytes = keywords.as_bytes();
    let end = start + len;
    (start == 0 || bytes[start - 1] == b' ') && (end == bytes.len() || bytes[end] == b' ')
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    previous: Option<String>,
}

impl QueryState {
    /// Records `normalized` and reports whether it differs from the last query.
    pub fn update(&mut self, normalized: &str) -> bool {
        if self.previous.as_deref() == Some(normalized) {
            return false;
        }
        self.previous = Some(normalized.to_string());
        true
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Unchanged,
    Changed(Vec<ScoredEntry>),
}

pub struct QueryEngine {
    catalog: Arc<Catalog>,
    state: QueryState,
}

impl QueryEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: QueryState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Handles one query event. Identical consecutive queries (after
    /// normalization) are not recomputed.
    pub fn on_query(&mut self, text: &str) -> QueryOutcome {
        let normalized = normalize_query(text);
        if !self.state.update(&normalized) {
            return QueryOutcome::Unchanged;
        }

        let results = rank_catalog(&self.catalog, &normalized);
        tracing::debug!(query = %normalized, matches = results.len(), "query ranked");
        QueryOutcome::Changed(results)
    }
}
