//! Text tokenizer interface (consumed, spec §6) — used by the vector ranker
//! (§4.7) to normalize ad-hoc query strings with the same rules a
//! [`Collection`](crate::collection::Collection) is expected to have already
//! applied to its own tokens: split on `[^A-Za-z0-9]+`, lowercase, drop
//! empties, drop stop-words.
//!
//! Grounded in the teacher's pluggable `Tokenizer` trait
//! (`src/index/text_types.rs`'s `WhitespaceTokenizer`/`NgramTokenizer`),
//! generalized here to the normalization spec.md actually specifies.

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// A small built-in English stop-word list so the crate is usable without
/// requiring a caller to supply one (the original's `resources.py` loaded a
/// similar list from a bundled file).
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in",
    "into", "is", "it", "no", "not", "of", "on", "or", "such", "that", "the",
    "their", "then", "there", "these", "they", "this", "to", "was", "will",
    "with",
];

#[derive(Debug, Clone)]
pub struct DefaultTokenizer {
    stop_words: std::collections::HashSet<String>,
}

impl Default for DefaultTokenizer {
    fn default() -> Self {
        Self::with_stop_words(DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()))
    }
}

impl DefaultTokenizer {
    pub fn with_stop_words(stop_words: impl IntoIterator<Item = String>) -> Self {
        Self { stop_words: stop_words.into_iter().collect() }
    }
}

impl Tokenizer for DefaultTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }
}
