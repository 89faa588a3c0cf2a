//! Word tokenizer shared by both pipelines
//!
//! Lowercases, splits on Unicode word boundaries and drops segments that have
//! no word character (punctuation, whitespace).

use unicode_segmentation::UnicodeSegmentation;

/// Tokenizer producing lowercased word forms in text order
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize and filter text into word forms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_word_bounds()
            .filter(|segment| is_word(segment))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize at most `char_limit` leading characters, keeping at most
    /// `token_limit` tokens
    pub fn tokenize_prefix(
        &self,
        text: &str,
        char_limit: usize,
        token_limit: usize,
    ) -> Vec<String> {
        let end = text
            .char_indices()
            .nth(char_limit)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        let mut tokens = self.tokenize(&text[..end]);
        tokens.truncate(token_limit);
        tokens
    }
}

/// True if the segment holds at least one letter, digit or underscore
fn is_word(segment: &str) -> bool {
    segment.chars().any(|c| c.is_alphanumeric() || c == '_')
}
