//! Tokenization and sentence splitting shared by the matchers

use crate::error::{RelevanceError, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Fillers and resume boilerplate ignored by every token comparison
pub const FILLER_WORDS: [&str; 11] = [
    "by", "and", "for", "responsible", "assisted", "the", "a", "an", "of", "in", "on",
];

/// Action verbs that signal achievement-oriented project writing
pub const IMPACT_VERBS: [&str; 10] = [
    "developed", "designed", "optimized", "launched", "implemented",
    "engineered", "created", "improved", "built", "automated",
];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    impact_verbs: HashSet<&'static str>,
    word_regex: Regex,
    sentence_regex: Regex,
}

impl TextProcessor {
    pub fn new() -> Result<Self> {
        let word_regex = Regex::new(r"\w+")
            .map_err(|e| RelevanceError::Processing(format!("Invalid word regex: {}", e)))?;
        let sentence_regex = Regex::new(r"[.\n]")
            .map_err(|e| RelevanceError::Processing(format!("Invalid sentence regex: {}", e)))?;

        Ok(Self {
            stop_words: FILLER_WORDS.iter().copied().collect(),
            impact_verbs: IMPACT_VERBS.iter().copied().collect(),
            word_regex,
            sentence_regex,
        })
    }

    /// Lower-cased word tokens of `text` with filler words removed.
    ///
    /// Sorted set, so differences come out in alphabetical order.
    pub fn token_set(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.word_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// Number of distinct impact verbs among `tokens`
    pub fn impact_verb_count(&self, tokens: &BTreeSet<String>) -> usize {
        tokens
            .iter()
            .filter(|token| self.impact_verbs.contains(token.as_str()))
            .count()
    }

    /// Split on periods and newlines, dropping blank pieces
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        self.sentence_regex
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new().expect("built-in text patterns are valid")
    }
}
