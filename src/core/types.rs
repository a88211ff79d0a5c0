// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A lower-cased alphanumeric token; the unit of correction.
pub type Token = String;

/// Structural classification of a candidate relative to the original token,
/// decided by the length difference between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    Replace,
    Insert,
    Delete,
    Transpose,
}

/// A vocabulary word proposed as a correction, with every score component
/// kept separately so callers can explain a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionCandidate {
    pub token: Token,
    pub kind: EditKind,
    pub structural: f64,
    /// -ln(P(token)), floored.
    pub unigram: f64,
    pub context: f64,
    /// Negative when the user has accepted this correction before.
    pub feedback: f64,
    pub custom_bonus: f64,
}

impl CorrectionCandidate {
    /// Sum of all components. Lower ranks higher.
    pub fn score(&self) -> f64 {
        self.structural + self.unigram + self.context + self.feedback + self.custom_bonus
    }
}

/// Which terminal of the decision procedure produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionSource {
    Shortcut,
    Known,
    Corrected,
    Approximate,
    NoSuggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    pub probability: f64,
    pub context_probability: f64,
    pub source: SuggestionSource,
}

impl Suggestion {
    pub fn new(word: impl Into<String>, probability: f64, context_probability: f64, source: SuggestionSource) -> Self {
        Self {
            word: word.into(),
            probability,
            context_probability,
            source,
        }
    }

    pub fn no_suggestion(word: &str) -> Self {
        Self::new(word, 0.0, 0.0, SuggestionSource::NoSuggestion)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub vocabulary_size: usize,
    pub bigram_count: u64,
    pub trigram_count: u64,
    pub custom_word_count: usize,
    pub shortcut_count: usize,
    pub feedback_entry_count: usize,
}
