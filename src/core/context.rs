// File: src/core/context.rs
use crate::config::{ScoringWeights, PROBABILITY_FLOOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bigram and trigram statistics over the corpus token stream.
///
/// Probabilities are joint over the whole tuple: count(tuple) divided by the
/// number of tuples of that order observed. They are not conditioned on the
/// prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NgramModel {
    /// Maps (prev_word, current_word) -> frequency
    bigrams: HashMap<(String, String), u64>,
    /// Maps (prev_prev_word, prev_word, current_word) -> frequency
    trigrams: HashMap<(String, String, String), u64>,
    total_bigrams: u64,
    total_trigrams: u64,
}

impl NgramModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every adjacent pair and triple of the token stream.
    /// O(n) in the number of tokens.
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut model = Self::new();
        for pair in tokens.windows(2) {
            let key = (pair[0].as_ref().to_string(), pair[1].as_ref().to_string());
            *model.bigrams.entry(key).or_insert(0) += 1;
            model.total_bigrams += 1;
        }
        for triple in tokens.windows(3) {
            let key = (
                triple[0].as_ref().to_string(),
                triple[1].as_ref().to_string(),
                triple[2].as_ref().to_string(),
            );
            *model.trigrams.entry(key).or_insert(0) += 1;
            model.total_trigrams += 1;
        }
        model
    }

    /// Joint probability of the pair, 0 when unseen.
    pub fn bigram_probability(&self, first: &str, second: &str) -> f64 {
        if self.total_bigrams == 0 {
            return 0.0;
        }
        // Tuple keys of owned strings force an allocation per lookup.
        let key = (first.to_string(), second.to_string());
        match self.bigrams.get(&key) {
            Some(&count) => count as f64 / self.total_bigrams as f64,
            None => 0.0,
        }
    }

    /// Joint probability of the triple, 0 when unseen.
    pub fn trigram_probability(&self, first: &str, second: &str, third: &str) -> f64 {
        if self.total_trigrams == 0 {
            return 0.0;
        }
        let key = (first.to_string(), second.to_string(), third.to_string());
        match self.trigrams.get(&key) {
            Some(&count) => count as f64 / self.total_trigrams as f64,
            None => 0.0,
        }
    }

    /// Number of bigram occurrences observed (not distinct pairs).
    pub fn bigram_count(&self) -> u64 {
        self.total_bigrams
    }

    pub fn trigram_count(&self) -> u64 {
        self.total_trigrams
    }

    /// Penalty for placing `candidate` after `preceding`. Zero without context.
    ///
    /// The bigram term needs one preceding token, the trigram term two. Unseen
    /// tuples are floored so the penalty stays finite.
    pub fn context_score(&self, candidate: &str, preceding: &[String], weights: &ScoringWeights) -> f64 {
        let mut score = 0.0;
        if let Some(prev) = preceding.last() {
            let p = self.bigram_probability(prev, candidate).max(PROBABILITY_FLOOR);
            score += -p.ln() * weights.bigram;
        }
        if preceding.len() >= 2 {
            let prev_prev = &preceding[preceding.len() - 2];
            let prev = &preceding[preceding.len() - 1];
            let p = self
                .trigram_probability(prev_prev, prev, candidate)
                .max(PROBABILITY_FLOOR);
            score += -p.ln() * weights.trigram;
        }
        score
    }

    /// Trigram probability if non-zero, else bigram probability, else 0.
    pub fn context_probability(&self, word: &str, preceding: &[String]) -> f64 {
        if preceding.len() >= 2 {
            let p = self.trigram_probability(
                &preceding[preceding.len() - 2],
                &preceding[preceding.len() - 1],
                word,
            );
            if p > 0.0 {
                return p;
            }
        }
        match preceding.last() {
            Some(prev) => self.bigram_probability(prev, word),
            None => 0.0,
        }
    }
}
