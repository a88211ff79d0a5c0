// File: src/core/vocabulary.rs
use crate::config::{CUSTOM_WORD_PROBABILITY, PROBABILITY_FLOOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token frequency statistics and the unigram probabilities derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    counts: HashMap<String, u64>,
    /// Total token occurrences in the corpus the model was built from.
    total: u64,
    /// Membership and probability. Custom words live here with the reserved
    /// probability even when they have no corpus count.
    probabilities: HashMap<String, f64>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every token and derives count / total in one pass over the counts.
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }
        let total = tokens.len() as u64;
        let probabilities = counts
            .iter()
            .map(|(word, &count)| (word.clone(), count as f64 / total as f64))
            .collect();
        Self {
            counts,
            total,
            probabilities,
        }
    }

    /// O(1) exact membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.probabilities.contains_key(token)
    }

    /// Stored probability, or [`PROBABILITY_FLOOR`] for unknown tokens.
    pub fn probability(&self, token: &str) -> f64 {
        self.probabilities
            .get(token)
            .copied()
            .unwrap_or(PROBABILITY_FLOOR)
    }

    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn total_occurrences(&self) -> u64 {
        self.total
    }

    /// Inserts `token` with the reserved custom-word probability, replacing any
    /// corpus-derived value.
    pub fn add_custom_word(&mut self, token: &str) {
        self.probabilities
            .insert(token.to_string(), CUSTOM_WORD_PROBABILITY);
    }

    /// Removes `token` entirely: membership, count and probability.
    /// Returns true if it was present.
    pub fn remove_custom_word(&mut self, token: &str) -> bool {
        self.counts.remove(token);
        self.probabilities.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.probabilities.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> Vocabulary {
        Vocabulary::build(&["hello", "world", "hello", "hello"])
    }

    #[test]
    fn probabilities_sum_to_one() {
        let vocab = hello_world();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.probability("hello"), 0.75);
        assert_eq!(vocab.probability("world"), 0.25);
        let sum: f64 = vocab.words().map(|w| vocab.probability(w)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_tokens_get_the_floor() {
        let vocab = hello_world();
        assert!(!vocab.contains("helo"));
        assert_eq!(vocab.probability("helo"), PROBABILITY_FLOOR);
        assert_eq!(Vocabulary::new().probability("anything"), PROBABILITY_FLOOR);
    }

    #[test]
    fn custom_word_overrides_corpus_probability() {
        let mut vocab = hello_world();
        vocab.add_custom_word("hello");
        assert_eq!(vocab.probability("hello"), CUSTOM_WORD_PROBABILITY);

        vocab.add_custom_word("rustacean");
        assert!(vocab.contains("rustacean"));
        assert_eq!(vocab.probability("rustacean"), CUSTOM_WORD_PROBABILITY);
    }

    #[test]
    fn removal_revokes_membership_and_probability() {
        let mut vocab = hello_world();
        vocab.add_custom_word("rustacean");
        assert!(vocab.remove_custom_word("rustacean"));
        assert!(!vocab.contains("rustacean"));
        assert_eq!(vocab.probability("rustacean"), PROBABILITY_FLOOR);
        assert!(!vocab.remove_custom_word("rustacean"));

        assert!(vocab.remove_custom_word("world"));
        assert_eq!(vocab.count("world"), 0);
        assert!(!vocab.contains("world"));
    }
}
