// File: src/core/model.rs
use crate::core::context::NgramModel;
use crate::core::vocabulary::Vocabulary;
use log::info;
use serde::{Deserialize, Serialize};

/// The corpus-derived statistics the engine ranks with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageModel {
    pub vocabulary: Vocabulary,
    pub ngrams: NgramModel,
}

impl LanguageModel {
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
        let vocabulary = Vocabulary::build(tokens);
        let ngrams = NgramModel::build(tokens);
        info!(
            "Built language model: {} words, {} bigrams, {} trigrams",
            vocabulary.len(),
            ngrams.bigram_count(),
            ngrams.trigram_count()
        );
        Self { vocabulary, ngrams }
    }
}
