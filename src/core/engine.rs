use crate::config::{CandidateMode, EngineConfig, Strategy};
use crate::core::candidates::{known_edits, within_edits};
use crate::core::model::LanguageModel;
use crate::core::scorer::{structural_score, unigram_penalty};
use crate::core::types::{CorrectionCandidate, EngineStats, Suggestion, SuggestionSource};
use crate::error::{Error, Result};
use crate::fuzzy::frequency::ApproximateDictionary;
use crate::fuzzy::symspell::DeleteIndex;
use crate::learning::FeedbackStore;
use crate::overrides::OverrideRegistry;
use crate::persistence::{ShortcutMap, Store, UserProfile};
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashSet};

// The correction engine composes the language model with the user's
// overrides and feedback. It exclusively owns all of that state.
pub struct Autocorrector {
    model: LanguageModel,
    overrides: OverrideRegistry,
    feedback: FeedbackStore,
    /// Present only in `CandidateMode::Indexed`.
    index: Option<DeleteIndex>,
    approximate: Option<Box<dyn ApproximateDictionary>>,
    store: Box<dyn Store>,
    config: EngineConfig,
    revision: u64,
}

impl Autocorrector {
    /// Builds the engine and restores what `store` holds. Unreadable store
    /// documents are replaced by empty state with a warning.
    pub fn new(mut model: LanguageModel, config: EngineConfig, store: Box<dyn Store>) -> Result<Self> {
        config.validate()?;

        let profile = match store.load_profile() {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                warn!("Could not load custom words, starting empty: {}", e);
                UserProfile::default()
            }
        };
        let shortcuts = match store.load_shortcuts() {
            Ok(shortcuts) => shortcuts.unwrap_or_default(),
            Err(e) => {
                warn!("Could not load shortcuts, starting empty: {}", e);
                ShortcutMap::new()
            }
        };

        let overrides = OverrideRegistry::from_parts(shortcuts, profile.words);
        for word in overrides.custom_words() {
            model.vocabulary.add_custom_word(word);
        }

        let index = match config.candidate_mode {
            CandidateMode::Indexed => Some(DeleteIndex::build(
                model.vocabulary.words(),
                config.max_edit_distance,
            )),
            CandidateMode::Exhaustive => None,
        };

        info!(
            "Autocorrector ready: {} words, {} custom words, {} shortcuts, strategy {}",
            model.vocabulary.len(),
            overrides.custom_words().len(),
            overrides.shortcuts().len(),
            config.strategy
        );

        Ok(Self {
            model,
            overrides,
            feedback: profile.feedback,
            index,
            approximate: None,
            store,
            config,
            revision: 0,
        })
    }

    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], config: EngineConfig, store: Box<dyn Store>) -> Result<Self> {
        Self::new(LanguageModel::build(tokens), config, store)
    }

    /// Attaches a fallback source consulted when the vocabulary has no candidate.
    pub fn with_approximate_dictionary(mut self, dictionary: Box<dyn ApproximateDictionary>) -> Self {
        self.approximate = Some(dictionary);
        self
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Ranked corrections for `word`, given the words typed before it.
    ///
    /// Terminal states, in order: shortcut expansion, known word, scored
    /// vocabulary candidates, approximate-dictionary hits, and finally the
    /// word itself with probability 0. Returns nothing for a blank word.
    pub fn suggest(&self, preceding: &[&str], word: &str) -> Vec<Suggestion> {
        let word = normalize(word);
        if word.is_empty() {
            return vec![];
        }

        if let Some(expansion) = self.overrides.lookup_shortcut(&word) {
            debug!("'{}' is a shortcut for '{}'", word, expansion);
            return vec![Suggestion::new(expansion, 1.0, 1.0, SuggestionSource::Shortcut)];
        }

        if self.model.vocabulary.contains(&word) {
            let probability = self.model.vocabulary.probability(&word);
            return vec![Suggestion::new(word, probability, 1.0, SuggestionSource::Known)];
        }

        if self.config.strategy == Strategy::ExactOnly {
            return vec![Suggestion::no_suggestion(&word)];
        }

        let context = self.context_window(preceding);
        let ranked = self.rank(&context, &word);
        if !ranked.is_empty() {
            return ranked
                .into_iter()
                .take(self.config.top_k)
                .map(|candidate| {
                    let probability = self.model.vocabulary.probability(&candidate.token);
                    let context_probability = self
                        .model
                        .ngrams
                        .context_probability(&candidate.token, &context);
                    Suggestion::new(
                        candidate.token,
                        probability,
                        context_probability,
                        SuggestionSource::Corrected,
                    )
                })
                .collect();
        }

        if let Some(suggestions) = self.approximate_suggestions(&context, &word) {
            return suggestions;
        }

        debug!("No suggestion found for '{}'", word);
        vec![Suggestion::no_suggestion(&word)]
    }

    /// Every scored vocabulary candidate for `word`, best first, without the
    /// top-k cut. Empty for shortcuts and known words.
    pub fn candidates(&self, preceding: &[&str], word: &str) -> Vec<CorrectionCandidate> {
        let word = normalize(word);
        if word.is_empty()
            || self.overrides.is_shortcut(&word)
            || self.model.vocabulary.contains(&word)
        {
            return vec![];
        }
        let context = self.context_window(preceding);
        self.rank(&context, &word)
    }

    fn rank(&self, context: &[String], word: &str) -> Vec<CorrectionCandidate> {
        let found = self.known_candidates(word);
        let use_context = self.uses_context(word, context);
        debug!(
            "{} vocabulary candidates for '{}' (context: {})",
            found.len(),
            word,
            use_context
        );

        let mut scored: Vec<CorrectionCandidate> = found
            .into_iter()
            .map(|token| self.score(token, word, context, use_context))
            .collect();
        // Ties break alphabetically so the ranking never depends on hash order.
        scored.sort_by(|a, b| {
            a.score()
                .total_cmp(&b.score())
                .then_with(|| a.token.cmp(&b.token))
        });
        scored
    }

    fn score(&self, token: String, word: &str, context: &[String], use_context: bool) -> CorrectionCandidate {
        let weights = &self.config.weights;
        let (kind, structural) = structural_score(&token, word, weights);
        let unigram = unigram_penalty(self.model.vocabulary.probability(&token));
        let context = if use_context {
            self.model.ngrams.context_score(&token, context, weights)
        } else {
            0.0
        };
        let feedback = -self.feedback.bonus(word, &token, weights.feedback);
        let custom_bonus = if self.overrides.is_custom_word(&token) {
            weights.custom_word_bonus
        } else {
            0.0
        };
        CorrectionCandidate {
            token,
            kind,
            structural,
            unigram,
            context,
            feedback,
            custom_bonus,
        }
    }

    fn known_candidates(&self, word: &str) -> HashSet<String> {
        let max_distance = self.config.max_edit_distance;
        match &self.index {
            Some(index) => index
                .lookup(word)
                .into_iter()
                .filter(|candidate| within_edits(word, candidate, max_distance))
                .collect(),
            None => known_edits(
                word,
                max_distance,
                self.config.max_generated_candidates,
                |candidate| self.model.vocabulary.contains(candidate),
            ),
        }
    }

    fn uses_context(&self, word: &str, context: &[String]) -> bool {
        if context.is_empty() {
            return false;
        }
        match self.config.strategy {
            Strategy::ContextAware => true,
            Strategy::Hybrid => self.config.is_confusable(word),
            Strategy::ContextFree | Strategy::ExactOnly => false,
        }
    }

    fn approximate_suggestions(&self, context: &[String], word: &str) -> Option<Vec<Suggestion>> {
        let dictionary = self.approximate.as_ref()?;
        let hits = dictionary.lookup(word, self.config.top_k);
        if hits.is_empty() {
            return None;
        }
        let total = dictionary.total_count().max(1) as f64;
        Some(
            hits.into_iter()
                .map(|(term, count)| {
                    let context_probability = self.model.ngrams.context_probability(&term, context);
                    Suggestion::new(
                        term,
                        count as f64 / total,
                        context_probability,
                        SuggestionSource::Approximate,
                    )
                })
                .collect(),
        )
    }

    /// The trailing `context_window` non-blank tokens, normalized.
    fn context_window(&self, preceding: &[&str]) -> Vec<String> {
        let tokens: Vec<String> = preceding
            .iter()
            .map(|t| normalize(t))
            .filter(|t| !t.is_empty())
            .collect();
        let skip = tokens.len().saturating_sub(self.config.context_window);
        tokens.into_iter().skip(skip).collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.model.vocabulary.contains(&normalize(word))
    }

    pub fn probability(&self, word: &str) -> f64 {
        self.model.vocabulary.probability(&normalize(word))
    }

    pub fn add_custom_word(&mut self, word: &str) -> Result<()> {
        let word = require_token(word)?;
        self.insert_custom_word(&word);
        self.revision += 1;
        self.persist_profile()
    }

    /// Adds every word, persisting once. Returns how many were new.
    pub fn add_custom_words<I, S>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for word in words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }
            if self.insert_custom_word(&word) {
                added += 1;
            }
        }
        if added == 0 {
            return Ok(0);
        }
        self.revision += 1;
        self.persist_profile()?;
        Ok(added)
    }

    fn insert_custom_word(&mut self, word: &str) -> bool {
        let added = self.overrides.add_custom_word(word);
        self.model.vocabulary.add_custom_word(word);
        if let Some(index) = self.index.as_mut() {
            index.add_word(word);
        }
        info!("Added custom word: {}", word);
        added
    }

    /// Revokes a custom word's membership and probability. Returns false if
    /// `word` was not a registered custom word.
    pub fn remove_custom_word(&mut self, word: &str) -> Result<bool> {
        let word = require_token(word)?;
        if !self.overrides.remove_custom_word(&word) {
            return Ok(false);
        }
        self.model.vocabulary.remove_custom_word(&word);
        if let Some(index) = self.index.as_mut() {
            index.remove_word(&word);
        }
        info!("Removed custom word: {}", word);
        self.revision += 1;
        self.persist_profile()?;
        Ok(true)
    }

    /// Maps `short` to `full`, overwriting any earlier expansion. An expansion
    /// missing from the vocabulary becomes a custom word.
    pub fn add_shortcut(&mut self, short: &str, full: &str) -> Result<()> {
        let short = require_token(short)?;
        let full = require_token(full)?;

        self.overrides.add_shortcut(&short, &full);
        let profile_saved = if self.model.vocabulary.contains(&full) {
            Ok(())
        } else {
            self.insert_custom_word(&full);
            self.persist_profile()
        };
        info!("Added shortcut: '{}' -> '{}'", short, full);
        self.revision += 1;
        // Both documents are attempted; the first failure is reported.
        let shortcuts_saved = self.persist_shortcuts();
        profile_saved.and(shortcuts_saved)
    }

    /// True iff a mapping existed and was removed.
    pub fn remove_shortcut(&mut self, short: &str) -> Result<bool> {
        if !self.overrides.remove_shortcut(short.trim()) {
            return Ok(false);
        }
        info!("Removed shortcut: '{}'", short.trim());
        self.revision += 1;
        self.persist_shortcuts()?;
        Ok(true)
    }

    pub fn record_feedback(&mut self, original: &str, suggested: &str, accepted: bool) -> Result<()> {
        let original = require_token(original)?;
        let suggested = require_token(suggested)?;
        self.feedback.record(&original, &suggested, accepted);
        debug!(
            "Feedback for '{}' -> '{}': {}",
            original,
            suggested,
            if accepted { "accepted" } else { "rejected" }
        );
        self.revision += 1;
        self.persist_profile()
    }

    pub fn acceptance_rate(&self, original: &str, suggested: &str) -> Option<f64> {
        self.feedback
            .acceptance_rate(&normalize(original), &normalize(suggested))
    }

    pub fn shortcut_expansion(&self, token: &str) -> Option<&str> {
        self.overrides.lookup_shortcut(token.trim())
    }

    pub fn is_shortcut(&self, token: &str) -> bool {
        self.overrides.is_shortcut(token.trim())
    }

    pub fn shortcuts(&self) -> &ShortcutMap {
        self.overrides.shortcuts()
    }

    pub fn custom_words(&self) -> &BTreeSet<String> {
        self.overrides.custom_words()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            vocabulary_size: self.model.vocabulary.len(),
            bigram_count: self.model.ngrams.bigram_count(),
            trigram_count: self.model.ngrams.trigram_count(),
            custom_word_count: self.overrides.custom_words().len(),
            shortcut_count: self.overrides.shortcuts().len(),
            feedback_entry_count: self.feedback.len(),
        }
    }

    fn persist_profile(&mut self) -> Result<()> {
        let profile = UserProfile {
            words: self.overrides.custom_words().clone(),
            feedback: self.feedback.clone(),
        };
        self.store.save_profile(&profile).map_err(|e| {
            error!("Could not save custom words: {}", e);
            e
        })
    }

    fn persist_shortcuts(&mut self) -> Result<()> {
        let shortcuts = self.overrides.shortcuts().clone();
        self.store.save_shortcuts(&shortcuts).map_err(|e| {
            error!("Could not save shortcuts: {}", e);
            e
        })
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

fn require_token(token: &str) -> Result<String> {
    let token = normalize(token);
    if token.is_empty() {
        return Err(Error::invalid_input("token must not be empty"));
    }
    Ok(token)
}
