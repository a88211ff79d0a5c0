// File: src/config.rs
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Probability substituted for unseen tokens before any logarithm is taken.
pub const PROBABILITY_FLOOR: f64 = 1e-9;
/// Fixed probability given to user-added custom words.
pub const CUSTOM_WORD_PROBABILITY: f64 = 0.001;
/// Lowest ceiling a perfect acceptance rate is clamped to so the feedback
/// bonus stays finite. The ceiling rises with the number of observations.
pub const MAX_ACCEPTANCE_RATE: f64 = 0.999;

const DEFAULT_TOP_K: usize = 5;
const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;
const DEFAULT_MAX_GENERATED_CANDIDATES: usize = 200_000;
const DEFAULT_CONTEXT_WINDOW: usize = 2;

/// Tokens whose correct spelling depends on the surrounding words.
const DEFAULT_CONFUSABLES: &[&str] = &[
    "there", "their", "they're", "your", "you're", "its", "it's", "to", "too", "two", "where",
    "wear", "were", "here", "hear", "right", "write", "know", "no", "new", "knew",
];

/// How candidates are ranked once they have been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Only shortcuts and exact vocabulary hits; no fuzzy search.
    ExactOnly,
    /// Structural cost plus unigram probability.
    ContextFree,
    /// Always add the bigram/trigram penalty.
    ContextAware,
    /// Context weighting only for tokens in the confusables table.
    #[default]
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::ExactOnly,
        Strategy::ContextFree,
        Strategy::ContextAware,
        Strategy::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ExactOnly => "exact_only",
            Strategy::ContextFree => "context_free",
            Strategy::ContextAware => "context_aware",
            Strategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "exact_only" | "exact" => Ok(Strategy::ExactOnly),
            "context_free" | "plain" => Ok(Strategy::ContextFree),
            "context_aware" | "context" => Ok(Strategy::ContextAware),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Where fuzzy candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMode {
    /// Symmetric-delete index over the vocabulary.
    #[default]
    Indexed,
    /// Brute-force edit1 ∪ edit2 expansion, capped by `max_generated_candidates`.
    Exhaustive,
}

/// Tunable coefficients of the composite score. Lower scores rank higher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub replace: f64,
    pub insert: f64,
    pub delete: f64,
    pub transpose: f64,
    pub bigram: f64,
    pub trigram: f64,
    pub feedback: f64,
    /// Added to the score of registered custom words; negative means preferred.
    pub custom_word_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            replace: 1.0,
            insert: 2.0,
            delete: 3.0,
            transpose: 4.0,
            bigram: 2.0,
            trigram: 3.0,
            feedback: 1.5,
            custom_word_bonus: -3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: Strategy,
    pub top_k: usize,
    pub max_edit_distance: usize,
    pub candidate_mode: CandidateMode,
    pub max_generated_candidates: usize,
    pub context_window: usize,
    pub weights: ScoringWeights,
    pub confusables: BTreeSet<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            top_k: DEFAULT_TOP_K,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            candidate_mode: CandidateMode::default(),
            max_generated_candidates: DEFAULT_MAX_GENERATED_CANDIDATES,
            context_window: DEFAULT_CONTEXT_WINDOW,
            weights: ScoringWeights::default(),
            confusables: DEFAULT_CONFUSABLES.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::config("top_k must be at least 1"));
        }
        if !(1..=2).contains(&self.max_edit_distance) {
            return Err(Error::config(format!(
                "max_edit_distance must be 1 or 2, got {}",
                self.max_edit_distance
            )));
        }
        Ok(())
    }

    pub fn is_confusable(&self, token: &str) -> bool {
        self.confusables.contains(token)
    }
}
