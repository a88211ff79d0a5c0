// File: src/learning.rs
use crate::config::MAX_ACCEPTANCE_RATE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How often the user took or dismissed one suggested correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub accepted: u64,
    pub rejected: u64,
}

impl FeedbackRecord {
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected
    }

    /// accepted / total, or `None` before any observation.
    pub fn acceptance_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.accepted as f64 / total as f64),
        }
    }
}

/// Clamp applied to a perfect acceptance rate after `total` observations.
///
/// (total + 0.5) / (total + 1) lies above (total - 1) / total, the highest
/// rate below 1, so only a rate of exactly 1 is ever clamped.
fn rate_ceiling(total: u64) -> f64 {
    let total = total as f64;
    MAX_ACCEPTANCE_RATE.max((total + 0.5) / (total + 1.0))
}

/// Acceptance/rejection counters keyed by original token, then suggestion.
/// Serializes as `{original: {suggested: {accepted, rejected}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackStore {
    records: BTreeMap<String, BTreeMap<String, FeedbackRecord>>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, original: &str, suggested: &str, accepted: bool) {
        let record = self
            .records
            .entry(original.to_string())
            .or_default()
            .entry(suggested.to_string())
            .or_default();
        if accepted {
            record.accepted += 1;
        } else {
            record.rejected += 1;
        }
    }

    pub fn get(&self, original: &str, suggested: &str) -> Option<&FeedbackRecord> {
        self.records.get(original)?.get(suggested)
    }

    pub fn acceptance_rate(&self, original: &str, suggested: &str) -> Option<f64> {
        self.get(original, suggested)?.acceptance_rate()
    }

    /// -ln(1 - rate) scaled by `coefficient`. Zero without observations.
    ///
    /// The magnitude grows as the user keeps accepting the correction; the
    /// scorer subtracts it so confirmed corrections rise to the top.
    pub fn bonus(&self, original: &str, suggested: &str, coefficient: f64) -> f64 {
        match self.get(original, suggested) {
            Some(record) => match record.acceptance_rate() {
                Some(rate) => -(1.0 - rate.min(rate_ceiling(record.total()))).ln() * coefficient,
                None => 0.0,
            },
            None => 0.0,
        }
    }

    /// Number of original tokens with at least one record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
