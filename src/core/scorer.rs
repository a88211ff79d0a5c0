// File: src/core/scorer.rs
use crate::config::{ScoringWeights, PROBABILITY_FLOOR};
use crate::core::types::EditKind;

/// Length of the shared prefix of two strings, in chars.
pub fn common_prefix_length(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Classifies `candidate` against `original` by their length difference.
/// Anything other than 0 or ±1 lands in the transpose bucket.
pub fn classify(candidate: &str, original: &str) -> EditKind {
    let c = candidate.chars().count() as i64;
    let o = original.chars().count() as i64;
    match c - o {
        0 => EditKind::Replace,
        1 => EditKind::Insert,
        -1 => EditKind::Delete,
        _ => EditKind::Transpose,
    }
}

/// Weighted Levenshtein cost of turning `original` into `candidate`.
///
/// Replace and insert candidates also pay one point per character of
/// `original` past the shared prefix.
pub fn structural_score(candidate: &str, original: &str, weights: &ScoringWeights) -> (EditKind, f64) {
    let distance = strsim::levenshtein(candidate, original) as f64;
    let kind = classify(candidate, original);
    let prefix_deficit = || {
        (original.chars().count() - common_prefix_length(candidate, original)) as f64
    };
    let score = match kind {
        EditKind::Replace => distance * weights.replace + prefix_deficit(),
        EditKind::Insert => distance * weights.insert + prefix_deficit(),
        EditKind::Delete => distance * weights.delete,
        EditKind::Transpose => distance * weights.transpose,
    };
    (kind, score)
}

/// -ln(p), with p floored so unseen tokens never produce an infinite penalty.
pub fn unigram_penalty(probability: f64) -> f64 {
    -probability.max(PROBABILITY_FLOOR).ln()
}

/// Structural score plus the unigram penalty of the candidate.
pub fn combined_score(candidate: &str, original: &str, probability: f64, weights: &ScoringWeights) -> f64 {
    structural_score(candidate, original, weights).1 + unigram_penalty(probability)
}
