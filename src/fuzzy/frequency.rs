// File: src/fuzzy/frequency.rs
use crate::error::Result;
use crate::fuzzy::symspell::DeleteIndex;
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An alternate suggestion source backed by precomputed word frequencies.
pub trait ApproximateDictionary {
    /// Ranked `(candidate, frequency)` pairs for `token`, at most `limit`.
    fn lookup(&self, token: &str, limit: usize) -> Vec<(String, u64)>;

    /// Sum of all frequencies, used to turn a frequency into a probability.
    fn total_count(&self) -> u64;
}

/// A `term count` frequency list indexed for edit-distance lookup.
pub struct FrequencyDictionary {
    counts: HashMap<String, u64>,
    total: u64,
    index: DeleteIndex,
}

impl FrequencyDictionary {
    pub fn from_entries<I>(entries: I, max_edit_distance: usize) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for (term, count) in entries {
            *counts.entry(term.to_lowercase()).or_insert(0) += count;
        }
        let total = counts.values().sum();
        let index = DeleteIndex::build(counts.keys().map(String::as_str), max_edit_distance);
        Self {
            counts,
            total,
            index,
        }
    }

    /// Reads one `term count` pair per line. Lines that do not parse are skipped.
    pub fn load(path: &Path, max_edit_distance: usize) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next().and_then(|c| c.parse::<u64>().ok())) {
                (Some(term), Some(count)) => entries.push((term.to_string(), count)),
                (None, _) => {}
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {} malformed lines in {}", skipped, path.display());
        }
        let dictionary = Self::from_entries(entries, max_edit_distance);
        info!(
            "Loaded frequency dictionary {} with {} terms",
            path.display(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// Like [`FrequencyDictionary::load`], but a missing or unreadable file
    /// only produces a warning.
    pub fn load_optional(path: &Path, max_edit_distance: usize) -> Option<Self> {
        match Self::load(path, max_edit_distance) {
            Ok(dictionary) => Some(dictionary),
            Err(e) => {
                warn!("Frequency dictionary {} unavailable: {}", path.display(), e);
                None
            }
        }
    }

    pub fn count(&self, term: &str) -> Option<u64> {
        self.counts.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl ApproximateDictionary for FrequencyDictionary {
    /// Closest terms first, then the more frequent, then alphabetical.
    fn lookup(&self, token: &str, limit: usize) -> Vec<(String, u64)> {
        let token = token.to_lowercase();
        let max = self.index.max_edit_distance();
        let mut hits: Vec<(usize, String, u64)> = self
            .index
            .lookup(&token)
            .into_iter()
            .filter_map(|term| {
                let distance = strsim::damerau_levenshtein(&term, &token);
                if distance > max {
                    return None;
                }
                let count = self.counts.get(&term).copied().unwrap_or(0);
                Some((distance, term, count))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)).then(a.1.cmp(&b.1)));
        hits.into_iter()
            .take(limit)
            .map(|(_, term, count)| (term, count))
            .collect()
    }

    fn total_count(&self) -> u64 {
        self.total
    }
}
