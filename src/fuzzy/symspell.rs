// File: src/fuzzy/symspell.rs
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A fuzzy lookup index based on the Symmetric Delete (SymSpell) algorithm.
/// It pre-calculates a dictionary of "deletes" for every indexed word, so a
/// lookup only generates deletes of the query and never enumerates inserts or
/// substitutions over an alphabet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteIndex {
    /// Maps a delete variant (e.g., "helo" -> "hlo") to every indexed word it
    /// could have come from.
    deletes: HashMap<String, HashSet<String>>,
    max_edit_distance: usize,
}

impl DeleteIndex {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            deletes: HashMap::new(),
            max_edit_distance,
        }
    }

    pub fn build<'a, I>(words: I, max_edit_distance: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::new(max_edit_distance);
        for word in words {
            index.add_word(word);
        }
        index
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Adds a word by generating all its delete variants up to the configured
    /// edit distance and mapping them back to the word.
    /// Complexity: O(k^d) variants for a word of length k.
    pub fn add_word(&mut self, word: &str) {
        for edit in self.generate_edits(word) {
            self.deletes
                .entry(edit)
                .or_default()
                .insert(word.to_string());
        }
    }

    pub fn remove_word(&mut self, word: &str) {
        for edit in self.generate_edits(word) {
            if let Some(words) = self.deletes.get_mut(&edit) {
                words.remove(word);
                if words.is_empty() {
                    self.deletes.remove(&edit);
                }
            }
        }
    }

    /// Every indexed word sharing a delete variant with `input`.
    ///
    /// This is a superset of the words within `max_edit_distance`; callers
    /// must verify the real distance. Complexity is independent of the number
    /// of indexed words.
    pub fn lookup(&self, input: &str) -> HashSet<String> {
        let mut candidates = HashSet::new();
        for edit in self.generate_edits(input) {
            if let Some(words) = self.deletes.get(&edit) {
                candidates.extend(words.iter().cloned());
            }
        }
        candidates
    }

    /// Generates all unique delete variants within max_edit_distance,
    /// including the string itself.
    fn generate_edits(&self, word: &str) -> HashSet<String> {
        let mut edits = HashSet::new();
        edits.insert(word.to_string()); // Distance 0

        let mut current_edits = edits.clone();

        for _ in 0..self.max_edit_distance {
            let mut next_edits = HashSet::new();
            for edit in current_edits {
                for (i, _) in edit.char_indices() {
                    let mut deleted_variant = edit.clone();
                    deleted_variant.remove(i);
                    next_edits.insert(deleted_variant);
                }
            }
            edits.extend(next_edits.iter().cloned());
            current_edits = next_edits;
        }

        edits
    }
}
