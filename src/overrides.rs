// File: src/overrides.rs
use std::collections::{BTreeMap, BTreeSet};

/// Exact abbreviation expansions plus the set of user-added custom words.
///
/// Keys are stored lower-cased so lookups are case-insensitive. The registry
/// only tracks membership; giving custom words their probability is the
/// vocabulary's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideRegistry {
    shortcuts: BTreeMap<String, String>,
    custom_words: BTreeSet<String>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(shortcuts: BTreeMap<String, String>, custom_words: BTreeSet<String>) -> Self {
        let shortcuts = shortcuts
            .into_iter()
            .map(|(short, full)| (short.to_lowercase(), full.to_lowercase()))
            .collect();
        let custom_words = custom_words.into_iter().map(|w| w.to_lowercase()).collect();
        Self {
            shortcuts,
            custom_words,
        }
    }

    pub fn lookup_shortcut(&self, token: &str) -> Option<&str> {
        self.shortcuts
            .get(&token.to_lowercase())
            .map(String::as_str)
    }

    pub fn is_shortcut(&self, token: &str) -> bool {
        self.shortcuts.contains_key(&token.to_lowercase())
    }

    /// Stores or overwrites the expansion of `short`. Returns the previous
    /// expansion, if any.
    pub fn add_shortcut(&mut self, short: &str, full: &str) -> Option<String> {
        self.shortcuts
            .insert(short.to_lowercase(), full.to_lowercase())
    }

    /// True iff a mapping existed and was removed.
    pub fn remove_shortcut(&mut self, short: &str) -> bool {
        self.shortcuts.remove(&short.to_lowercase()).is_some()
    }

    pub fn shortcuts(&self) -> &BTreeMap<String, String> {
        &self.shortcuts
    }

    pub fn is_custom_word(&self, token: &str) -> bool {
        self.custom_words.contains(token)
    }

    /// Returns true if the word was not registered before.
    pub fn add_custom_word(&mut self, token: &str) -> bool {
        self.custom_words.insert(token.to_lowercase())
    }

    pub fn remove_custom_word(&mut self, token: &str) -> bool {
        self.custom_words.remove(&token.to_lowercase())
    }

    pub fn custom_words(&self) -> &BTreeSet<String> {
        &self.custom_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_are_case_insensitive() {
        let mut registry = OverrideRegistry::new();
        assert_eq!(registry.add_shortcut("BTW", "By The Way"), None);
        assert_eq!(registry.lookup_shortcut("btw"), Some("by the way"));
        assert_eq!(registry.lookup_shortcut("Btw"), Some("by the way"));
        assert!(registry.is_shortcut("BtW"));
        assert!(!registry.is_shortcut("bt"));
    }

    #[test]
    fn shortcut_add_overwrites_and_remove_is_idempotent() {
        let mut registry = OverrideRegistry::new();
        registry.add_shortcut("tmrw", "tomorow");
        assert_eq!(
            registry.add_shortcut("tmrw", "tomorrow"),
            Some("tomorow".to_string())
        );
        assert_eq!(registry.lookup_shortcut("tmrw"), Some("tomorrow"));
        assert_eq!(registry.shortcuts().len(), 1);

        assert!(registry.remove_shortcut("TMRW"));
        assert!(!registry.remove_shortcut("tmrw"));
        assert!(registry.lookup_shortcut("tmrw").is_none());
    }

    #[test]
    fn custom_words_are_a_set() {
        let mut registry = OverrideRegistry::new();
        assert!(registry.add_custom_word("Rahul"));
        assert!(!registry.add_custom_word("rahul"));
        assert!(registry.is_custom_word("rahul"));
        assert!(registry.remove_custom_word("rahul"));
        assert!(!registry.remove_custom_word("rahul"));
        assert!(registry.custom_words().is_empty());
    }

    #[test]
    fn from_parts_normalizes_case() {
        let shortcuts = BTreeMap::from([("PLS".to_string(), "Please".to_string())]);
        let words = BTreeSet::from(["Kohli".to_string()]);
        let registry = OverrideRegistry::from_parts(shortcuts, words);
        assert_eq!(registry.lookup_shortcut("pls"), Some("please"));
        assert!(registry.is_custom_word("kohli"));
    }
}
