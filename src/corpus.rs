// File: src/corpus.rs
//! Turns raw text into the lower-cased token stream the models are built from.

use crate::error::Result;
use log::{info, warn};
use std::fs;
use std::path::Path;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lower-cases `text` and splits it on every non-word character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

pub fn read_corpus(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(tokenize(&text))
}

/// Concatenates the token streams of every readable corpus file.
/// Unreadable files are skipped with a warning.
pub fn load_corpora<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut tokens = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match read_corpus(path) {
            Ok(words) => {
                info!("Loaded {} tokens from {}", words.len(), path.display());
                tokens.extend(words);
            }
            Err(e) => warn!("Skipping corpus {}: {}", path.display(), e),
        }
    }
    if tokens.is_empty() {
        warn!("No corpus tokens available; the vocabulary starts empty");
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's snake_case 42."),
            vec!["hello", "world", "it", "s", "snake_case", "42"]
        );
        assert!(tokenize("  --- ").is_empty());
    }

    #[test]
    fn load_corpora_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("corpus.txt");
        let mut file = fs::File::create(&good).unwrap();
        writeln!(file, "The cat sat.").unwrap();

        let missing = dir.path().join("nope.txt");
        let tokens = load_corpora(&[missing, good]);
        assert_eq!(tokens, vec!["the", "cat", "sat"]);
    }
}
