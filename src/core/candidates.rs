// File: src/core/candidates.rs
//! Brute-force edit-distance candidate generation.
//!
//! This is the reference generator. The engine's default path uses the
//! symmetric-delete index in [`crate::fuzzy::symspell`] and these functions
//! serve as its oracle and as the `Exhaustive` candidate mode.

use std::collections::HashSet;

pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Every string one delete, substitution, insertion or adjacent swap away
/// from `word`. Purely syntactic: nothing here consults a vocabulary.
/// Produces O(L·A) strings for a word of length L.
pub fn edit1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = HashSet::with_capacity(n * 54 + 26);

    for i in 0..=n {
        let (left, right) = chars.split_at(i);

        if !right.is_empty() {
            // delete
            edits.insert(left.iter().chain(&right[1..]).collect());

            // substitute
            for &letter in ALPHABET {
                let c = letter as char;
                edits.insert(
                    left.iter()
                        .copied()
                        .chain(std::iter::once(c))
                        .chain(right[1..].iter().copied())
                        .collect(),
                );
            }
        }

        // swap adjacent
        if right.len() > 1 {
            edits.insert(
                left.iter()
                    .chain([right[1], right[0]].iter())
                    .chain(&right[2..])
                    .collect(),
            );
        }

        // insert
        for &letter in ALPHABET {
            let c = letter as char;
            edits.insert(
                left.iter()
                    .copied()
                    .chain(std::iter::once(c))
                    .chain(right.iter().copied())
                    .collect(),
            );
        }
    }
    edits
}

/// `edit1` applied to every member of `edit1(word)`, without deduplication.
/// Roughly (L·A)² strings; only use it on short words.
pub fn edit2(word: &str) -> Vec<String> {
    edit1(word).iter().flat_map(|e1| edit1(e1)).collect()
}

fn in_alphabet(c: char) -> bool {
    c.is_ascii() && ALPHABET.contains(&(c as u8))
}

/// True iff `candidate` is a member of `edit1(word)`, decided without
/// building the set.
pub fn is_edit1(word: &str, candidate: &str) -> bool {
    let a: Vec<char> = word.chars().collect();
    let b: Vec<char> = candidate.chars().collect();

    match b.len() as i64 - a.len() as i64 {
        0 => {
            let diffs: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
            match diffs.as_slice() {
                // substituting a letter for itself, or swapping a doubled char
                [] => a.iter().any(|&c| in_alphabet(c)) || a.windows(2).any(|w| w[0] == w[1]),
                [i] => in_alphabet(b[*i]),
                [i, j] => *j == i + 1 && a[*i] == b[*j] && a[*j] == b[*i],
                _ => false,
            }
        }
        1 => (0..b.len()).any(|k| in_alphabet(b[k]) && b[..k] == a[..k] && b[k + 1..] == a[k..]),
        -1 => (0..a.len()).any(|k| a[..k] == b[..k] && a[k + 1..] == b[k..]),
        _ => false,
    }
}

/// True iff `candidate` is in edit1(word) (∪ edit2 when `max_distance` is 2).
///
/// Candidates made only of alphabet letters are decided by Damerau-Levenshtein
/// distance. Anything else needs every inserted or substituted char to come
/// from [`ALPHABET`], so it is checked edit by edit.
pub fn within_edits(word: &str, candidate: &str, max_distance: usize) -> bool {
    if candidate.chars().all(in_alphabet) {
        return strsim::damerau_levenshtein(word, candidate) <= max_distance;
    }
    if is_edit1(word, candidate) {
        return true;
    }
    max_distance >= 2 && edit1(word).iter().any(|e| is_edit1(e, candidate))
}

/// Members of edit1 (∪ edit2 when `max_distance` is 2) accepted by
/// `is_known`, deduplicated.
///
/// Stops expanding once `max_generated` strings have been produced, so the
/// cost of long tokens stays bounded. Edit-1 hits are always complete.
pub fn known_edits<F>(word: &str, max_distance: usize, max_generated: usize, is_known: F) -> HashSet<String>
where
    F: Fn(&str) -> bool,
{
    let first = edit1(word);
    let mut known: HashSet<String> = first.iter().filter(|e| is_known(e)).cloned().collect();
    if max_distance < 2 {
        return known;
    }
    let mut generated = first.len();

    for e1 in &first {
        if generated >= max_generated {
            log::debug!(
                "Edit-2 expansion of '{}' stopped after {} candidates",
                word,
                generated
            );
            break;
        }
        let second = edit1(e1);
        generated += second.len();
        known.extend(second.into_iter().filter(|e| is_known(e)));
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit1_covers_all_four_operations() {
        let edits = edit1("helo");
        assert!(edits.contains("hello")); // insert
        assert!(edits.contains("hel")); // delete
        assert!(edits.contains("help")); // substitute
        assert!(edits.contains("hleo")); // swap
        assert!(edits.contains("helo")); // substituting a letter for itself
    }

    #[test]
    fn edit1_size_is_bounded_by_length_and_alphabet() {
        let word = "spell";
        let n = word.len();
        // deletes + swaps + substitutions + inserts, before dedup
        let upper = n + (n - 1) + 26 * n + 26 * (n + 1);
        assert!(edit1(word).len() <= upper);
    }

    #[test]
    fn edit1_of_empty_word_is_the_alphabet() {
        let edits = edit1("");
        assert_eq!(edits.len(), 26);
        assert!(edits.contains("a"));
    }

    #[test]
    fn edit2_keeps_duplicates() {
        let word = "ab";
        let all = edit2(word);
        let unique: HashSet<&String> = all.iter().collect();
        assert!(all.len() > unique.len());
        assert!(unique.contains(&"ba".to_string()));
        assert!(all.iter().any(|e| e == "abcd"));
    }

    #[test]
    fn known_edits_matches_filtered_union() {
        let vocab: HashSet<&str> = ["speling", "spelling", "spell", "sapling", "spells"]
            .into_iter()
            .collect();
        let word = "speling";
        let mut expected: HashSet<String> = edit1(word);
        expected.extend(edit2(word));
        expected.retain(|e| vocab.contains(e.as_str()));

        let got = known_edits(word, 2, usize::MAX, |e| vocab.contains(e));
        assert_eq!(got, expected);

        let near = known_edits(word, 1, usize::MAX, |e| vocab.contains(e));
        // substituting a letter for itself keeps the word
        assert_eq!(
            near,
            HashSet::from(["spelling".to_string(), "speling".to_string()])
        );
    }

    #[test]
    fn is_edit1_agrees_with_the_generated_set() {
        for word in ["helo", "mp3", "café", "a1", "11", "", "1abc"] {
            let edits = edit1(word);
            for candidate in [
                "hello", "hel", "help", "hleo", "helo", "mp", "mp3", "mpa3", "mp4", "mp33",
                "caf", "cafe", "cafée", "cfaé", "a", "1", "a1", "1a", "b1", "11", "111", "x",
                "abc1", "abc", "1abcd", "a1bc",
            ] {
                assert_eq!(
                    is_edit1(word, candidate),
                    edits.contains(candidate),
                    "{} -> {}",
                    word,
                    candidate
                );
            }
        }
    }

    #[test]
    fn within_edits_never_invents_characters_outside_the_alphabet() {
        // digits and accents can be kept or deleted, never typed
        assert!(!within_edits("mp4", "mp3", 2));
        assert!(!within_edits("cafe", "cafe2", 2));
        assert!(!within_edits("cafe", "café", 2));
        assert!(within_edits("cafe22", "cafe2", 2));
        assert!(within_edits("xafe2", "cafe2", 1));
        assert!(within_edits("cfé", "café", 1));
        // a non-letter moved three places needs an insert of that char
        assert!(!within_edits("1abc", "abc1", 2));
        assert!(within_edits("1abc", "ab1c", 2));
    }

    #[test]
    fn within_edits_matches_the_union_of_edit1_and_edit2() {
        let vocab = [
            "mp3", "mp", "cafe2", "café", "cafés", "b2b", "2b", "abc1", "ab1c", "speling", "spelling",
        ];
        for word in ["mp4", "mp33", "cafe", "cafe22", "cfé", "caf", "b2", "1abc", "speling"] {
            let mut reachable: HashSet<String> = edit1(word);
            reachable.extend(edit2(word));
            for candidate in vocab {
                for max_distance in [1, 2] {
                    let expected = if max_distance == 1 {
                        edit1(word).contains(candidate)
                    } else {
                        reachable.contains(candidate)
                    };
                    assert_eq!(
                        within_edits(word, candidate, max_distance),
                        expected,
                        "{} -> {} within {}",
                        word,
                        candidate,
                        max_distance
                    );
                }
            }
        }
    }

    #[test]
    fn known_edits_cap_keeps_edit1_hits() {
        let got = known_edits("helo", 2, 1, |e| e == "hello" || e == "hellos");
        assert!(got.contains("hello"));
        assert!(!got.contains("hellos"));
    }
}
