pub mod frequency;
pub mod symspell;
