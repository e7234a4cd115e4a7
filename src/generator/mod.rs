pub mod gap_test;
pub mod openai;
pub mod writing;

use anyhow::{Result, bail};

use crate::lesson::WordRecord;

pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Free-text generation used by the gap test and writing screens.
pub trait TextGenerator {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// The `original` side of every word, in working-set order.
pub fn vocabulary(words: &[WordRecord]) -> Vec<&str> {
    words.iter().map(|w| w.original.as_str()).collect()
}

/// Texts are written in the language of the first word's source side.
pub fn practice_language(words: &[WordRecord]) -> Result<&str> {
    match words.first() {
        Some(word) => Ok(&word.source_language),
        None => bail!("Selected lessons contain no words"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_and_language() {
        let words = vec![
            WordRecord::new("hond", "dog", "Dutch", "English"),
            WordRecord::new("kat", "cat", "Dutch", "English"),
        ];
        assert_eq!(vocabulary(&words), vec!["hond", "kat"]);
        assert_eq!(practice_language(&words).unwrap(), "Dutch");
        assert!(practice_language(&[]).is_err());
    }
}
