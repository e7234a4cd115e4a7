pub mod draft;

use serde::{Deserialize, Serialize};

pub const INITIAL_WEIGHT: f64 = 1.0;

/// Where a record was loaded from. Needed to write a new weight back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub source: String,
    pub lesson: String,
}

impl Origin {
    pub fn new(source: &str, lesson: &str) -> Self {
        Self {
            source: source.to_string(),
            lesson: lesson.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub original: String,
    pub translation: String,
    pub weight: f64,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub origin: Option<Origin>,
}

impl WordRecord {
    pub fn new(
        original: &str,
        translation: &str,
        source_language: &str,
        target_language: &str,
    ) -> Self {
        Self {
            original: original.to_string(),
            translation: translation.to_string(),
            weight: INITIAL_WEIGHT,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            origin: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Same `(original, translation)` pair, which is how a row is found in its lesson.
    pub fn same_entry(&self, original: &str, translation: &str) -> bool {
        self.original == original && self.translation == translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_at_initial_weight() {
        let word = WordRecord::new("hond", "dog", "Dutch", "English");
        assert_eq!(word.weight, 1.0);
        assert!(word.origin.is_none());
    }

    #[test]
    fn test_builder_sets_origin_and_weight() {
        let word = WordRecord::new("kat", "cat", "Dutch", "English")
            .with_weight(4.0)
            .with_origin(Origin::new("book", "lesson-1"));
        assert_eq!(word.weight, 4.0);
        assert_eq!(word.origin, Some(Origin::new("book", "lesson-1")));
        assert!(word.same_entry("kat", "cat"));
        assert!(!word.same_entry("kat", "Cat"));
    }
}
