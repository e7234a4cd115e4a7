use anyhow::{Result, bail};

use crate::lesson::WordRecord;
use crate::store::LessonStore;

/// A lesson being authored. Nothing is written until `save`.
#[derive(Clone, Debug, Default)]
pub struct LessonDraft {
    pub source_name: String,
    pub title: String,
    pub source_language: String,
    pub target_language: String,
    pub words: Vec<WordRecord>,
}

impl LessonDraft {
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            ..Self::default()
        }
    }

    /// Languages cannot change once the draft holds words.
    pub fn languages_locked(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn set_languages(&mut self, source_language: &str, target_language: &str) -> bool {
        if self.languages_locked() {
            return false;
        }
        self.source_language = source_language.to_string();
        self.target_language = target_language.to_string();
        true
    }

    pub fn add_word(&mut self, word: &str, translation: &str) -> Result<&WordRecord> {
        let word = word.trim();
        let translation = translation.trim();
        if word.is_empty() || translation.is_empty() {
            bail!("Please enter both the word and its translation");
        }
        self.words.push(WordRecord::new(
            word,
            translation,
            &self.source_language,
            &self.target_language,
        ));
        Ok(&self.words[self.words.len() - 1])
    }

    pub fn remove(&mut self, index: usize) -> Option<WordRecord> {
        if index < self.words.len() {
            Some(self.words.remove(index))
        } else {
            None
        }
    }

    /// Write the draft through `store`, then reset it. Languages are kept
    /// so the next lesson starts with the same pair.
    pub fn save(&mut self, store: &dyn LessonStore) -> Result<()> {
        let source_name = self.source_name.trim();
        let title = self.title.trim();
        if source_name.is_empty() {
            bail!("Please enter a source name");
        }
        if title.is_empty() {
            bail!("Please enter a lesson title");
        }
        if self.words.is_empty() {
            bail!("No words to save");
        }

        store.save_lesson(source_name, title, &self.words)?;
        log::info!(
            "saved lesson {source_name}/{title} with {} words",
            self.words.len()
        );

        self.words.clear();
        self.source_name.clear();
        self.title.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::csv_store::CsvLessonStore;
    use tempfile::TempDir;

    #[test]
    fn test_add_word_trims_and_locks_languages() {
        let mut draft = LessonDraft::new("Dutch", "English");
        assert!(!draft.languages_locked());

        let word = draft.add_word("  hond ", " dog").unwrap();
        assert_eq!(word.original, "hond");
        assert_eq!(word.translation, "dog");
        assert_eq!(word.weight, 1.0);
        assert_eq!(word.source_language, "Dutch");

        assert!(draft.languages_locked());
        assert!(!draft.set_languages("French", "English"));
        assert_eq!(draft.source_language, "Dutch");
    }

    #[test]
    fn test_add_word_rejects_blank_fields() {
        let mut draft = LessonDraft::new("Dutch", "English");
        assert!(draft.add_word("hond", "   ").is_err());
        assert!(draft.add_word("", "dog").is_err());
        assert!(draft.words.is_empty());
    }

    #[test]
    fn test_removing_last_word_unlocks_languages() {
        let mut draft = LessonDraft::new("Dutch", "English");
        draft.add_word("hond", "dog").unwrap();
        assert_eq!(draft.remove(0).map(|w| w.original), Some("hond".to_string()));
        assert!(draft.remove(0).is_none());
        assert!(draft.set_languages("Spanish", "English"));
    }

    #[test]
    fn test_save_validates_then_clears() {
        let dir = TempDir::new().unwrap();
        let store = CsvLessonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut draft = LessonDraft::new("Dutch", "English");

        let err = draft.save(&store).unwrap_err().to_string();
        assert!(err.contains("source name"));

        draft.source_name = "textbook".to_string();
        assert!(draft.save(&store).unwrap_err().to_string().contains("lesson title"));

        draft.title = "chapter 1".to_string();
        assert!(draft.save(&store).unwrap_err().to_string().contains("No words"));

        draft.add_word("hond", "dog").unwrap();
        draft.save(&store).unwrap();
        assert!(draft.words.is_empty());
        assert!(draft.title.is_empty());
        assert_eq!(draft.source_language, "Dutch");

        assert_eq!(store.lessons("textbook").unwrap(), vec!["chapter 1".to_string()]);
    }
}
