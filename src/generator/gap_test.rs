use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::generator::{DEFAULT_MAX_TOKENS, TextGenerator, practice_language, vocabulary};
use crate::lesson::WordRecord;
use crate::scheduler::update::answers_match;

pub const BLANK: &str = "____";
const MIN_WORDS: usize = 5;
const MAX_WORDS: usize = 10;

/// A generated text with blanks, and the words that fill them in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GapText {
    #[serde(default)]
    pub gap_text: String,
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlankResult {
    /// 1-based, as shown to the user.
    pub blank: usize,
    pub answer: String,
    pub expected: String,
    pub correct: bool,
}

pub fn prompt(words: &[WordRecord]) -> Result<String> {
    let language = practice_language(words)?;
    let vocabulary = vocabulary(words).join(", ");
    Ok(format!(
        "Write a coherent text in {language} that includes minimum {MIN_WORDS} to maximum \
         {MAX_WORDS} of the following words or phrases:\n{vocabulary}.\n\
         Replace these words with blanks '{BLANK}' in the text. \
         Return the response in json format, with the key 'gap_text' and the value as your \
         text with the gaps. The key 'words' should contain a list of the words that should \
         be filled in the blanks in the order of the list. \
         An example response from you would be: \
         {{\"gap_text\": \"This is a {BLANK} example.\", \"words\": [\"great\"]}}. \
         Make sure it is always in this format. \
         Please note that the text should be coherent and make sense. The sentences should \
         be more or less related to each other. \
         Return only the json response. Do not include any other text. \
         It should start with '{{' and end with '}}'"
    ))
}

/// The span from the first `{` to the last `}`. Models like to wrap JSON in
/// code fences or chatter.
pub fn extract_json(response: &str) -> Result<&str> {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&response[start..=end]),
        _ => bail!("No valid JSON found in the response"),
    }
}

impl GapText {
    pub fn parse(response: &str) -> Result<Self> {
        let json = extract_json(response)?;
        let gap_text: GapText = serde_json::from_str(json).context("Error decoding gap text")?;
        if gap_text.blank_count() == 0 {
            bail!("The generated text has no blanks");
        }
        Ok(gap_text)
    }

    pub fn generate(generator: &dyn TextGenerator, words: &[WordRecord]) -> Result<Self> {
        let prompt = prompt(words)?;
        let response = generator
            .generate(&prompt, DEFAULT_MAX_TOKENS)
            .context("Failed to generate gap text")?;
        let gap_text = Self::parse(&response)?;
        if gap_text.words.len() != gap_text.blank_count() {
            log::warn!(
                "gap text has {} blanks but {} answers",
                gap_text.blank_count(),
                gap_text.words.len()
            );
        }
        Ok(gap_text)
    }

    pub fn blank_count(&self) -> usize {
        self.gap_text.matches(BLANK).count()
    }

    /// Text pieces around the blanks; always `blank_count() + 1` long.
    pub fn segments(&self) -> Vec<&str> {
        self.gap_text.split(BLANK).collect()
    }

    /// One result per blank in the text. A blank with no expected word is
    /// never correct; expected words past the last blank are ignored.
    pub fn score(&self, answers: &[String]) -> Vec<BlankResult> {
        (0..self.blank_count())
            .map(|i| {
                let answer = answers.get(i).map_or("", |a| a.trim());
                let expected = self.words.get(i);
                BlankResult {
                    blank: i + 1,
                    answer: answer.to_string(),
                    expected: expected.cloned().unwrap_or_default(),
                    correct: expected.is_some_and(|e| answers_match(answer, e)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct CannedGenerator {
        response: String,
        prompts: RefCell<Vec<String>>,
    }

    impl TextGenerator for CannedGenerator {
        fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    fn lesson() -> Vec<WordRecord> {
        vec![
            WordRecord::new("hond", "dog", "Dutch", "English"),
            WordRecord::new("fiets", "bike", "Dutch", "English"),
        ]
    }

    #[test]
    fn test_prompt_mentions_language_and_words() {
        let text = prompt(&lesson()).unwrap();
        assert!(text.contains("in Dutch"));
        assert!(text.contains("hond, fiets."));
        assert!(text.contains(r#"{"gap_text": "This is a ____ example.", "words": ["great"]}"#));
    }

    #[test]
    fn test_extract_json_strips_fences() {
        let response = "```json\n{\"gap_text\": \"a ____\", \"words\": [\"b\"]}\n```";
        assert_eq!(
            extract_json(response).unwrap(),
            "{\"gap_text\": \"a ____\", \"words\": [\"b\"]}"
        );
        assert!(extract_json("no json here").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn test_parse_and_segments() {
        let response = r#"{"gap_text": "De ____ rijdt op de ____.", "words": ["hond", "fiets"]}"#;
        let gap = GapText::parse(response).unwrap();
        assert_eq!(gap.blank_count(), 2);
        assert_eq!(gap.segments(), vec!["De ", " rijdt op de ", "."]);
    }

    #[test]
    fn test_parse_rejects_text_without_blanks() {
        assert!(GapText::parse(r#"{"gap_text": "Geen gaten.", "words": []}"#).is_err());
        assert!(GapText::parse(r#"{"gap_text": 3}"#).is_err());
    }

    #[test]
    fn test_score_compares_like_flashcards() {
        let gap = GapText {
            gap_text: "De ____ en de ____.".to_string(),
            words: vec!["hond".to_string(), "fiets".to_string()],
        };
        let results = gap.score(&[" Hond ".to_string(), "auto".to_string()]);
        assert_eq!(results.len(), 2);
        assert!(results[0].correct);
        assert_eq!(results[0].answer, "Hond");
        assert!(!results[1].correct);
        assert_eq!(results[1].blank, 2);
        assert_eq!(results[1].expected, "fiets");
    }

    #[test]
    fn test_score_counts_blanks_without_expected_word() {
        let gap = GapText {
            gap_text: "De ____ en de ____ en de ____.".to_string(),
            words: vec!["hond".to_string()],
        };
        let results = gap.score(&["hond".to_string(), "fiets".to_string()]);
        assert_eq!(results.len(), 3);
        assert!(results[0].correct);
        assert!(!results[1].correct);
        assert_eq!(results[1].expected, "");
        assert!(!results[2].correct);
        assert_eq!(results[2].answer, "");

        let extra_words = GapText {
            gap_text: "Mijn ____.".to_string(),
            words: vec!["hond".to_string(), "kat".to_string()],
        };
        assert_eq!(extra_words.score(&["hond".to_string()]).len(), 1);
    }

    #[test]
    fn test_generate_uses_generator_output() {
        let generator = CannedGenerator {
            response: "Sure! {\"gap_text\": \"Mijn ____.\", \"words\": [\"hond\"]}".to_string(),
            prompts: RefCell::new(Vec::new()),
        };
        let gap = GapText::generate(&generator, &lesson()).unwrap();
        assert_eq!(gap.words, vec!["hond".to_string()]);
        assert_eq!(generator.prompts.borrow().len(), 1);
    }
}
