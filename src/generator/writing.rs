use anyhow::{Context, Result, bail};

use crate::generator::{DEFAULT_MAX_TOKENS, TextGenerator, practice_language, vocabulary};
use crate::lesson::WordRecord;

pub const FEEDBACK_MAX_TOKENS: u32 = 500;

pub fn topic_prompt(words: &[WordRecord]) -> Result<String> {
    let language = practice_language(words)?;
    let vocabulary = vocabulary(words).join(", ");
    Ok(format!(
        "Provide a writing assignment topic in {language} that relates to these words:\n\
         {vocabulary}.\n\
         The topic should encourage the use of these words."
    ))
}

pub fn feedback_prompt(text: &str, language: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Please write something before submitting");
    }
    Ok(format!(
        "As a language tutor, please correct the following text in {language} and provide \
         feedback:\n\n{text}\n\nIdentify any mistakes and suggest improvements."
    ))
}

#[derive(Clone, Debug, PartialEq)]
pub struct WritingAssignment {
    pub language: String,
    pub topic: String,
}

impl WritingAssignment {
    pub fn generate(generator: &dyn TextGenerator, words: &[WordRecord]) -> Result<Self> {
        let prompt = topic_prompt(words)?;
        let topic = generator
            .generate(&prompt, DEFAULT_MAX_TOKENS)
            .context("Failed to generate writing prompt")?;
        Ok(Self {
            language: practice_language(words)?.to_string(),
            topic,
        })
    }

    pub fn feedback(&self, generator: &dyn TextGenerator, text: &str) -> Result<String> {
        let prompt = feedback_prompt(text, &self.language)?;
        generator
            .generate(&prompt, FEEDBACK_MAX_TOKENS)
            .context("Failed to get feedback")
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct EchoGenerator {
        calls: RefCell<Vec<(String, u32)>>,
    }

    impl TextGenerator for EchoGenerator {
        fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
            self.calls.borrow_mut().push((prompt.to_string(), max_tokens));
            Ok(format!("reply #{}", self.calls.borrow().len()))
        }
    }

    #[test]
    fn test_topic_prompt() {
        let words = vec![
            WordRecord::new("hond", "dog", "Dutch", "English"),
            WordRecord::new("kat", "cat", "Dutch", "English"),
        ];
        let prompt = topic_prompt(&words).unwrap();
        assert!(prompt.starts_with("Provide a writing assignment topic in Dutch"));
        assert!(prompt.contains("hond, kat."));
    }

    #[test]
    fn test_feedback_prompt_rejects_blank_text() {
        assert!(feedback_prompt("   \n", "Dutch").is_err());
        let prompt = feedback_prompt(" Ik heb een hond. ", "Dutch").unwrap();
        assert!(prompt.contains("\n\nIk heb een hond.\n\n"));
    }

    #[test]
    fn test_assignment_round_trip_uses_token_limits() {
        let generator = EchoGenerator::default();
        let words = vec![WordRecord::new("hond", "dog", "Dutch", "English")];

        let assignment = WritingAssignment::generate(&generator, &words).unwrap();
        assert_eq!(assignment.language, "Dutch");
        assert_eq!(assignment.topic, "reply #1");

        let feedback = assignment.feedback(&generator, "Mijn hond is groot.").unwrap();
        assert_eq!(feedback, "reply #2");

        let calls = generator.calls.borrow();
        assert_eq!(calls[0].1, DEFAULT_MAX_TOKENS);
        assert_eq!(calls[1].1, FEEDBACK_MAX_TOKENS);
    }
}
