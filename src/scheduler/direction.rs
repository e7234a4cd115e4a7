use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::lesson::WordRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PracticeMode {
    /// Always original → translation.
    #[default]
    Standard,
    /// Every draw flips a fair coin.
    Ultra,
}

impl PracticeMode {
    pub fn from_ultra(ultra: bool) -> Self {
        if ultra { Self::Ultra } else { Self::Standard }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Standard => "standard",
            PracticeMode::Ultra => "ultra",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn choose<R: Rng + ?Sized>(mode: PracticeMode, rng: &mut R) -> Self {
        match mode {
            PracticeMode::Standard => Direction::Forward,
            PracticeMode::Ultra => {
                if rng.gen_bool(0.5) {
                    Direction::Forward
                } else {
                    Direction::Reverse
                }
            }
        }
    }

    pub fn prompt<'a>(self, word: &'a WordRecord) -> &'a str {
        match self {
            Direction::Forward => &word.original,
            Direction::Reverse => &word.translation,
        }
    }

    pub fn expected<'a>(self, word: &'a WordRecord) -> &'a str {
        match self {
            Direction::Forward => &word.translation,
            Direction::Reverse => &word.original,
        }
    }

    pub fn prompt_language<'a>(self, word: &'a WordRecord) -> &'a str {
        match self {
            Direction::Forward => &word.source_language,
            Direction::Reverse => &word.target_language,
        }
    }

    /// Language of the expected answer, shown next to a revealed answer.
    pub fn answer_language<'a>(self, word: &'a WordRecord) -> &'a str {
        match self {
            Direction::Forward => &word.target_language,
            Direction::Reverse => &word.source_language,
        }
    }
}
