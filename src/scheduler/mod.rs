//! Adaptive review scheduler.
//!
//! A practice session owns a working set of `WordRecord`s. Each turn draws a
//! word with probability proportional to its weight, picks a prompt
//! direction, scores the answer, and writes the new weight back through the
//! `LessonStore`. Turn state lives in a `TurnContext` held by the caller:
//!
//! ```text
//! Idle --draw_next--> Presented --submit_answer/skip--> Scored --finish/draw_next--> Idle
//! ```
//!
//! The answered-but-not-yet-scored step happens inside `submit_answer` and
//! `skip` and is never observable from outside.

pub mod direction;
pub mod selector;
pub mod update;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::lesson::WordRecord;
use crate::store::LessonStore;

pub use direction::{Direction, PracticeMode};
pub use update::Verdict;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("there are no words to practice")]
    EmptyWorkingSet,
    #[error("the current prompt has not been answered yet")]
    TurnInProgress,
    #[error("no prompt is waiting for an answer")]
    NoActiveTurn,
    #[error("please enter your answer")]
    BlankAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not save the new weight of {word:?}: {reason}")]
pub struct PersistenceFailure {
    pub word: String,
    pub reason: String,
}

/// What happened to the weight write-back after a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Persistence {
    Written,
    /// The record has no origin. Its weight lives only in the working set.
    InMemoryOnly,
    /// The store refused the write. The in-memory weight is kept.
    Failed(PersistenceFailure),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub index: usize,
    pub direction: Direction,
    pub text: String,
    pub prompt_language: String,
    pub answer_language: String,
    generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub direction: Direction,
    pub verdict: Verdict,
    pub correct: bool,
    pub expected: String,
    pub answer_language: String,
    pub previous_weight: f64,
    pub weight: f64,
    pub persistence: Persistence,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum TurnPhase {
    #[default]
    Idle,
    Presented(Prompt),
    Scored(Scored),
}

#[derive(Clone, Debug, Default)]
pub struct TurnContext {
    phase: TurnPhase,
    pub answered: usize,
    pub correct: usize,
}

impl TurnContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, TurnPhase::Idle)
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        match &self.phase {
            TurnPhase::Presented(prompt) => Some(prompt),
            _ => None,
        }
    }

    pub fn scored(&self) -> Option<&Scored> {
        match &self.phase {
            TurnPhase::Scored(scored) => Some(scored),
            _ => None,
        }
    }

    /// Leave the feedback step. Does nothing unless the turn is scored.
    pub fn finish(&mut self) -> Option<Scored> {
        if !matches!(self.phase, TurnPhase::Scored(_)) {
            return None;
        }
        match std::mem::take(&mut self.phase) {
            TurnPhase::Scored(scored) => Some(scored),
            _ => None,
        }
    }

    fn take_prompt(&mut self) -> Option<Prompt> {
        if !matches!(self.phase, TurnPhase::Presented(_)) {
            return None;
        }
        match std::mem::take(&mut self.phase) {
            TurnPhase::Presented(prompt) => Some(prompt),
            _ => None,
        }
    }
}

pub struct Scheduler<S, R = SmallRng> {
    words: Vec<WordRecord>,
    mode: PracticeMode,
    store: S,
    rng: R,
    /// Bumped on every `load_working_set` so prompts from an older set are refused.
    generation: u64,
}

impl<S: LessonStore> Scheduler<S, SmallRng> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, SmallRng::from_entropy())
    }

    pub fn seeded(store: S, seed: u64) -> Self {
        Self::with_rng(store, SmallRng::seed_from_u64(seed))
    }
}

impl<S: LessonStore, R: Rng> Scheduler<S, R> {
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            words: Vec::new(),
            mode: PracticeMode::Standard,
            store,
            rng,
            generation: 0,
        }
    }

    /// Replace the working set. Start a fresh `TurnContext` afterwards.
    pub fn load_working_set(&mut self, records: Vec<WordRecord>, mode: PracticeMode) {
        log::info!(
            "working set of {} words in {} mode",
            records.len(),
            mode.as_str()
        );
        self.words = records;
        self.mode = mode;
        self.generation += 1;
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn draw_next(&mut self, ctx: &mut TurnContext) -> Result<Prompt, SchedulerError> {
        if ctx.prompt().is_some() {
            return Err(SchedulerError::TurnInProgress);
        }
        ctx.finish();

        let index = selector::select_index(&self.words, &mut self.rng)?;
        let direction = Direction::choose(self.mode, &mut self.rng);
        let word = &self.words[index];
        let prompt = Prompt {
            index,
            direction,
            text: direction.prompt(word).to_string(),
            prompt_language: direction.prompt_language(word).to_string(),
            answer_language: direction.answer_language(word).to_string(),
            generation: self.generation,
        };
        ctx.phase = TurnPhase::Presented(prompt.clone());
        Ok(prompt)
    }

    /// Score a typed answer. A blank answer is refused and the prompt stays up.
    pub fn submit_answer(
        &mut self,
        ctx: &mut TurnContext,
        raw: &str,
    ) -> Result<Scored, SchedulerError> {
        let Some(prompt) = ctx.prompt() else {
            return Err(SchedulerError::NoActiveTurn);
        };
        if raw.trim().is_empty() {
            return Err(SchedulerError::BlankAnswer);
        }
        let word = self.presented_word(prompt)?;
        let verdict = update::judge(raw, prompt.direction.expected(word));
        self.score(ctx, verdict)
    }

    /// Give up on the prompt. Counts as a wrong answer and reveals it.
    pub fn skip(&mut self, ctx: &mut TurnContext) -> Result<Scored, SchedulerError> {
        let Some(prompt) = ctx.prompt() else {
            return Err(SchedulerError::NoActiveTurn);
        };
        self.presented_word(prompt)?;
        self.score(ctx, Verdict::Skipped)
    }

    fn presented_word(&self, prompt: &Prompt) -> Result<&WordRecord, SchedulerError> {
        if prompt.generation != self.generation {
            return Err(SchedulerError::NoActiveTurn);
        }
        self.words
            .get(prompt.index)
            .ok_or(SchedulerError::NoActiveTurn)
    }

    fn score(&mut self, ctx: &mut TurnContext, verdict: Verdict) -> Result<Scored, SchedulerError> {
        let prompt = ctx.take_prompt().ok_or(SchedulerError::NoActiveTurn)?;
        let word = &mut self.words[prompt.index];

        let previous_weight = word.weight;
        word.weight = update::next_weight(previous_weight, verdict);
        log::debug!(
            "{:?} {:?}: weight {previous_weight} -> {}",
            word.original,
            verdict,
            word.weight
        );

        let expected = prompt.direction.expected(word).to_string();
        let weight = word.weight;
        let persistence = self.persist(prompt.index);

        let scored = Scored {
            index: prompt.index,
            direction: prompt.direction,
            verdict,
            correct: verdict.is_correct(),
            expected,
            answer_language: prompt.answer_language,
            previous_weight,
            weight,
            persistence,
        };
        ctx.answered += 1;
        if scored.correct {
            ctx.correct += 1;
        }
        ctx.phase = TurnPhase::Scored(scored.clone());
        Ok(scored)
    }

    fn persist(&self, index: usize) -> Persistence {
        let word = &self.words[index];
        if word.origin.is_none() {
            return Persistence::InMemoryOnly;
        }
        match self.store.persist(word) {
            Ok(()) => Persistence::Written,
            Err(e) => {
                log::warn!("keeping in-memory weight for {:?}: {e:#}", word.original);
                Persistence::Failed(PersistenceFailure {
                    word: word.original.clone(),
                    reason: format!("{e:#}"),
                })
            }
        }
    }
}
