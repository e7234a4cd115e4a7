use std::time::Instant;

use anyhow::Result;

use vokab::config::Config;
use vokab::generator::TextGenerator;
use vokab::generator::gap_test::{BlankResult, GapText};
use vokab::generator::openai::OpenAiGenerator;
use vokab::generator::writing::WritingAssignment;
use vokab::http::HttpClient;
use vokab::lesson::WordRecord;
use vokab::lesson::draft::LessonDraft;
use vokab::scheduler::{Persistence, PracticeMode, Scheduler, SchedulerError, TurnContext};
use vokab::store::LessonStore;
use vokab::store::csv_store::CsvLessonStore;
use vokab::translate::mymemory::MyMemoryTranslator;
use vokab::translate::{Translator, language_names};

use crate::ui::components::menu::Menu;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Authoring,
    LessonSelect,
    Flashcard,
    GapTest,
    Writing,
}

/// What the lesson selection screen starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Flashcards,
    GapTest,
    Writing,
}

impl Activity {
    pub fn label(self) -> &'static str {
        match self {
            Activity::Flashcards => "Flashcards",
            Activity::GapTest => "Gap test",
            Activity::Writing => "Writing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthoringField {
    Source,
    Title,
    SourceLanguage,
    TargetLanguage,
    Word,
    Translation,
}

impl AuthoringField {
    const ORDER: [AuthoringField; 6] = [
        AuthoringField::Source,
        AuthoringField::Title,
        AuthoringField::SourceLanguage,
        AuthoringField::TargetLanguage,
        AuthoringField::Word,
        AuthoringField::Translation,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn is_language(self) -> bool {
        matches!(self, AuthoringField::SourceLanguage | AuthoringField::TargetLanguage)
    }
}

pub struct Authoring {
    pub draft: LessonDraft,
    pub field: AuthoringField,
    pub source: LineInput,
    pub title: LineInput,
    pub word: LineInput,
    pub translation: LineInput,
}

impl Authoring {
    fn new(config: &Config) -> Self {
        Self {
            draft: LessonDraft::new(
                &config.default_source_language,
                &config.default_target_language,
            ),
            field: AuthoringField::Source,
            source: LineInput::default(),
            title: LineInput::default(),
            word: LineInput::default(),
            translation: LineInput::default(),
        }
    }

    pub fn focused_input(&mut self) -> Option<&mut LineInput> {
        match self.field {
            AuthoringField::Source => Some(&mut self.source),
            AuthoringField::Title => Some(&mut self.title),
            AuthoringField::Word => Some(&mut self.word),
            AuthoringField::Translation => Some(&mut self.translation),
            AuthoringField::SourceLanguage | AuthoringField::TargetLanguage => None,
        }
    }
}

#[derive(Default)]
pub struct LessonSelection {
    pub sources: Vec<String>,
    pub source_index: usize,
    pub lessons: Vec<String>,
    pub checked: Vec<bool>,
    pub cursor: usize,
}

impl LessonSelection {
    pub fn current_source(&self) -> Option<&str> {
        self.sources.get(self.source_index).map(String::as_str)
    }

    pub fn checked_lessons(&self) -> Vec<String> {
        self.lessons
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(lesson, _)| lesson.clone())
            .collect()
    }
}

#[derive(Default)]
pub struct Flashcards {
    pub turn: TurnContext,
    pub answer: LineInput,
    pub advance_at: Option<Instant>,
}

pub struct GapSession {
    pub gap: GapText,
    pub answers: Vec<LineInput>,
    pub focused: usize,
    pub results: Option<Vec<BlankResult>>,
}

pub struct WritingSession {
    pub assignment: WritingAssignment,
    pub editor: LineInput,
    pub feedback: Option<String>,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub mode: PracticeMode,
    pub status: Option<Status>,
    pub should_quit: bool,
    pub authoring: Authoring,
    pub selection: LessonSelection,
    pub activity: Activity,
    pub flashcards: Flashcards,
    pub gap: Option<GapSession>,
    pub writing: Option<WritingSession>,
    store: CsvLessonStore,
    scheduler: Scheduler<CsvLessonStore>,
    translator: Box<dyn Translator>,
    generator: Box<dyn TextGenerator>,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, seed: Option<u64>) -> Result<Self> {
        let store = CsvLessonStore::with_base_dir(config.data_path())?;
        let scheduler = match seed {
            Some(seed) => Scheduler::seeded(store.clone(), seed),
            None => Scheduler::new(store.clone()),
        };
        let http = HttpClient::new(config.request_timeout());
        let translator = Box::new(MyMemoryTranslator::new(&config.translator_url, http.clone()));
        let generator = Box::new(OpenAiGenerator::from_env(
            &config.llm_base_url,
            &config.llm_model,
            &config.llm_api_key_env,
            http,
        ));
        Ok(Self::with_services(
            config, theme, store, scheduler, translator, generator,
        ))
    }

    pub fn with_services(
        config: Config,
        theme: &'static Theme,
        store: CsvLessonStore,
        scheduler: Scheduler<CsvLessonStore>,
        translator: Box<dyn Translator>,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Self {
            screen: AppScreen::Menu,
            mode: PracticeMode::from_ultra(config.ultra_mode),
            authoring: Authoring::new(&config),
            menu: Menu::new(theme),
            config,
            theme,
            status: None,
            should_quit: false,
            selection: LessonSelection::default(),
            activity: Activity::Flashcards,
            flashcards: Flashcards::default(),
            gap: None,
            writing: None,
            store,
            scheduler,
            translator,
            generator,
        }
    }

    pub fn scheduler(&self) -> &Scheduler<CsvLessonStore> {
        &self.scheduler
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        let text = text.into();
        match kind {
            StatusKind::Error => log::error!("{text}"),
            StatusKind::Warning => log::warn!("{text}"),
            StatusKind::Info => log::debug!("{text}"),
        }
        self.status = Some(Status { kind, text });
    }

    fn report(&mut self, err: anyhow::Error) {
        self.set_status(StatusKind::Error, format!("{err:#}"));
    }

    pub fn go_to_menu(&mut self) {
        self.flashcards.turn.finish();
        self.flashcards.advance_at = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_authoring(&mut self) {
        self.status = None;
        self.screen = AppScreen::Authoring;
    }

    pub fn go_to_lesson_select(&mut self) {
        self.flashcards.turn.finish();
        self.flashcards.advance_at = None;
        self.refresh_sources();
        self.screen = AppScreen::LessonSelect;
    }

    pub fn toggle_ultra(&mut self) {
        self.mode = match self.mode {
            PracticeMode::Standard => PracticeMode::Ultra,
            PracticeMode::Ultra => PracticeMode::Standard,
        };
    }

    // --- Lesson authoring ---

    pub fn cycle_language(&mut self, forward: bool) {
        let field = self.authoring.field;
        if !field.is_language() {
            return;
        }
        let draft = &self.authoring.draft;
        let current = if field == AuthoringField::SourceLanguage {
            &draft.source_language
        } else {
            &draft.target_language
        };
        let names = language_names();
        let position = names.iter().position(|n| n == current).unwrap_or(0);
        let next = if forward {
            (position + 1) % names.len()
        } else {
            (position + names.len() - 1) % names.len()
        };
        let (source, target) = if field == AuthoringField::SourceLanguage {
            (names[next].to_string(), draft.target_language.clone())
        } else {
            (draft.source_language.clone(), names[next].to_string())
        };
        if !self.authoring.draft.set_languages(&source, &target) {
            self.set_status(
                StatusKind::Info,
                "Languages are fixed while the lesson has words",
            );
        }
    }

    pub fn translate_word(&mut self) {
        let word = self.authoring.word.value().trim().to_string();
        if word.is_empty() {
            self.set_status(StatusKind::Info, "Enter a word to translate");
            return;
        }
        let draft = &self.authoring.draft;
        match self
            .translator
            .translate(&word, &draft.source_language, &draft.target_language)
        {
            Ok(translation) => {
                self.authoring.translation.set(&translation);
                self.authoring.field = AuthoringField::Translation;
                self.status = None;
            }
            Err(e) => self.report(e.context("Translation failed")),
        }
    }

    pub fn add_word(&mut self) {
        let authoring = &mut self.authoring;
        let word = authoring.word.value().to_string();
        let translation = authoring.translation.value().to_string();
        match authoring.draft.add_word(&word, &translation).map(|_| ()) {
            Ok(()) => {
                authoring.word.clear();
                authoring.translation.clear();
                authoring.field = AuthoringField::Word;
                self.status = None;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn remove_last_word(&mut self) {
        let draft = &mut self.authoring.draft;
        if let Some(last) = draft.words.len().checked_sub(1) {
            draft.remove(last);
        }
    }

    pub fn save_lesson(&mut self) {
        let authoring = &mut self.authoring;
        authoring.draft.source_name = authoring.source.value().trim().to_string();
        authoring.draft.title = authoring.title.value().trim().to_string();
        let saved = format!("{} / {}", authoring.draft.source_name, authoring.draft.title);
        match authoring.draft.save(&self.store) {
            Ok(()) => {
                authoring.source.clear();
                authoring.title.clear();
                authoring.field = AuthoringField::Source;
                self.set_status(StatusKind::Info, format!("Saved {saved}"));
            }
            Err(e) => self.report(e),
        }
    }

    // --- Lesson selection ---

    pub fn refresh_sources(&mut self) {
        match self.store.sources() {
            Ok(sources) => {
                self.selection.sources = sources;
                if self.selection.source_index >= self.selection.sources.len() {
                    self.selection.source_index = 0;
                }
                self.refresh_lessons();
            }
            Err(e) => self.report(e),
        }
    }

    fn refresh_lessons(&mut self) {
        let lessons = match self.selection.current_source() {
            Some(source) => self.store.lessons(source),
            None => Ok(Vec::new()),
        };
        match lessons {
            Ok(lessons) => {
                self.selection.checked = vec![false; lessons.len()];
                self.selection.lessons = lessons;
                self.selection.cursor = 0;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn cycle_source(&mut self, forward: bool) {
        let count = self.selection.sources.len();
        if count == 0 {
            return;
        }
        let index = self.selection.source_index;
        self.selection.source_index = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };
        self.refresh_lessons();
    }

    pub fn move_lesson_cursor(&mut self, down: bool) {
        let count = self.selection.lessons.len();
        if count == 0 {
            return;
        }
        let cursor = self.selection.cursor;
        self.selection.cursor = if down {
            (cursor + 1).min(count - 1)
        } else {
            cursor.saturating_sub(1)
        };
    }

    pub fn toggle_lesson(&mut self) {
        if let Some(checked) = self.selection.checked.get_mut(self.selection.cursor) {
            *checked = !*checked;
        }
    }

    pub fn toggle_all_lessons(&mut self) {
        let all = self.selection.checked.iter().all(|c| *c);
        self.selection.checked.iter_mut().for_each(|c| *c = !all);
    }

    fn load_selected(&mut self) -> Option<Vec<WordRecord>> {
        let Some(source) = self.selection.current_source().map(str::to_string) else {
            self.set_status(StatusKind::Info, "No lessons yet. Create one first.");
            return None;
        };
        let lessons = self.selection.checked_lessons();
        if lessons.is_empty() {
            self.set_status(StatusKind::Info, "Select at least one lesson");
            return None;
        }
        let report = match self.store.load(&source, &lessons) {
            Ok(report) => report,
            Err(e) => {
                self.report(e);
                return None;
            }
        };
        if report.rejected.is_empty() {
            self.status = None;
        } else {
            self.set_status(
                StatusKind::Warning,
                format!("Skipped {} malformed rows", report.rejected.len()),
            );
        }
        Some(report.records)
    }

    pub fn start_activity(&mut self, activity: Activity) {
        self.activity = activity;
        let Some(records) = self.load_selected() else {
            return;
        };
        match activity {
            Activity::Flashcards => self.start_flashcards(records),
            Activity::GapTest => self.start_gap_test(&records),
            Activity::Writing => self.start_writing(&records),
        }
    }

    // --- Flashcards ---

    fn start_flashcards(&mut self, records: Vec<WordRecord>) {
        self.scheduler.load_working_set(records, self.mode);
        self.flashcards = Flashcards::default();
        if self.next_card() {
            self.screen = AppScreen::Flashcard;
        }
    }

    /// Draw the next prompt. Returns false and falls back to lesson
    /// selection when nothing can be drawn.
    fn next_card(&mut self) -> bool {
        self.flashcards.advance_at = None;
        self.flashcards.answer.clear();
        match self.scheduler.draw_next(&mut self.flashcards.turn) {
            Ok(_) => true,
            Err(SchedulerError::EmptyWorkingSet) => {
                self.set_status(StatusKind::Info, "The selected lessons contain no words");
                self.screen = AppScreen::LessonSelect;
                false
            }
            Err(e) => {
                self.set_status(StatusKind::Error, e.to_string());
                false
            }
        }
    }

    pub fn submit_answer(&mut self) {
        if self.flashcards.turn.scored().is_some() {
            self.next_card();
            return;
        }
        let cards = &mut self.flashcards;
        match self
            .scheduler
            .submit_answer(&mut cards.turn, cards.answer.value())
        {
            Ok(scored) => {
                cards.advance_at = Some(Instant::now() + self.config.feedback_delay());
                self.status = None;
                self.surface_persistence(&scored.persistence);
            }
            Err(SchedulerError::BlankAnswer) => {
                self.set_status(StatusKind::Info, "Type an answer, or press Tab to skip");
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    pub fn skip_card(&mut self) {
        let cards = &mut self.flashcards;
        match self.scheduler.skip(&mut cards.turn) {
            Ok(scored) => {
                cards.advance_at = Some(Instant::now() + self.config.feedback_delay());
                self.status = None;
                self.surface_persistence(&scored.persistence);
            }
            Err(SchedulerError::NoActiveTurn) => {}
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    fn surface_persistence(&mut self, persistence: &Persistence) {
        if let Persistence::Failed(failure) = persistence {
            self.set_status(StatusKind::Warning, failure.to_string());
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if self.screen == AppScreen::Flashcard
            && self.flashcards.advance_at.is_some_and(|at| now >= at)
        {
            self.next_card();
        }
    }

    // --- Gap test ---

    fn start_gap_test(&mut self, records: &[WordRecord]) {
        match GapText::generate(self.generator.as_ref(), records) {
            Ok(gap) => {
                let answers = (0..gap.blank_count()).map(|_| LineInput::default()).collect();
                self.gap = Some(GapSession {
                    gap,
                    answers,
                    focused: 0,
                    results: None,
                });
                self.screen = AppScreen::GapTest;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn check_gap_answers(&mut self) {
        let Some(session) = self.gap.as_mut() else {
            return;
        };
        let answers: Vec<String> = session.answers.iter().map(|a| a.value().to_string()).collect();
        let results = session.gap.score(&answers);
        let correct = results.iter().filter(|r| r.correct).count();
        let total = results.len();
        session.results = Some(results);
        self.set_status(StatusKind::Info, format!("{correct} of {total} blanks correct"));
    }

    // --- Writing ---

    fn start_writing(&mut self, records: &[WordRecord]) {
        match WritingAssignment::generate(self.generator.as_ref(), records) {
            Ok(assignment) => {
                self.writing = Some(WritingSession {
                    assignment,
                    editor: LineInput::default(),
                    feedback: None,
                });
                self.screen = AppScreen::Writing;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn request_feedback(&mut self) {
        let Some(session) = self.writing.as_mut() else {
            return;
        };
        match session
            .assignment
            .feedback(self.generator.as_ref(), session.editor.value())
        {
            Ok(feedback) => {
                session.feedback = Some(feedback);
                self.status = None;
            }
            Err(e) => self.report(e),
        }
    }
}
