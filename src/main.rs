mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use vokab::config::Config;
use vokab::scheduler::PracticeMode;
use vokab::store::LessonStore;
use vokab::store::csv_store::CsvLessonStore;

use app::{Activity, App, AppScreen, AuthoringField, StatusKind};
use event::{AppEvent, EventHandler};
use ui::components::authoring::AuthoringView;
use ui::components::flashcard::FlashcardView;
use ui::components::gap_view::GapView;
use ui::components::lesson_list::LessonSelectView;
use ui::components::menu::MenuAction;
use ui::components::writing_view::WritingView;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "vokab", version, about = "Adaptive vocabulary trainer for the terminal")]
struct Cli {
    #[arg(short, long, help = "Directory holding lesson sources")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Prompt in both directions at random")]
    ultra: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seed for reproducible word draws")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List lesson sources, or the lessons of one source
    Lessons { source: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config {}: {e:#}", Config::config_path().display());
        Config::default()
    });
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if cli.ultra {
        config.ultra_mode = true;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    if let Some(Command::Lessons { source }) = cli.command {
        return list_lessons(&config, source.as_deref());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            "theme {} not found, using the default (bundled: {})",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let mut app = App::new(config, theme, cli.seed)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The TUI owns the terminal, so log records go to a file.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("vokab")) else {
        return;
    };
    let file = fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("vokab.log"))
    });
    match file {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("warning: logging disabled: {e}"),
    }
}

fn list_lessons(config: &Config, source: Option<&str>) -> Result<()> {
    let store = CsvLessonStore::with_base_dir(config.data_path())
        .with_context(|| format!("cannot open lesson directory {}", config.data_dir))?;
    match source {
        Some(source) => {
            let lessons = store.lessons(source)?;
            if lessons.is_empty() {
                println!("no lessons in {source}");
            }
            for lesson in lessons {
                println!("{lesson}");
            }
        }
        None => {
            for source in store.sources()? {
                println!("{source}");
            }
        }
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => handle_paste(app, &text),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Authoring => handle_authoring_key(app, key),
        AppScreen::LessonSelect => handle_select_key(app, key),
        AppScreen::Flashcard => handle_flashcard_key(app, key),
        AppScreen::GapTest => handle_gap_key(app, key),
        AppScreen::Writing => handle_writing_key(app, key),
    }
}

fn ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

fn handle_paste(app: &mut App, text: &str) {
    match app.screen {
        AppScreen::Authoring => {
            if let Some(input) = app.authoring.focused_input() {
                input.insert_str(text, false);
            }
        }
        AppScreen::Flashcard if app.flashcards.turn.prompt().is_some() => {
            app.flashcards.answer.insert_str(text, false);
        }
        AppScreen::GapTest => {
            if let Some(session) = app.gap.as_mut()
                && session.results.is_none()
                && let Some(input) = session.answers.get_mut(session.focused)
            {
                input.insert_str(text, false);
            }
        }
        AppScreen::Writing => {
            if let Some(session) = app.writing.as_mut() {
                session.editor.insert_str(text, true);
            }
        }
        _ => {}
    }
}

fn perform_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::CreateLesson => app.go_to_authoring(),
        MenuAction::Flashcards => {
            app.activity = Activity::Flashcards;
            app.go_to_lesson_select();
        }
        MenuAction::GapTest => {
            app.activity = Activity::GapTest;
            app.go_to_lesson_select();
        }
        MenuAction::Writing => {
            app.activity = Activity::Writing;
            app.go_to_lesson_select();
        }
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let action = match key.code {
        KeyCode::Esc => Some(MenuAction::Quit),
        KeyCode::Up | KeyCode::Char('k') => {
            app.menu.prev();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.menu.next();
            None
        }
        KeyCode::Enter => app.menu.selected_action(),
        KeyCode::Char(ch) => app.menu.action_for_key(ch),
        _ => None,
    };
    if let Some(action) = action {
        perform_menu_action(app, action);
    }
}

fn handle_authoring_key(app: &mut App, key: KeyEvent) {
    if ctrl(&key, 's') {
        app.save_lesson();
        return;
    }
    if ctrl(&key, 't') {
        app.translate_word();
        return;
    }
    if ctrl(&key, 'd') {
        app.remove_last_word();
        return;
    }

    let authoring = &mut app.authoring;
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            authoring.field = authoring.field.next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            authoring.field = authoring.field.prev();
            return;
        }
        _ => {}
    }

    if authoring.field.is_language() {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => app.cycle_language(true),
            KeyCode::Left | KeyCode::Char('h') => app.cycle_language(false),
            KeyCode::Enter => authoring.field = authoring.field.next(),
            KeyCode::Esc => app.go_to_menu(),
            _ => {}
        }
        return;
    }

    let field = authoring.field;
    let Some(input) = authoring.focused_input() else {
        return;
    };
    match input.handle(key) {
        InputResult::Continue => {}
        InputResult::Cancel => app.go_to_menu(),
        InputResult::Submit => match field {
            AuthoringField::Word => app.authoring.field = AuthoringField::Translation,
            AuthoringField::Translation => app.add_word(),
            _ => app.authoring.field = field.next(),
        },
    }
}

fn handle_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_source(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_source(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_lesson_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_lesson_cursor(true),
        KeyCode::Char(' ') => app.toggle_lesson(),
        KeyCode::Char('a') => app.toggle_all_lessons(),
        KeyCode::Char('u') => app.toggle_ultra(),
        KeyCode::Char('1') => app.start_activity(Activity::Flashcards),
        KeyCode::Char('2') => app.start_activity(Activity::GapTest),
        KeyCode::Char('3') => app.start_activity(Activity::Writing),
        KeyCode::Enter => app.start_activity(app.activity),
        _ => {}
    }
}

fn handle_flashcard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_lesson_select(),
        KeyCode::Enter => app.submit_answer(),
        KeyCode::Tab => app.skip_card(),
        _ => {
            if app.flashcards.turn.prompt().is_some() {
                app.flashcards.answer.handle(key);
            }
        }
    }
}

fn handle_gap_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_to_lesson_select();
        return;
    }
    let Some(session) = app.gap.as_mut() else {
        app.go_to_lesson_select();
        return;
    };
    if session.results.is_some() {
        if key.code == KeyCode::Enter {
            app.go_to_lesson_select();
        }
        return;
    }
    if ctrl(&key, 's') {
        app.check_gap_answers();
        return;
    }

    let count = session.answers.len();
    match key.code {
        KeyCode::Tab | KeyCode::Down => session.focused = (session.focused + 1) % count.max(1),
        KeyCode::BackTab | KeyCode::Up => {
            session.focused = (session.focused + count.max(1) - 1) % count.max(1)
        }
        KeyCode::Enter if session.focused + 1 >= count => app.check_gap_answers(),
        KeyCode::Enter => session.focused += 1,
        _ => {
            if let Some(input) = session.answers.get_mut(session.focused) {
                input.handle(key);
            }
        }
    }
}

fn handle_writing_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_to_lesson_select();
        return;
    }
    if ctrl(&key, 's') {
        app.request_feedback();
        return;
    }
    let Some(session) = app.writing.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Enter => session.editor.insert_newline(),
        KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {}
        _ => {
            session.editor.handle(key);
        }
    }
}

fn screen_title(app: &App) -> String {
    match app.screen {
        AppScreen::Menu => String::new(),
        AppScreen::Authoring => "Create Lesson".to_string(),
        AppScreen::LessonSelect => format!("{} setup", app.activity.label()),
        AppScreen::Flashcard => match app.mode {
            PracticeMode::Standard => "Flashcards".to_string(),
            PracticeMode::Ultra => "Flashcards | Ultra".to_string(),
        },
        AppScreen::GapTest => "Gap Test".to_string(),
        AppScreen::Writing => "Writing".to_string(),
    }
}

fn key_hints(app: &App) -> &'static [&'static str] {
    match app.screen {
        AppScreen::Menu => &["[1-4] Choose", "[Enter] Open", "[q] Quit"],
        AppScreen::Authoring => &[
            "[Tab] Next field",
            "[Enter] Add word",
            "[Ctrl+T] Translate",
            "[Ctrl+D] Remove last",
            "[Ctrl+S] Save lesson",
            "[Esc] Back",
        ],
        AppScreen::LessonSelect => &[
            "[Space] Toggle",
            "[a] All",
            "[</>] Source",
            "[u] Ultra",
            "[Enter] Start",
            "[Esc] Back",
        ],
        AppScreen::Flashcard => &["[Enter] Check / Next", "[Tab] Skip", "[Esc] End session"],
        AppScreen::GapTest => &["[Tab] Next blank", "[Ctrl+S] Check", "[Esc] Back"],
        AppScreen::Writing => &["[Ctrl+S] Get feedback", "[Esc] Back"],
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    let title = screen_title(app);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vokab ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            title,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    match app.screen {
        AppScreen::Menu => {
            frame.render_widget(&app.menu, centered_rect(50, 80, layout.main));
        }
        AppScreen::Authoring => {
            let view = AuthoringView::new(&app.authoring, app.theme);
            frame.render_widget(view, centered_rect(70, 90, layout.main));
        }
        AppScreen::LessonSelect => {
            let view = LessonSelectView::new(&app.selection, app.activity, app.mode, app.theme);
            frame.render_widget(view, centered_rect(60, 80, layout.main));
        }
        AppScreen::Flashcard => {
            let view = FlashcardView::new(
                &app.flashcards.turn,
                app.scheduler().words(),
                &app.flashcards.answer,
                app.scheduler().mode(),
                app.theme,
            );
            frame.render_widget(view, centered_rect(60, 60, layout.main));
        }
        AppScreen::GapTest => {
            if let Some(session) = &app.gap {
                frame.render_widget(GapView::new(session, app.theme), layout.main);
            }
        }
        AppScreen::Writing => {
            if let Some(session) = &app.writing {
                frame.render_widget(WritingView::new(session, app.theme), layout.main);
            }
        }
    }

    let footer = match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => colors.accent(),
                StatusKind::Warning => colors.warning(),
                StatusKind::Error => colors.incorrect(),
            };
            Line::from(Span::styled(
                format!(" {}", status.text),
                Style::default().fg(color),
            ))
        }
        None => {
            let hints = pack_hint_lines(key_hints(app), layout.footer.width as usize);
            Line::from(Span::styled(
                hints.into_iter().next().unwrap_or_default(),
                Style::default().fg(colors.muted()),
            ))
        }
    };
    frame.render_widget(Paragraph::new(footer), layout.footer);
}
