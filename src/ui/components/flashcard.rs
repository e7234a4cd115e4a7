use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use vokab::lesson::WordRecord;
use vokab::scheduler::{Persistence, PracticeMode, TurnContext, Verdict};

use crate::ui::components::input_field::input_spans;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct FlashcardView<'a> {
    turn: &'a TurnContext,
    words: &'a [WordRecord],
    answer: &'a LineInput,
    mode: PracticeMode,
    theme: &'a Theme,
}

impl<'a> FlashcardView<'a> {
    pub fn new(
        turn: &'a TurnContext,
        words: &'a [WordRecord],
        answer: &'a LineInput,
        mode: PracticeMode,
        theme: &'a Theme,
    ) -> Self {
        Self {
            turn,
            words,
            answer,
            mode,
            theme,
        }
    }

    fn feedback_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let Some(scored) = self.turn.scored() else {
            return Vec::new();
        };

        let (headline, color) = match scored.verdict {
            Verdict::Correct => ("Correct!".to_string(), colors.correct()),
            Verdict::Incorrect => (
                format!("Incorrect. The answer is: {}", scored.expected),
                colors.incorrect(),
            ),
            Verdict::Skipped => (
                format!("Skipped. The answer is: {}", scored.expected),
                colors.warning(),
            ),
        };
        let mut lines = vec![
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("weight {:.3} -> {:.3}", scored.previous_weight, scored.weight),
                Style::default().fg(colors.muted()),
            )),
        ];
        if scored.persistence == Persistence::InMemoryOnly {
            lines.push(Line::from(Span::styled(
                "not saved: this word has no lesson file",
                Style::default().fg(colors.muted()),
            )));
        }
        lines
    }
}

impl Widget for FlashcardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.mode {
            PracticeMode::Standard => " Flashcards ".to_string(),
            PracticeMode::Ultra => " Flashcards (Ultra) ".to_string(),
        };
        let score = format!(
            " {}/{} correct | {} words ",
            self.turn.correct,
            self.turn.answered,
            self.words.len()
        );
        let block = Block::bordered()
            .title(title)
            .title_bottom(Line::from(score).right_aligned())
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let (instruction, prompt_text) = if let Some(prompt) = self.turn.prompt() {
            (
                format!(
                    "Translate from {} to {}:",
                    prompt.prompt_language, prompt.answer_language
                ),
                prompt.text.clone(),
            )
        } else if let Some(scored) = self.turn.scored() {
            let text = self
                .words
                .get(scored.index)
                .map(|word| scored.direction.prompt(word).to_string())
                .unwrap_or_default();
            (format!("Answer in {}:", scored.answer_language), text)
        } else {
            (String::new(), String::new())
        };

        Paragraph::new(Line::from(Span::styled(
            instruction,
            Style::default().fg(colors.muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                prompt_text,
                Style::default()
                    .fg(colors.prompt())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let focused = self.turn.prompt().is_some();
        let mut answer_line = vec![Span::styled("> ", Style::default().fg(colors.accent()))];
        answer_line.extend(input_spans(self.answer, focused, colors));
        Paragraph::new(Line::from(answer_line))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        Paragraph::new(self.feedback_lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);
    }
}
