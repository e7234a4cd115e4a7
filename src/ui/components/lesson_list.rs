use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use vokab::scheduler::PracticeMode;

use crate::app::{Activity, LessonSelection};
use crate::ui::theme::Theme;

pub struct LessonSelectView<'a> {
    selection: &'a LessonSelection,
    activity: Activity,
    mode: PracticeMode,
    theme: &'a Theme,
}

impl<'a> LessonSelectView<'a> {
    pub fn new(
        selection: &'a LessonSelection,
        activity: Activity,
        mode: PracticeMode,
        theme: &'a Theme,
    ) -> Self {
        Self {
            selection,
            activity,
            mode,
            theme,
        }
    }
}

impl Widget for LessonSelectView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} : choose lessons ", self.activity.label()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let source = self.selection.current_source().unwrap_or("(no sources)");
        let source_line = Line::from(vec![
            Span::styled(" Source: ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("< {source} >"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({} of {})",
                    self.selection.source_index + 1,
                    self.selection.sources.len().max(1)
                ),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(source_line).render(layout[0], buf);

        let (mode_label, mode_color) = match self.mode {
            PracticeMode::Standard => ("Standard (prompt in the lesson language)", colors.fg()),
            PracticeMode::Ultra => ("Ultra (random direction)", colors.warning()),
        };
        let mut mode_spans = vec![
            Span::styled(" Mode: ", Style::default().fg(colors.muted())),
            Span::styled(mode_label, Style::default().fg(mode_color)),
        ];
        if self.activity != Activity::Flashcards {
            mode_spans.push(Span::styled(
                "  (flashcards only)",
                Style::default().fg(colors.muted()),
            ));
        }
        Paragraph::new(Line::from(mode_spans)).render(layout[1], buf);

        if self.selection.lessons.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " No lessons in this source.",
                Style::default().fg(colors.muted()),
            )))
            .render(layout[2], buf);
            return;
        }

        let visible = layout[2].height as usize;
        let offset = (self.selection.cursor + 1).saturating_sub(visible);
        let lines: Vec<Line> = self
            .selection
            .lessons
            .iter()
            .zip(&self.selection.checked)
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, (lesson, checked))| {
                let is_cursor = i == self.selection.cursor;
                let mark = if *checked { "[x]" } else { "[ ]" };
                let mut style = Style::default().fg(if *checked {
                    colors.accent()
                } else {
                    colors.fg()
                });
                if is_cursor {
                    style = style.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
                }
                let indicator = if is_cursor { ">" } else { " " };
                Line::from(Span::styled(format!(" {indicator} {mark} {lesson}"), style))
            })
            .collect();
        Paragraph::new(lines).render(layout[2], buf);
    }
}
