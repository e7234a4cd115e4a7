use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{Authoring, AuthoringField};
use crate::ui::components::input_field::input_spans;
use crate::ui::line_input::LineInput;
use crate::ui::theme::{Theme, ThemeColors};

pub struct AuthoringView<'a> {
    authoring: &'a Authoring,
    theme: &'a Theme,
}

impl<'a> AuthoringView<'a> {
    pub fn new(authoring: &'a Authoring, theme: &'a Theme) -> Self {
        Self { authoring, theme }
    }

    fn label(&self, field: AuthoringField, text: &'static str) -> Span<'static> {
        let colors = &self.theme.colors;
        let focused = self.authoring.field == field;
        let style = if focused {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted())
        };
        let indicator = if focused { ">" } else { " " };
        Span::styled(format!(" {indicator} {text:<12}"), style)
    }

    fn text_row(
        &self,
        field: AuthoringField,
        label: &'static str,
        input: &'a LineInput,
    ) -> Line<'a> {
        let mut spans = vec![self.label(field, label)];
        spans.extend(input_spans(
            input,
            self.authoring.field == field,
            &self.theme.colors,
        ));
        Line::from(spans)
    }

    fn language_row(&self, field: AuthoringField, label: &'static str, value: &str) -> Line<'a> {
        let colors: &ThemeColors = &self.theme.colors;
        let locked = self.authoring.draft.languages_locked();
        let value = if locked {
            format!("{value} (locked)")
        } else {
            format!("< {value} >")
        };
        let style = if locked {
            Style::default().fg(colors.muted())
        } else {
            Style::default().fg(colors.fg())
        };
        Line::from(vec![self.label(field, label), Span::styled(value, style)])
    }
}

impl Widget for AuthoringView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let authoring = self.authoring;

        let block = Block::bordered()
            .title(" Create Lesson ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(inner);

        let draft = &authoring.draft;
        let form = vec![
            self.text_row(AuthoringField::Source, "Source", &authoring.source),
            self.text_row(AuthoringField::Title, "Lesson", &authoring.title),
            self.language_row(
                AuthoringField::SourceLanguage,
                "From",
                &draft.source_language,
            ),
            self.language_row(
                AuthoringField::TargetLanguage,
                "To",
                &draft.target_language,
            ),
            Line::from(""),
            self.text_row(AuthoringField::Word, "Word", &authoring.word),
            self.text_row(AuthoringField::Translation, "Translation", &authoring.translation),
        ];
        Paragraph::new(form).render(layout[0], buf);

        let mut words = vec![Line::from(Span::styled(
            format!(" Words in this lesson: {}", draft.words.len()),
            Style::default().fg(colors.muted()),
        ))];
        let visible = (layout[1].height as usize).saturating_sub(1);
        let skip = draft.words.len().saturating_sub(visible);
        words.extend(draft.words.iter().enumerate().skip(skip).map(|(i, w)| {
            Line::from(vec![
                Span::styled(format!(" {:>3}. ", i + 1), Style::default().fg(colors.muted())),
                Span::styled(w.original.clone(), Style::default().fg(colors.prompt())),
                Span::styled("  ->  ", Style::default().fg(colors.muted())),
                Span::styled(w.translation.clone(), Style::default().fg(colors.fg())),
            ])
        }));
        Paragraph::new(words).render(layout[1], buf);
    }
}
