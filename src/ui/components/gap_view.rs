use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::GapSession;
use crate::ui::components::input_field::input_spans;
use crate::ui::theme::Theme;

pub struct GapView<'a> {
    session: &'a GapSession,
    theme: &'a Theme,
}

impl<'a> GapView<'a> {
    pub fn new(session: &'a GapSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    /// The text with each blank replaced by its number, or by the typed
    /// answer once checked.
    fn text_spans(&self) -> Vec<Span<'a>> {
        let colors = &self.theme.colors;
        let session = self.session;
        let segments = session.gap.segments();
        let mut spans = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            spans.push(Span::styled(*segment, Style::default().fg(colors.fg())));
            if i + 1 == segments.len() {
                break;
            }
            let result = session.results.as_ref().and_then(|r| r.get(i));
            let span = match result {
                Some(r) if r.correct => Span::styled(
                    r.expected.clone(),
                    Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD),
                ),
                Some(r) => {
                    let expected = match r.expected.as_str() {
                        "" => "?",
                        e => e,
                    };
                    Span::styled(
                        format!("{expected} ({})", r.answer),
                        Style::default().fg(colors.incorrect()).add_modifier(Modifier::BOLD),
                    )
                }
                None => {
                    let style = if i == session.focused {
                        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.prompt())
                    };
                    Span::styled(format!("[{}]", i + 1), style)
                }
            };
            spans.push(span);
        }
        spans
    }
}

impl Widget for GapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let block = Block::bordered()
            .title(" Gap Test ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let answer_rows = session.answers.len() as u16 + 1;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(answer_rows)])
            .split(inner);

        Paragraph::new(Line::from(self.text_spans()))
            .wrap(Wrap { trim: false })
            .render(layout[0], buf);

        let mut lines = vec![Line::from("")];
        let checked = session.results.is_some();
        for (i, answer) in session.answers.iter().enumerate() {
            let focused = !checked && i == session.focused;
            let mut spans = vec![Span::styled(
                format!(" {:>2}: ", i + 1),
                Style::default().fg(if focused { colors.accent() } else { colors.muted() }),
            )];
            spans.extend(input_spans(answer, focused, colors));
            lines.push(Line::from(spans));
        }
        Paragraph::new(lines).render(layout[1], buf);
    }
}
