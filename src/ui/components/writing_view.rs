use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::WritingSession;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

pub struct WritingView<'a> {
    session: &'a WritingSession,
    theme: &'a Theme,
}

impl<'a> WritingView<'a> {
    pub fn new(session: &'a WritingSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for WritingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let outer = Block::bordered()
            .title(format!(" Writing in {} ", session.assignment.language))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let width = inner.width.saturating_sub(2) as usize;
        let topic_height = wrapped_line_count(&session.assignment.topic, width) as u16 + 2;
        let constraints = if session.feedback.is_some() {
            [
                Constraint::Length(topic_height.min(inner.height / 3)),
                Constraint::Percentage(40),
                Constraint::Min(3),
            ]
        } else {
            [
                Constraint::Length(topic_height.min(inner.height / 3)),
                Constraint::Min(3),
                Constraint::Length(0),
            ]
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(session.assignment.topic.as_str())
            .style(Style::default().fg(colors.prompt()))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" Topic ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(layout[0], buf);

        // Cursor sits at the end; the editor only appends.
        let mut text: Vec<Line> = session
            .editor
            .value()
            .split('\n')
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.fg()))))
            .collect();
        if let Some(last) = text.last_mut() {
            last.push_span(Span::styled(" ", Style::default().bg(colors.accent())));
        }
        let editor_height = layout[1].height.saturating_sub(2) as usize;
        let scroll =
            wrapped_line_count(session.editor.value(), width).saturating_sub(editor_height);
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0))
            .block(
                Block::bordered()
                    .title(" Your text ")
                    .border_style(Style::default().fg(colors.border_focused())),
            )
            .render(layout[1], buf);

        if let Some(feedback) = &session.feedback {
            Paragraph::new(feedback.as_str())
                .style(Style::default().fg(colors.fg()))
                .wrap(Wrap { trim: true })
                .block(
                    Block::bordered()
                        .title(" Feedback ")
                        .border_style(Style::default().fg(colors.correct())),
                )
                .render(layout[2], buf);
        }
    }
}
