use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::ui::line_input::LineInput;
use crate::ui::theme::ThemeColors;

/// Spans for one line of input, with a block cursor when focused.
pub fn input_spans<'a>(input: &'a LineInput, focused: bool, colors: &ThemeColors) -> Vec<Span<'a>> {
    let text_style = Style::default().fg(colors.fg());
    if !focused {
        return vec![Span::styled(input.value(), text_style)];
    }

    let cursor_style = Style::default()
        .fg(colors.bg())
        .bg(colors.accent())
        .add_modifier(Modifier::BOLD);
    let (before, at, after) = input.render_parts();
    let mut spans = vec![Span::styled(before, text_style)];
    match at {
        Some(ch) => {
            spans.push(Span::styled(ch.to_string(), cursor_style));
            spans.push(Span::styled(after, text_style));
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans
}
