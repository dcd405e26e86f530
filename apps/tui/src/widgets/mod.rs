//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom status bar: latest app message on the left, key hints on the
/// right.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    let line = Line::from(vec![
        Span::raw(format!(" {msg}")),
        Span::styled(
            "  ·  ? help · q quit",
            Style::default().fg(Color::Gray),
        ),
    ]);
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}
