use crate::engine::GameEngine;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

/// The open question. A retry shows the very same question again.
pub(super) fn draw_question(f: &mut Frame, app: &AppState) {
    let Some(question) = app.game.question() else {
        return;
    };
    let area = centered_rect(60, 50, f.area());
    let block = Block::default()
        .title(" Answer to continue ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines = vec![
        Line::from(Span::styled(
            question.prompt().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for option in question.options() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}) ", option.key), Style::default().fg(Color::Yellow)),
            Span::raw(option.text.clone()),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(status) = app.status() {
        lines.push(Line::from(Span::styled(status.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Press the letter of your answer",
        Style::default().add_modifier(Modifier::DIM),
    )));

    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}
