use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner(area));

    let p = app.current_progress();
    let counters = format!(
        "W {}  L {}  D {}  Best {}  Answered {}  Accuracy {}%",
        p.wins,
        p.losses,
        p.draws,
        p.high_score,
        p.questions_answered,
        p.accuracy()
    );
    let left = vec![
        Line::from(counters),
        Line::from(Span::styled(
            app.status().unwrap_or_default().to_string(),
            Style::default().fg(Color::Yellow),
        )),
    ];
    f.render_widget(Paragraph::new(left), cols[0]);

    let keys = vec![
        Line::from("Arrows move  Enter place  Space jump"),
        Line::from("P pause  R restart  M menu  ? help  Q quit"),
    ];
    f.render_widget(
        Paragraph::new(keys).style(Style::default().add_modifier(Modifier::DIM)),
        cols[1],
    );
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 70, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Board games:", bold)),
        Line::from("- Arrows: move the cursor"),
        Line::from("- Enter: place your piece"),
        Line::from("- Answer the question to keep your move; a wrong answer takes it back"),
        Line::from(""),
        Line::from(Span::styled("Geometry Runner:", bold)),
        Line::from("- Space: start, then jump"),
        Line::from("- P: pause or resume"),
        Line::from("- After a crash, a right answer restarts the run; a wrong one ends it"),
        Line::from(""),
        Line::from(Span::styled("Anywhere:", bold)),
        Line::from("- R: restart  M: menu  Q: quit"),
        Line::from(""),
        Line::from(Span::styled("Close: ? or Esc", Style::default().add_modifier(Modifier::DIM))),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}
