use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
  ___        _          _                       _
 / _ \ _   _(_)____    / \   _ __ ___ __ _  __| | ___
| | | | | | | |_  /   / _ \ | '__/ __/ _` |/ _` |/ _ \
| |_| | |_| | |/ /   / ___ \| | | (_| (_| | (_| |  __/
 \__\_\\__,_|_/___| /_/   \_\_|  \___\__,_|\__,_|\___|
"#;

pub(super) fn draw_menu(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 80, f.area());
    let block = Block::default().title("quiz-arcade").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Cyan))))
        .collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(logo_lines.len() as u16 + 1), Constraint::Min(3)])
        .split(inner(area));

    let logo_para = Paragraph::new(logo_lines).alignment(Alignment::Center);
    f.render_widget(logo_para, rows[0]);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "New game:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, item) in app.menu_items_display().into_iter().enumerate() {
        let style = if i == app.menu_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(item, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Play  [Q] Quit  [Esc] Back  [↑/↓] Move  [←/→] Change",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).alignment(Alignment::Center);
    f.render_widget(para, rows[1]);
}
