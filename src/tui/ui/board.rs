use crate::board::{Board, Cell, Pos};
use crate::detector::Line as WinLine;
use crate::engine::{Game, GameEngine};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_fixed, inner};

/// Terminal columns per cell.
const CELL_W: u16 = 4;

fn cell_style(cell: Cell) -> Style {
    match cell {
        Cell::Empty => Style::default().add_modifier(Modifier::DIM),
        Cell::Player => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Cell::Opponent => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

pub(super) fn draw_board(
    f: &mut Frame,
    area: Rect,
    board: &Board,
    winning: Option<WinLine>,
    app: &AppState,
) {
    let title = format!(" {} ", app.game.variant().label());
    f.render_widget(Block::default().title(title).borders(Borders::ALL), area);

    let column_drop = matches!(app.game, Game::ColumnDrop(_));
    let mut lines: Vec<Line> = Vec::new();
    if column_drop {
        let marker: String = (0..board.cols())
            .map(|c| if c == app.cursor { "  v " } else { "    " })
            .collect();
        lines.push(Line::from(Span::styled(marker, Style::default().fg(Color::Yellow))));
    }
    for row in 0..board.rows() {
        let mut spans = Vec::with_capacity(board.cols());
        for (col, &cell) in board.row(row).unwrap_or_default().iter().enumerate() {
            let pos = Pos::new(row, col);
            let mut style = cell_style(cell);
            if winning.as_ref().is_some_and(|l| l.contains(pos)) {
                style = style.bg(Color::Green).fg(Color::Black);
            }
            let under_cursor = !column_drop && row * board.cols() + col == app.cursor;
            let text = if under_cursor {
                style = style.add_modifier(Modifier::REVERSED);
                format!("[{}] ", cell.symbol())
            } else {
                format!(" {}  ", cell.symbol())
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let height = lines.len() as u16;
    let width = board.cols() as u16 * CELL_W;
    let grid = centered_fixed(width, height, inner(area));
    f.render_widget(Paragraph::new(lines), grid);
}
