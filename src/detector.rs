//! Terminal-state detection over a board snapshot.
//!
//! Lines are scanned in a fixed order so that a board holding more than one
//! completed line always reports the same winner:
//!
//! 1. horizontal runs, rows top to bottom, left to right
//! 2. vertical runs, same start order
//! 3. down-right diagonals
//! 4. down-left diagonals
//!
//! The first completed run in that order decides the winner. For the 3x3
//! board this is exactly rows, then columns, then the two diagonals.

use crate::board::{Board, Cell, Pos};

/// Run length that wins three-in-a-row.
pub const ROW_MATCH_RUN: usize = 3;
/// Run length that wins four-in-a-row.
pub const COLUMN_DROP_RUN: usize = 4;

/// Result of evaluating a board. Always recomputed from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    None,
    PlayerWin,
    OpponentWin,
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::None)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::None => "In progress",
            Outcome::PlayerWin => "You win",
            Outcome::OpponentWin => "Opponent wins",
            Outcome::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    DownRight,
    DownLeft,
}

/// Tie-break order for simultaneous lines.
pub const SCAN_ORDER: [Direction; 4] =
    [Direction::Horizontal, Direction::Vertical, Direction::DownRight, Direction::DownLeft];

impl Direction {
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::DownLeft => (1, -1),
        }
    }
}

/// A straight run of `len` cells starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: Pos,
    pub direction: Direction,
    pub len: usize,
}

impl Line {
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let (dr, dc) = self.direction.step();
        (0..self.len).map(move |k| {
            let k = k as isize;
            Pos::new(
                (self.start.row as isize + dr * k) as usize,
                (self.start.col as isize + dc * k) as usize,
            )
        })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells().any(|p| p == pos)
    }

    fn fits(board: &Board, start: Pos, direction: Direction, len: usize) -> bool {
        let (dr, dc) = direction.step();
        let span = len as isize - 1;
        let end_row = start.row as isize + dr * span;
        let end_col = start.col as isize + dc * span;
        end_row >= 0
            && end_col >= 0
            && (end_row as usize) < board.rows()
            && (end_col as usize) < board.cols()
    }
}

/// Finds the first mono-owned run of `run` cells in scan order.
pub fn winning_line(board: &Board, run: usize) -> Option<(Cell, Line)> {
    if run == 0 {
        return None;
    }
    for direction in SCAN_ORDER {
        for (start, first) in board.iter() {
            if first.is_empty() || !Line::fits(board, start, direction, run) {
                continue;
            }
            let line = Line { start, direction, len: run };
            if line.cells().all(|p| board.get(p) == Some(first)) {
                return Some((first, line));
            }
        }
    }
    None
}

/// Evaluates `board` for a game won by `run` in a row. Draw requires a full
/// board with no completed line.
pub fn outcome(board: &Board, run: usize) -> Outcome {
    match winning_line(board, run) {
        Some((Cell::Player, _)) => Outcome::PlayerWin,
        Some((Cell::Opponent, _)) => Outcome::OpponentWin,
        _ if board.is_full() => Outcome::Draw,
        _ => Outcome::None,
    }
}

pub fn row_match_outcome(board: &Board) -> Outcome {
    outcome(board, ROW_MATCH_RUN)
}

pub fn column_drop_outcome(board: &Board) -> Outcome {
    outcome(board, COLUMN_DROP_RUN)
}
