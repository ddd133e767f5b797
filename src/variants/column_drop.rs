//! Four-in-a-row on a 6x7 board with gravity. Moves are column indices; the
//! piece lands in the lowest empty row.

use crate::board::{Board, Pos};
use crate::detector::{self, Line, Outcome, COLUMN_DROP_RUN};
use crate::engine::MoveError;

use super::turn_based::{BoardGame, BoardRules};
use super::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDrop;

pub type ColumnDropGame = BoardGame<ColumnDrop>;

impl BoardRules for ColumnDrop {
    type Move = usize;

    const VARIANT: Variant = Variant::ColumnDrop;
    const ROWS: usize = 6;
    const COLS: usize = 7;

    fn legal_moves(board: &Board) -> Vec<usize> {
        (0..board.cols()).filter(|&c| !board.is_column_full(c)).collect()
    }

    fn resolve(board: &Board, mv: usize) -> Result<Pos, MoveError> {
        if mv >= board.cols() {
            return Err(MoveError::OutOfBounds);
        }
        board.lowest_empty_in(mv).map(|row| Pos::new(row, mv)).ok_or(MoveError::ColumnFull)
    }

    fn outcome(board: &Board) -> Outcome {
        detector::column_drop_outcome(board)
    }

    fn winning_line(board: &Board) -> Option<Line> {
        detector::winning_line(board, COLUMN_DROP_RUN).map(|(_, line)| line)
    }
}
