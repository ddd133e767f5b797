//! Three-in-a-row on a 3x3 board. Moves are cell indices 0..9 in row-major
//! order.

use crate::board::{Board, Pos};
use crate::detector::{self, Line, Outcome, ROW_MATCH_RUN};
use crate::engine::MoveError;

use super::turn_based::{BoardGame, BoardRules};
use super::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch;

pub type RowMatchGame = BoardGame<RowMatch>;

impl RowMatch {
    pub const SIZE: usize = 3;

    pub fn pos_of(index: usize) -> Pos {
        Pos::new(index / Self::SIZE, index % Self::SIZE)
    }

    pub fn index_of(pos: Pos) -> usize {
        pos.row * Self::SIZE + pos.col
    }
}

impl BoardRules for RowMatch {
    type Move = usize;

    const VARIANT: Variant = Variant::RowMatch;
    const ROWS: usize = Self::SIZE;
    const COLS: usize = Self::SIZE;

    fn legal_moves(board: &Board) -> Vec<usize> {
        board.empty_cells().into_iter().map(Self::index_of).collect()
    }

    fn resolve(board: &Board, mv: usize) -> Result<Pos, MoveError> {
        if mv >= Self::ROWS * Self::COLS {
            return Err(MoveError::OutOfBounds);
        }
        let pos = Self::pos_of(mv);
        match board.get(pos) {
            Some(cell) if cell.is_empty() => Ok(pos),
            Some(_) => Err(MoveError::Occupied),
            None => Err(MoveError::OutOfBounds),
        }
    }

    fn outcome(board: &Board) -> Outcome {
        detector::row_match_outcome(board)
    }

    fn winning_line(board: &Board) -> Option<Line> {
        detector::winning_line(board, ROW_MATCH_RUN).map(|(_, line)| line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn index_mapping_is_row_major() {
        assert_eq!(RowMatch::pos_of(0), Pos::new(0, 0));
        assert_eq!(RowMatch::pos_of(5), Pos::new(1, 2));
        assert_eq!(RowMatch::index_of(Pos::new(2, 1)), 7);
    }

    #[test]
    fn legal_moves_are_empty_cells() {
        let mut b = Board::new(3, 3);
        b.set(Pos::new(0, 0), Cell::Player).unwrap();
        b.set(Pos::new(1, 1), Cell::Opponent).unwrap();
        assert_eq!(RowMatch::legal_moves(&b), vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(RowMatch::resolve(&b, 4), Err(MoveError::Occupied));
        assert_eq!(RowMatch::resolve(&b, 9), Err(MoveError::OutOfBounds));
        assert_eq!(RowMatch::resolve(&b, 8), Ok(Pos::new(2, 2)));
    }
}
