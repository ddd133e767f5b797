//! Agents: the scripted opponent that replies after a correctly answered
//! question.
//!
//! A policy sees only the board and the legal moves the variant computed. It
//! keeps no game state between calls.

use crate::board::Board;

/// Chooses the opponent's reply from a non-empty set of legal moves.
pub trait OpponentPolicy {
    /// Select one move from `legal`.
    ///
    /// # Panics
    ///
    /// Callers only invoke the policy on a non-terminal board, which always has
    /// a legal move. An empty `legal` slice is a caller bug and panics.
    fn select<M: Copy>(&mut self, board: &Board, legal: &[M]) -> M;
}

mod random;

pub use random::{OpponentProfile, RandomOpponent};
