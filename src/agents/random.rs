use crate::board::Board;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::OpponentPolicy;

/// Configuration for the random opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct OpponentProfile {
    pub rng_seed: Option<u64>,
}

impl OpponentProfile {
    /// Set a deterministic RNG seed for reproducible replies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Picks uniformly among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: ChaCha8Rng,
}

impl RandomOpponent {
    pub fn new(profile: OpponentProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(OpponentProfile::default().with_seed(seed))
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new(OpponentProfile::default())
    }
}

impl OpponentPolicy for RandomOpponent {
    fn select<M: Copy>(&mut self, _board: &Board, legal: &[M]) -> M {
        assert!(!legal.is_empty(), "opponent policy invoked without legal moves");
        legal[self.rng.random_range(0..legal.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_choices_are_reproducible() {
        let board = Board::new(3, 3);
        let legal: Vec<usize> = (0..9).collect();
        let mut a = RandomOpponent::seeded(11);
        let mut b = RandomOpponent::seeded(11);
        let xs: Vec<usize> = (0..32).map(|_| a.select(&board, &legal)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.select(&board, &legal)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn single_legal_move_is_always_chosen() {
        let board = Board::new(6, 7);
        let mut p = RandomOpponent::seeded(3);
        for _ in 0..10 {
            assert_eq!(p.select(&board, &[4usize]), 4);
        }
    }

    #[test]
    #[should_panic(expected = "without legal moves")]
    fn empty_legal_set_is_a_precondition_violation() {
        let board = Board::new(3, 3);
        let mut p = RandomOpponent::seeded(1);
        let legal: [usize; 0] = [];
        let _ = p.select(&board, &legal);
    }
}
