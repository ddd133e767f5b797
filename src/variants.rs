//! Game variants.
//!
//! The set is closed: two board games sharing the [`turn_based`] state
//! machine, and the lane runner.

pub mod column_drop;
pub mod row_match;
pub mod runner;
pub mod turn_based;

pub use column_drop::{ColumnDrop, ColumnDropGame};
pub use row_match::{RowMatch, RowMatchGame};
pub use runner::{RunState, RunnerConfig, RunnerGame, TickOutcome};
pub use turn_based::{BoardGame, BoardRules, Placement, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    RowMatch,
    ColumnDrop,
    Runner,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::RowMatch, Variant::ColumnDrop, Variant::Runner];

    pub fn label(self) -> &'static str {
        match self {
            Variant::RowMatch => "Tic Tac Toe",
            Variant::ColumnDrop => "Connect Four",
            Variant::Runner => "Geometry Runner",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Variant::RowMatch => Variant::ColumnDrop,
            Variant::ColumnDrop => Variant::Runner,
            Variant::Runner => Variant::RowMatch,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Variant::RowMatch => Variant::Runner,
            Variant::ColumnDrop => Variant::RowMatch,
            Variant::Runner => Variant::ColumnDrop,
        }
    }
}
