//! quiz-arcade: small games where every move is earned with a question
//!
//! Goals:
//! - Three games behind one engine boundary: three-in-a-row, four-in-a-row
//!   with gravity, and a single-lane obstacle runner
//! - One shared question gate: a wrong answer never lets a move through
//! - Deterministic when seeded; no panics for invalid input
//!
//! ## Quick start: gate a row-match move
//! ```
//! use quiz_arcade::engine::GameEngine;
//! use quiz_arcade::questions::{Question, QuestionParams};
//! use quiz_arcade::variants::{Placement, RowMatchGame, TurnState};
//!
//! let mut game = RowMatchGame::seeded(QuestionParams::default(), 7);
//! let Placement::Gated(request) = game.play(0).unwrap() else { unreachable!() };
//!
//! let question = Question::try_new(
//!     "What is 5 + 3?",
//!     vec![("A", "7".to_string()), ("B", "8".to_string())],
//!     "B",
//! ).unwrap();
//! game.deliver_question(&request, Ok(question)).unwrap();
//! assert!(game.answer("B").unwrap().is_correct());
//!
//! assert_eq!(game.board().occupied(), 2);
//! assert_eq!(game.state(), TurnState::PlayerTurn);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin quiz-arcade
//! ```

pub mod agents;
pub mod board;
pub mod config;
pub mod detector;
pub mod engine;
pub mod gate;
pub mod progress;
pub mod questions;
pub mod tui;
pub mod variants;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
