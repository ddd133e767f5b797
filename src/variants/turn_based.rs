use crate::agents::{OpponentPolicy, RandomOpponent};
use crate::board::{Board, Cell, Pos};
use crate::detector::{Line, Outcome};
use crate::engine::{GameEngine, GameError, MoveError};
use crate::gate::{GateError, QuestionGate, QuestionRequest, Verdict};
use crate::progress::{Finish, ProgressReport};
use crate::questions::{Question, QuestionParams, SourceError};
use core::fmt;
use core::marker::PhantomData;

use super::Variant;

/// Rules that distinguish one alternating board game from another.
pub trait BoardRules {
    type Move: Copy + fmt::Debug + PartialEq;

    const VARIANT: Variant;
    const ROWS: usize;
    const COLS: usize;

    /// Moves the player (or opponent) may make on `board`.
    fn legal_moves(board: &Board) -> Vec<Self::Move>;

    /// The cell a move would fill, or why it cannot be made.
    fn resolve(board: &Board, mv: Self::Move) -> Result<Pos, MoveError>;

    fn outcome(board: &Board) -> Outcome;

    fn winning_line(board: &Board) -> Option<Line>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    PlayerTurn,
    OpponentTurn,
    /// The player's placement is on the board; a question is loading or open.
    AwaitingQuestion,
    /// The placement was rolled back; the same question is shown again.
    AwaitingRetry,
    Terminal,
}

/// What a successful player move led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The move stands pending a question; resolve this request.
    Gated(QuestionRequest),
    /// The move ended the game before any question was asked.
    Finished(Outcome),
}

/// Alternating player/opponent game where every player move is gated by a
/// question.
#[derive(Debug, Clone)]
pub struct BoardGame<R: BoardRules, P: OpponentPolicy = RandomOpponent> {
    board: Board,
    state: TurnState,
    pending: Option<Pos>,
    gate: QuestionGate,
    opponent: P,
    last_opponent_move: Option<R::Move>,
    reports: Vec<ProgressReport>,
    _rules: PhantomData<R>,
}

impl<R: BoardRules> BoardGame<R, RandomOpponent> {
    /// A game with the random opponent seeded for replay.
    pub fn seeded(params: QuestionParams, seed: u64) -> Self {
        Self::new(params, RandomOpponent::seeded(seed))
    }
}

impl<R: BoardRules, P: OpponentPolicy> BoardGame<R, P> {
    pub fn new(params: QuestionParams, opponent: P) -> Self {
        Self {
            board: Board::new(R::ROWS, R::COLS),
            state: TurnState::PlayerTurn,
            pending: None,
            gate: QuestionGate::new(params),
            opponent,
            last_opponent_move: None,
            reports: Vec::new(),
            _rules: PhantomData,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn gate(&self) -> &QuestionGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut QuestionGate {
        &mut self.gate
    }

    /// Evaluated from the board on every call.
    pub fn outcome(&self) -> Outcome {
        R::outcome(&self.board)
    }

    pub fn winning_line(&self) -> Option<Line> {
        R::winning_line(&self.board)
    }

    pub fn legal_moves(&self) -> Vec<R::Move> {
        R::legal_moves(&self.board)
    }

    /// Cell of the player move currently held behind the gate.
    pub fn pending_move(&self) -> Option<Pos> {
        self.pending
    }

    pub fn last_opponent_move(&self) -> Option<R::Move> {
        self.last_opponent_move
    }

    /// Place the player's piece.
    ///
    /// A winning or drawing move ends the game at once; any other legal move
    /// opens the question gate.
    pub fn play(&mut self, mv: R::Move) -> Result<Placement, GameError> {
        if self.state != TurnState::PlayerTurn {
            return Err(MoveError::NotPlayerTurn.into());
        }
        let pos = R::resolve(&self.board, mv)?;
        self.board.set(pos, Cell::Player).map_err(MoveError::from)?;
        tracing::debug!(variant = ?R::VARIANT, ?mv, %pos, "player placed");

        let outcome = self.outcome();
        if outcome.is_terminal() {
            self.finish(outcome);
            return Ok(Placement::Finished(outcome));
        }

        match self.gate.request() {
            Ok(request) => {
                self.pending = Some(pos);
                self.state = TurnState::AwaitingQuestion;
                Ok(Placement::Gated(request))
            }
            Err(err) => {
                let _ = self.board.undo(pos);
                Err(err.into())
            }
        }
    }

    fn rollback(&mut self) {
        if let Some(pos) = self.pending {
            if self.board.get(pos) == Some(Cell::Player) {
                let _ = self.board.undo(pos);
                tracing::debug!(%pos, "rolled back player placement");
            }
        }
    }

    fn opponent_turn(&mut self) -> Result<(), GameError> {
        self.state = TurnState::OpponentTurn;
        let legal = R::legal_moves(&self.board);
        let mv = self.opponent.select(&self.board, &legal);
        let pos = R::resolve(&self.board, mv)?;
        self.board.set(pos, Cell::Opponent).map_err(MoveError::from)?;
        self.last_opponent_move = Some(mv);
        tracing::debug!(variant = ?R::VARIANT, ?mv, %pos, "opponent placed");

        let outcome = self.outcome();
        if outcome.is_terminal() {
            self.finish(outcome);
        } else {
            self.state = TurnState::PlayerTurn;
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state = TurnState::Terminal;
        self.pending = None;
        tracing::info!(variant = ?R::VARIANT, ?outcome, "game over");
        self.reports.push(ProgressReport::finished(R::VARIANT, Finish::Board(outcome)));
    }
}

impl<R: BoardRules, P: OpponentPolicy> GameEngine for BoardGame<R, P> {
    fn variant(&self) -> Variant {
        R::VARIANT
    }

    fn is_terminal(&self) -> bool {
        self.state == TurnState::Terminal
    }

    fn question(&self) -> Option<&Question> {
        self.gate.question()
    }

    fn pending_request(&self) -> Option<QuestionRequest> {
        self.gate.pending()
    }

    fn deliver_question(
        &mut self,
        request: &QuestionRequest,
        fetched: Result<Question, SourceError>,
    ) -> Result<(), GameError> {
        match self.gate.deliver(request, fetched) {
            Ok(()) => Ok(()),
            Err(GateError::QuestionUnavailable(reason)) => {
                self.rollback();
                self.pending = None;
                self.state = TurnState::PlayerTurn;
                Err(GameError::QuestionUnavailable(reason))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Correct: the move stands (re-placed if it had been rolled back) and the
    /// opponent replies. Incorrect: the move is rolled back and the same
    /// question stays open.
    fn answer(&mut self, key: &str) -> Result<Verdict, GameError> {
        if !matches!(self.state, TurnState::AwaitingQuestion | TurnState::AwaitingRetry) {
            tracing::warn!(state = ?self.state, "answer submitted outside of a question");
            return Err(GameError::PrecedenceViolation);
        }
        let verdict = self.gate.submit(key)?;
        self.reports.push(ProgressReport::answered(R::VARIANT, verdict.is_correct()));

        match verdict {
            Verdict::Correct => {
                if self.state == TurnState::AwaitingRetry {
                    if let Some(pos) = self.pending {
                        self.board.set(pos, Cell::Player).map_err(MoveError::from)?;
                    }
                }
                self.pending = None;
                self.opponent_turn()?;
            }
            Verdict::Incorrect => {
                self.rollback();
                self.state = TurnState::AwaitingRetry;
            }
        }
        Ok(verdict)
    }

    fn restart(&mut self) {
        self.board = Board::new(R::ROWS, R::COLS);
        self.state = TurnState::PlayerTurn;
        self.pending = None;
        self.last_opponent_move = None;
        self.gate.reset();
    }

    fn take_reports(&mut self) -> Vec<ProgressReport> {
        std::mem::take(&mut self.reports)
    }
}
