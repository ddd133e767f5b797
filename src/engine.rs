// Game engine API boundary. Every variant implements `GameEngine`, so a
// front-end (TUI, tests, a scripted driver) can run the question protocol
// without knowing which game it is driving. Variant-specific input goes
// through the closed `Game` enum.

use crate::agents::RandomOpponent;
use crate::board::BoardError;
use crate::config::ArcadeConfig;
use crate::gate::{GateError, QuestionRequest, Verdict};
use crate::progress::{ProgressReport, ProgressSink};
use crate::questions::{Question, QuestionSource, SourceError};
use crate::variants::{
    ColumnDropGame, Placement, RowMatchGame, RunnerGame, TickOutcome, Variant,
};

/// Why a move or action was refused. The game state is unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("cell is already occupied")]
    Occupied,
    #[error("column is full")]
    ColumnFull,
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    #[error("the run is not in progress")]
    NotPlaying,
    #[error("the run is not paused")]
    NotPaused,
    #[error("the run has already started")]
    AlreadyRunning,
    #[error("cannot jump while airborne")]
    NotGrounded,
    #[error("input does not apply to this game")]
    Unsupported,
}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OutOfBounds { .. } => MoveError::OutOfBounds,
            BoardError::Occupied(_) => MoveError::Occupied,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),
    /// Transient; the pending move was reverted and the player may try again.
    #[error("question unavailable: {0}")]
    QuestionUnavailable(String),
    #[error("no question is awaiting an answer")]
    PrecedenceViolation,
    #[error("response belongs to an earlier game")]
    StaleResponse,
}

impl From<GateError> for GameError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::PrecedenceViolation => GameError::PrecedenceViolation,
            GateError::QuestionUnavailable(reason) => GameError::QuestionUnavailable(reason),
            GateError::StaleResponse => GameError::StaleResponse,
        }
    }
}

pub trait GameEngine {
    fn variant(&self) -> Variant;
    fn is_terminal(&self) -> bool;

    // Question protocol
    fn question(&self) -> Option<&Question>;
    fn pending_request(&self) -> Option<QuestionRequest>;
    fn deliver_question(
        &mut self,
        request: &QuestionRequest,
        fetched: Result<Question, SourceError>,
    ) -> Result<(), GameError>;
    /// Judge `key` against the open question. Answering while nothing is
    /// open is logged and returned as [`GameError::PrecedenceViolation`] in
    /// every build; the game state does not change.
    fn answer(&mut self, key: &str) -> Result<Verdict, GameError>;

    // Lifecycle
    fn restart(&mut self);
    fn take_reports(&mut self) -> Vec<ProgressReport>;

    /// Resolve an outstanding question request synchronously. Returns
    /// `Ok(false)` when nothing was pending.
    fn fetch_question(&mut self, source: &mut dyn QuestionSource) -> Result<bool, GameError> {
        let Some(request) = self.pending_request() else {
            return Ok(false);
        };
        let fetched = source.request(request.params());
        self.deliver_question(&request, fetched)?;
        Ok(true)
    }

    /// Hand every queued report to `sink`, oldest first.
    fn flush_reports(&mut self, sink: &mut dyn ProgressSink) {
        for report in self.take_reports() {
            sink.report(&report);
        }
    }
}

/// One discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Row-match cell index, row-major.
    Cell(usize),
    /// Column-drop column index.
    Column(usize),
    Jump,
    Tick,
    Start,
    TogglePause,
}

/// What an accepted input led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Placed(Placement),
    Ticked(TickOutcome),
    Done,
}

impl Applied {
    /// The question request this input opened, if any.
    pub fn request(&self) -> Option<&QuestionRequest> {
        match self {
            Applied::Placed(Placement::Gated(r)) | Applied::Ticked(TickOutcome::Collided(r)) => {
                Some(r)
            }
            _ => None,
        }
    }
}

/// The closed set of playable games.
#[derive(Debug, Clone)]
pub enum Game {
    RowMatch(RowMatchGame),
    ColumnDrop(ColumnDropGame),
    Runner(RunnerGame),
}

impl Game {
    pub fn new(variant: Variant, config: &ArcadeConfig) -> Self {
        let params = config.questions.params();
        match variant {
            Variant::RowMatch => Game::RowMatch(RowMatchGame::new(
                params,
                RandomOpponent::new(config.opponent_profile()),
            )),
            Variant::ColumnDrop => Game::ColumnDrop(ColumnDropGame::new(
                params,
                RandomOpponent::new(config.opponent_profile()),
            )),
            Variant::Runner => {
                Game::Runner(RunnerGame::new(config.runner.clone(), params, config.runner_seed()))
            }
        }
    }

    pub fn apply(&mut self, input: Input) -> Result<Applied, GameError> {
        match (self, input) {
            (Game::RowMatch(g), Input::Cell(idx)) => g.play(idx).map(Applied::Placed),
            (Game::ColumnDrop(g), Input::Column(col)) => g.play(col).map(Applied::Placed),
            (Game::Runner(g), Input::Jump) => g.jump().map(|_| Applied::Done),
            (Game::Runner(g), Input::Tick) => g.tick().map(Applied::Ticked),
            (Game::Runner(g), Input::Start) => g.start().map(|_| Applied::Done),
            (Game::Runner(g), Input::TogglePause) => g.toggle_pause().map(|_| Applied::Done),
            _ => Err(MoveError::Unsupported.into()),
        }
    }

    /// Whether the driver should schedule simulation ticks right now.
    pub fn wants_ticks(&self) -> bool {
        match self {
            Game::Runner(g) => g.wants_ticks(),
            _ => false,
        }
    }

    fn engine(&self) -> &dyn GameEngine {
        match self {
            Game::RowMatch(g) => g,
            Game::ColumnDrop(g) => g,
            Game::Runner(g) => g,
        }
    }

    fn engine_mut(&mut self) -> &mut dyn GameEngine {
        match self {
            Game::RowMatch(g) => g,
            Game::ColumnDrop(g) => g,
            Game::Runner(g) => g,
        }
    }
}

impl GameEngine for Game {
    fn variant(&self) -> Variant {
        self.engine().variant()
    }
    fn is_terminal(&self) -> bool {
        self.engine().is_terminal()
    }
    fn question(&self) -> Option<&Question> {
        self.engine().question()
    }
    fn pending_request(&self) -> Option<QuestionRequest> {
        self.engine().pending_request()
    }
    fn deliver_question(
        &mut self,
        request: &QuestionRequest,
        fetched: Result<Question, SourceError>,
    ) -> Result<(), GameError> {
        self.engine_mut().deliver_question(request, fetched)
    }
    fn answer(&mut self, key: &str) -> Result<Verdict, GameError> {
        self.engine_mut().answer(key)
    }
    fn restart(&mut self) {
        self.engine_mut().restart()
    }
    fn take_reports(&mut self) -> Vec<ProgressReport> {
        self.engine_mut().take_reports()
    }
}
