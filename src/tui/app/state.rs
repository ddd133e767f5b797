use crate::config::ArcadeConfig;
use crate::engine::{Game, GameEngine, GameError, Input};
use crate::gate::Verdict;
use crate::progress::{ProgressBook, VariantProgress};
use crate::questions::{Difficulty, QuestionBank, SourceError};
use crate::variants::{RowMatch, RunState, TurnState, Variant};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Play,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Place at the cursor (board games).
    Place,
    /// Start a run, or jump while running.
    Jump,
    TogglePause,
    Answer(char),
    Restart,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub config: ArcadeConfig,
    pub game: Game,
    pub bank: QuestionBank,
    pub progress: ProgressBook,
    /// Cell index (row-match) or column (column-drop) under the cursor.
    pub cursor: usize,
    // Menu selections being edited
    pub menu_index: usize,
    pub cfg_variant: Variant,
    pub cfg_subject: String,
    pub cfg_difficulty: Option<Difficulty>,
    help_open: bool,
    status: Option<String>,
    status_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_bank(ArcadeConfig::default(), QuestionBank::builtin())
    }
}

impl AppState {
    /// Answers between rest reminders.
    pub const REST_EVERY: u32 = 5;
    const STATUS_TTL: Duration = Duration::from_secs(4);

    pub fn new(config: ArcadeConfig) -> Result<Self, SourceError> {
        let bank = config.question_bank()?;
        Ok(Self::with_bank(config, bank))
    }

    pub fn with_bank(config: ArcadeConfig, bank: QuestionBank) -> Self {
        let variant = Variant::RowMatch;
        let game = Game::new(variant, &config);
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            cfg_subject: config.questions.subject.clone(),
            cfg_difficulty: config.questions.difficulty,
            cfg_variant: variant,
            config,
            game,
            bank,
            progress: ProgressBook::new(),
            cursor: 0,
            menu_index: 0,
            help_open: false,
            status: None,
            status_at: None,
        }
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    /// Transient message for the status line.
    pub fn status(&self) -> Option<&str> {
        match self.status_at {
            Some(at) if at.elapsed() > Self::STATUS_TTL => None,
            _ => self.status.as_deref(),
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
        self.status_at = Some(Instant::now());
    }

    fn clear_status(&mut self) {
        self.status = None;
        self.status_at = None;
    }

    /// Counters for the current user in the current game.
    pub fn current_progress(&self) -> VariantProgress {
        self.progress
            .user(&self.config.tui.user)
            .map(|p| *p.get(self.game.variant()))
            .unwrap_or_default()
    }

    /// Whether input should go to the question popup.
    pub fn question_open(&self) -> bool {
        self.game.question().is_some()
    }

    /// Whether `key` names one of the open question's options. Letters are
    /// matched after uppercasing.
    pub fn is_option_key(&self, key: char) -> bool {
        let key = key.to_ascii_uppercase().to_string();
        self.game.question().is_some_and(|q| q.option(&key).is_some())
    }

    fn cursor_limit(&self) -> usize {
        match &self.game {
            Game::RowMatch(_) => RowMatch::SIZE * RowMatch::SIZE,
            Game::ColumnDrop(g) => g.board().cols(),
            Game::Runner(_) => 1,
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let limit = self.cursor_limit();
        self.cursor = match &self.game {
            Game::RowMatch(_) => {
                let pos = RowMatch::pos_of(self.cursor.min(limit - 1));
                let size = RowMatch::SIZE as isize;
                let row = (pos.row as isize + dy).rem_euclid(size) as usize;
                let col = (pos.col as isize + dx).rem_euclid(size) as usize;
                row * RowMatch::SIZE + col
            }
            Game::ColumnDrop(_) => (self.cursor as isize + dx).rem_euclid(limit as isize) as usize,
            Game::Runner(_) => 0,
        };
    }

    fn report_error(&mut self, err: &GameError) {
        match err {
            GameError::QuestionUnavailable(_) => {
                self.set_status("Couldn't load a question. Please try again.")
            }
            GameError::InvalidMove(e) => self.set_status(format!("Not allowed: {e}")),
            GameError::PrecedenceViolation | GameError::StaleResponse => {
                tracing::warn!(error = %err, "ignored input");
            }
        }
    }

    /// Resolve a freshly opened question request against the bank.
    fn fetch_question(&mut self) {
        if let Err(err) = self.game.fetch_question(&mut self.bank) {
            self.report_error(&err);
        }
        self.flush_progress();
    }

    fn flush_progress(&mut self) {
        let mut sink = self.progress.sink(&self.config.tui.user);
        self.game.flush_reports(&mut sink);
    }

    fn apply(&mut self, input: Input) -> bool {
        if self.scene != Scene::Play || self.question_open() {
            return false;
        }
        match self.game.apply(input) {
            Ok(applied) => {
                if applied.request().is_some() {
                    self.fetch_question();
                } else {
                    self.flush_progress();
                }
                if self.game.is_terminal() {
                    self.set_status(self.outcome_message());
                }
                true
            }
            Err(err) => {
                self.report_error(&err);
                false
            }
        }
    }

    fn place(&mut self) -> bool {
        let input = match &self.game {
            Game::RowMatch(_) => Input::Cell(self.cursor),
            Game::ColumnDrop(_) => Input::Column(self.cursor),
            Game::Runner(_) => return false,
        };
        self.clear_status();
        self.apply(input)
    }

    fn jump(&mut self) -> bool {
        let Game::Runner(g) = &self.game else {
            return false;
        };
        let input = match g.state() {
            RunState::Start | RunState::Ended => Input::Start,
            _ => Input::Jump,
        };
        self.apply(input)
    }

    fn answer(&mut self, key: char) -> bool {
        if !self.is_option_key(key) {
            return false;
        }
        let key = key.to_ascii_uppercase().to_string();
        let result = self.game.answer(&key);
        self.flush_progress();
        match result {
            Ok(Verdict::Correct) => {
                if self.game.is_terminal() {
                    self.set_status(self.outcome_message());
                } else {
                    self.set_status("Correct!");
                }
                if self.current_progress().rest_due(Self::REST_EVERY) {
                    self.set_status("Great work! Time for a short break.");
                }
                true
            }
            Ok(Verdict::Incorrect) => {
                match self.game.variant() {
                    Variant::Runner => self.set_status(self.outcome_message()),
                    _ => self.set_status("Not quite. Try again!"),
                }
                true
            }
            Err(err) => {
                self.report_error(&err);
                false
            }
        }
    }

    pub fn outcome_message(&self) -> String {
        match &self.game {
            Game::RowMatch(g) if g.state() == TurnState::Terminal => {
                g.outcome().label().to_string()
            }
            Game::ColumnDrop(g) if g.state() == TurnState::Terminal => {
                g.outcome().label().to_string()
            }
            Game::Runner(g) if g.state() == RunState::Ended => {
                format!("Game over! Final score: {}", g.score())
            }
            _ => String::new(),
        }
    }

    pub fn restart(&mut self) {
        self.game.restart();
        self.cursor = 0;
        self.clear_status();
    }

    /// Advance the runner one step when it is running. Nothing is scheduled
    /// while a question is open, the run is paused, or the game is over.
    pub fn on_tick(&mut self) {
        if self.scene == Scene::Play && self.game.wants_ticks() {
            let _ = self.apply(Input::Tick);
        }
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Play {
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::CursorLeft => self.cursor_step(-1, 0),
            InputAction::CursorRight => self.cursor_step(1, 0),
            InputAction::CursorUp => self.cursor_step(0, -1),
            InputAction::CursorDown => self.cursor_step(0, 1),
            InputAction::Place => self.place(),
            InputAction::Jump => self.jump(),
            InputAction::TogglePause => self.apply(Input::TogglePause),
            InputAction::Answer(key) => self.answer(key),
            InputAction::Restart => {
                if self.scene == Scene::Play {
                    self.restart();
                    return true;
                }
                false
            }
        }
    }

    fn cursor_step(&mut self, dx: isize, dy: isize) -> bool {
        if self.scene != Scene::Play || self.question_open() {
            return false;
        }
        self.move_cursor(dx, dy);
        true
    }
}
