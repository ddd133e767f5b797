//! Single-lane obstacle runner.
//!
//! Screen coordinates: x grows to the right, y grows downwards, and every
//! body is an axis-aligned rectangle whose `(x, y)` is its top-left corner.
//! The simulation only advances through [`RunnerGame::tick`], and only while
//! the run is [`RunState::Playing`].
//!
//! A collision opens the question gate. A correct answer restarts the run
//! from scratch; a wrong answer ends it with the score frozen. There is no
//! second attempt at the same question here, unlike the board games.

use crate::config::ConfigError;
use crate::engine::{GameEngine, GameError, MoveError};
use crate::gate::{GateError, QuestionGate, QuestionRequest, Verdict};
use crate::progress::{Finish, ProgressReport};
use crate::questions::{Question, QuestionParams, SourceError};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::Variant;

/// Lane geometry, physics and difficulty ramp. Distances are in lane units,
/// times in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub lane_width: f32,
    pub lane_height: f32,
    pub actor_x: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    pub obstacle_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    /// Added to the vertical velocity every tick.
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is upwards).
    pub jump_velocity: f32,
    pub obstacle_speed: f32,
    /// Extra obstacle speed per difficulty level.
    pub speed_step: f32,
    /// Ticks between spawns at level 0.
    pub spawn_interval: u32,
    /// Ticks removed from the spawn interval per difficulty level.
    pub spawn_interval_step: u32,
    pub min_spawn_interval: u32,
    /// Score needed per difficulty level.
    pub level_every: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            lane_width: 800.0,
            lane_height: 400.0,
            actor_x: 50.0,
            actor_width: 30.0,
            actor_height: 50.0,
            obstacle_width: 20.0,
            obstacle_min_height: 30.0,
            obstacle_max_height: 30.0,
            gravity: 0.5,
            jump_velocity: -12.0,
            obstacle_speed: 5.0,
            speed_step: 0.5,
            spawn_interval: 120,
            spawn_interval_step: 10,
            min_spawn_interval: 50,
            level_every: 500,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("runner.lane_width", self.lane_width),
            ("runner.lane_height", self.lane_height),
            ("runner.actor_width", self.actor_width),
            ("runner.actor_height", self.actor_height),
            ("runner.obstacle_width", self.obstacle_width),
            ("runner.obstacle_min_height", self.obstacle_min_height),
            ("runner.gravity", self.gravity),
            ("runner.obstacle_speed", self.obstacle_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Validation(format!("{name} must be > 0")));
            }
        }
        if self.jump_velocity >= 0.0 {
            return Err(ConfigError::Validation("runner.jump_velocity must be < 0".into()));
        }
        if self.speed_step < 0.0 {
            return Err(ConfigError::Validation("runner.speed_step must be >= 0".into()));
        }
        if self.obstacle_min_height > self.obstacle_max_height {
            return Err(ConfigError::Validation(
                "runner.obstacle_min_height must be <= runner.obstacle_max_height".into(),
            ));
        }
        if self.actor_height > self.lane_height || self.obstacle_max_height > self.lane_height {
            return Err(ConfigError::Validation("runner bodies must fit in the lane".into()));
        }
        if self.min_spawn_interval == 0 || self.spawn_interval == 0 {
            return Err(ConfigError::Validation("runner spawn intervals must be > 0".into()));
        }
        if self.level_every == 0 {
            return Err(ConfigError::Validation("runner.level_every must be > 0".into()));
        }
        Ok(())
    }

    fn ground_y(&self) -> f32 {
        self.lane_height - self.actor_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Strict overlap; touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub rect: Rect,
    pub velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Playing,
    Paused,
    AwaitingQuestion,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    /// The actor hit an obstacle; resolve this request.
    Collided(QuestionRequest),
}

#[derive(Debug, Clone)]
pub struct RunnerGame {
    config: RunnerConfig,
    state: RunState,
    actor: Actor,
    obstacles: Vec<Obstacle>,
    score: u64,
    level: u32,
    since_spawn: u32,
    gate: QuestionGate,
    rng: ChaCha8Rng,
    reports: Vec<ProgressReport>,
}

impl RunnerGame {
    pub fn new(config: RunnerConfig, params: QuestionParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut bytes = [0u8; 32];
                rand::rng().fill_bytes(&mut bytes);
                ChaCha8Rng::from_seed(bytes)
            }
        };
        let actor = Self::grounded_actor(&config);
        Self {
            config,
            state: RunState::Start,
            actor,
            obstacles: Vec::new(),
            score: 0,
            level: 0,
            since_spawn: 0,
            gate: QuestionGate::new(params),
            rng,
            reports: Vec::new(),
        }
    }

    fn grounded_actor(config: &RunnerConfig) -> Actor {
        Actor {
            rect: Rect {
                x: config.actor_x,
                y: config.ground_y(),
                w: config.actor_width,
                h: config.actor_height,
            },
            velocity: 0.0,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Difficulty level; rises by one every `level_every` points.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn gate(&self) -> &QuestionGate {
        &self.gate
    }

    pub fn is_grounded(&self) -> bool {
        self.actor.rect.y >= self.config.ground_y()
    }

    /// Whether the driver should keep scheduling ticks.
    pub fn wants_ticks(&self) -> bool {
        self.state == RunState::Playing
    }

    pub fn spawn_interval(&self) -> u32 {
        self.config
            .spawn_interval
            .saturating_sub(self.level.saturating_mul(self.config.spawn_interval_step))
            .max(self.config.min_spawn_interval)
    }

    pub fn obstacle_speed(&self) -> f32 {
        self.config.obstacle_speed + self.level as f32 * self.config.speed_step
    }

    fn reset_run(&mut self) {
        self.actor = Self::grounded_actor(&self.config);
        self.obstacles.clear();
        self.score = 0;
        self.level = 0;
        self.since_spawn = 0;
    }

    /// Begin a fresh run from the start screen or after a run ended.
    pub fn start(&mut self) -> Result<(), GameError> {
        if !matches!(self.state, RunState::Start | RunState::Ended) {
            return Err(MoveError::AlreadyRunning.into());
        }
        self.gate.close();
        self.reset_run();
        self.state = RunState::Playing;
        tracing::debug!("run started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        if self.state != RunState::Playing {
            return Err(MoveError::NotPlaying.into());
        }
        self.state = RunState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.state != RunState::Paused {
            return Err(MoveError::NotPaused.into());
        }
        self.state = RunState::Playing;
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), GameError> {
        match self.state {
            RunState::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Only possible while playing and standing on the ground.
    pub fn jump(&mut self) -> Result<(), GameError> {
        if self.state != RunState::Playing {
            return Err(MoveError::NotPlaying.into());
        }
        if !self.is_grounded() {
            return Err(MoveError::NotGrounded.into());
        }
        self.actor.velocity = self.config.jump_velocity;
        Ok(())
    }

    /// Advance the simulation by one step.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        if self.state != RunState::Playing {
            return Err(MoveError::NotPlaying.into());
        }

        let ground = self.config.ground_y();
        self.actor.velocity += self.config.gravity;
        self.actor.rect.y += self.actor.velocity;
        if self.actor.rect.y >= ground {
            self.actor.rect.y = ground;
            self.actor.velocity = 0.0;
        }

        self.since_spawn += 1;
        if self.since_spawn >= self.spawn_interval() {
            self.spawn_obstacle();
            self.since_spawn = 0;
        }

        let speed = self.obstacle_speed();
        for obstacle in &mut self.obstacles {
            obstacle.rect.x -= speed;
        }
        self.obstacles.retain(|o| o.rect.x + o.rect.w > 0.0);

        let actor = self.actor.rect;
        if self.obstacles.iter().any(|o| o.rect.overlaps(&actor)) {
            let request = self.gate.request()?;
            self.state = RunState::AwaitingQuestion;
            tracing::debug!(score = self.score, "collision");
            return Ok(TickOutcome::Collided(request));
        }

        self.score += 1;
        let level = (self.score / self.config.level_every) as u32;
        if level > self.level {
            self.level = level;
            tracing::info!(level, score = self.score, "difficulty increased");
        }
        Ok(TickOutcome::Advanced)
    }

    fn spawn_obstacle(&mut self) {
        let (lo, hi) = (self.config.obstacle_min_height, self.config.obstacle_max_height);
        let h = if hi > lo { self.rng.random_range(lo..=hi) } else { lo };
        self.obstacles.push(Obstacle {
            rect: Rect {
                x: self.config.lane_width,
                y: self.config.lane_height - h,
                w: self.config.obstacle_width,
                h,
            },
        });
    }

    fn end_run(&mut self) {
        self.gate.close();
        self.state = RunState::Ended;
        tracing::info!(score = self.score, "run ended");
        self.reports.push(ProgressReport::finished(
            Variant::Runner,
            Finish::Run { score: self.score },
        ));
    }
}

impl GameEngine for RunnerGame {
    fn variant(&self) -> Variant {
        Variant::Runner
    }

    fn is_terminal(&self) -> bool {
        self.state == RunState::Ended
    }

    fn question(&self) -> Option<&Question> {
        self.gate.question()
    }

    fn pending_request(&self) -> Option<QuestionRequest> {
        self.gate.pending()
    }

    /// A failed fetch ends the run; there is no position to resume from.
    fn deliver_question(
        &mut self,
        request: &QuestionRequest,
        fetched: Result<Question, SourceError>,
    ) -> Result<(), GameError> {
        match self.gate.deliver(request, fetched) {
            Ok(()) => Ok(()),
            Err(GateError::QuestionUnavailable(reason)) => {
                if self.state == RunState::AwaitingQuestion {
                    self.end_run();
                }
                Err(GameError::QuestionUnavailable(reason))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn answer(&mut self, key: &str) -> Result<Verdict, GameError> {
        if self.state != RunState::AwaitingQuestion {
            tracing::warn!(state = ?self.state, "answer submitted outside of a question");
            return Err(GameError::PrecedenceViolation);
        }
        let verdict = self.gate.submit(key)?;
        self.reports.push(ProgressReport::answered(Variant::Runner, verdict.is_correct()));
        match verdict {
            Verdict::Correct => {
                self.reset_run();
                self.state = RunState::Playing;
            }
            Verdict::Incorrect => self.end_run(),
        }
        Ok(verdict)
    }

    fn restart(&mut self) {
        self.gate.reset();
        self.reset_run();
        self.state = RunState::Start;
    }

    fn take_reports(&mut self) -> Vec<ProgressReport> {
        std::mem::take(&mut self.reports)
    }
}
