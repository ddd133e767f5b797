//! Progress reporting.
//!
//! Games never keep score themselves. They queue [`ProgressReport`]s (one per
//! judged answer, one per finished game) and a front-end forwards them to a
//! [`ProgressSink`]. Delivery is fire-and-forget from the game's side.

use crate::detector::Outcome;
use crate::variants::Variant;
use std::collections::HashMap;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Board(Outcome),
    Run { score: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub variant: Variant,
    pub question_answered: bool,
    pub correct: bool,
    pub finish: Option<Finish>,
}

impl ProgressReport {
    pub fn answered(variant: Variant, correct: bool) -> Self {
        Self { variant, question_answered: true, correct, finish: None }
    }

    pub fn finished(variant: Variant, finish: Finish) -> Self {
        Self { variant, question_answered: false, correct: false, finish: Some(finish) }
    }
}

pub trait ProgressSink {
    fn report(&mut self, report: &ProgressReport);
}

impl ProgressSink for Vec<ProgressReport> {
    fn report(&mut self, report: &ProgressReport) {
        self.push(*report);
    }
}

/// Counters for one user in one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantProgress {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub high_score: u64,
    pub questions_answered: u32,
    pub correct_answers: u32,
}

impl VariantProgress {
    pub fn apply(&mut self, report: &ProgressReport) {
        if report.question_answered {
            self.questions_answered += 1;
            if report.correct {
                self.correct_answers += 1;
            }
        }
        match report.finish {
            Some(Finish::Board(Outcome::PlayerWin)) => self.wins += 1,
            Some(Finish::Board(Outcome::OpponentWin)) => self.losses += 1,
            Some(Finish::Board(Outcome::Draw)) => self.draws += 1,
            Some(Finish::Run { score }) => self.high_score = self.high_score.max(score),
            Some(Finish::Board(Outcome::None)) | None => {}
        }
    }

    /// Share of correct answers in percent, 0 when nothing was answered.
    pub fn accuracy(&self) -> u32 {
        if self.questions_answered == 0 {
            return 0;
        }
        ((u64::from(self.correct_answers) * 100 + u64::from(self.questions_answered) / 2)
            / u64::from(self.questions_answered)) as u32
    }

    /// True after every `every`-th answered question.
    pub fn rest_due(&self, every: u32) -> bool {
        every > 0 && self.questions_answered > 0 && self.questions_answered % every == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProgress {
    pub row_match: VariantProgress,
    pub column_drop: VariantProgress,
    pub runner: VariantProgress,
}

impl UserProgress {
    pub fn get(&self, variant: Variant) -> &VariantProgress {
        match variant {
            Variant::RowMatch => &self.row_match,
            Variant::ColumnDrop => &self.column_drop,
            Variant::Runner => &self.runner,
        }
    }

    pub fn get_mut(&mut self, variant: Variant) -> &mut VariantProgress {
        match variant {
            Variant::RowMatch => &mut self.row_match,
            Variant::ColumnDrop => &mut self.column_drop,
            Variant::Runner => &mut self.runner,
        }
    }

    pub fn questions_answered(&self) -> u32 {
        Variant::ALL.iter().map(|&v| self.get(v).questions_answered).sum()
    }
}

impl ProgressSink for UserProgress {
    fn report(&mut self, report: &ProgressReport) {
        self.get_mut(report.variant).apply(report);
    }
}

/// In-memory progress store keyed by user.
#[derive(Debug, Clone, Default)]
pub struct ProgressBook {
    users: HashMap<String, UserProgress>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, name: &str) -> Option<&UserProgress> {
        self.users.get(name)
    }

    /// Created empty on first use.
    pub fn user_mut(&mut self, name: &str) -> &mut UserProgress {
        self.users.entry(name.to_string()).or_default()
    }

    /// Replace a user's counters for one game outright. Last write wins.
    pub fn put(&mut self, name: &str, variant: Variant, progress: VariantProgress) {
        *self.user_mut(name).get_mut(variant) = progress;
    }

    pub fn record(&mut self, name: &str, report: &ProgressReport) {
        tracing::debug!(user = name, ?report, "progress");
        self.user_mut(name).report(report);
    }

    /// A sink that records into `name`'s counters.
    pub fn sink<'a>(&'a mut self, name: &'a str) -> UserSink<'a> {
        UserSink { book: self, name }
    }
}

pub struct UserSink<'a> {
    book: &'a mut ProgressBook,
    name: &'a str,
}

impl ProgressSink for UserSink<'_> {
    fn report(&mut self, report: &ProgressReport) {
        self.book.record(self.name, report);
    }
}
