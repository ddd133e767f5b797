//! The question gate: suspends a game until a question is answered.
//!
//! Fetching is split into two steps so a front-end can resolve the request
//! however it likes (local bank, network, test script):
//!
//! 1. [`QuestionGate::request`] hands out a [`QuestionRequest`] stamped with
//!    the gate's current generation.
//! 2. [`QuestionGate::deliver`] accepts the fetched result for that request.
//!
//! [`QuestionGate::reset`] bumps the generation, so a result that arrives for
//! a request issued before a restart is rejected as stale.
//!
//! Out-of-order calls (answering with nothing open, requesting while a
//! question is outstanding) are reported the same way in every build: a
//! `warn!` event and `Err(GateError::PrecedenceViolation)`, with the gate left
//! untouched. They never panic or assert, so a front-end can surface them.

use crate::questions::{Question, QuestionParams, QuestionSource, SourceError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GateError {
    #[error("no question is awaiting an answer")]
    PrecedenceViolation,
    #[error("question unavailable: {0}")]
    QuestionUnavailable(String),
    #[error("response belongs to an earlier game")]
    StaleResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Ticket for one outstanding question fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    generation: u64,
    params: QuestionParams,
}

impl QuestionRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn params(&self) -> &QuestionParams {
        &self.params
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Closed,
    Loading,
    Open { question: Question, attempts: u32 },
}

/// At most one question is outstanding per gate.
#[derive(Debug, Clone)]
pub struct QuestionGate {
    params: QuestionParams,
    generation: u64,
    phase: Phase,
}

impl QuestionGate {
    pub fn new(params: QuestionParams) -> Self {
        Self { params, generation: 0, phase: Phase::Closed }
    }

    pub fn params(&self) -> &QuestionParams {
        &self.params
    }

    /// Takes effect for the next request.
    pub fn set_params(&mut self, params: QuestionParams) {
        self.params = params;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open { .. })
    }

    /// The question currently displayed, if any.
    pub fn question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::Open { question, .. } => Some(question),
            _ => None,
        }
    }

    /// Incorrect answers given to the open question.
    pub fn attempts(&self) -> u32 {
        match self.phase {
            Phase::Open { attempts, .. } => attempts,
            _ => 0,
        }
    }

    /// Start a fetch. Fails when a question is already loading or open.
    pub fn request(&mut self) -> Result<QuestionRequest, GateError> {
        if !self.is_closed() {
            tracing::warn!(
                generation = self.generation,
                "question requested while one is outstanding"
            );
            return Err(GateError::PrecedenceViolation);
        }
        self.phase = Phase::Loading;
        tracing::debug!(generation = self.generation, "question requested");
        Ok(QuestionRequest { generation: self.generation, params: self.params.clone() })
    }

    /// The outstanding fetch, if one is in flight.
    pub fn pending(&self) -> Option<QuestionRequest> {
        self.is_loading()
            .then(|| QuestionRequest { generation: self.generation, params: self.params.clone() })
    }

    /// Complete a fetch started by [`request`](Self::request).
    ///
    /// A failed fetch closes the gate and reports `QuestionUnavailable`.
    pub fn deliver(
        &mut self,
        request: &QuestionRequest,
        fetched: Result<Question, SourceError>,
    ) -> Result<(), GateError> {
        if request.generation != self.generation || !self.is_loading() {
            tracing::warn!(
                request = request.generation,
                current = self.generation,
                "discarding stale question response"
            );
            return Err(GateError::StaleResponse);
        }
        match fetched {
            Ok(question) => {
                self.phase = Phase::Open { question, attempts: 0 };
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Closed;
                tracing::debug!(error = %err, "question fetch failed");
                Err(GateError::QuestionUnavailable(err.to_string()))
            }
        }
    }

    /// Request and deliver in one step against a synchronous source.
    pub fn open(&mut self, source: &mut dyn QuestionSource) -> Result<&Question, GateError> {
        let request = self.request()?;
        let fetched = source.request(request.params());
        self.deliver(&request, fetched)?;
        self.question().ok_or(GateError::PrecedenceViolation)
    }

    /// Judge one answer. A correct answer closes the gate and drops the
    /// question; an incorrect one keeps the same question open.
    ///
    /// With no open question this logs a warning and returns
    /// [`GateError::PrecedenceViolation`] without changing state.
    pub fn submit(&mut self, key: &str) -> Result<Verdict, GateError> {
        let Phase::Open { question, attempts } = &mut self.phase else {
            tracing::warn!(key, "answer submitted with no open question");
            return Err(GateError::PrecedenceViolation);
        };
        if question.is_correct(key) {
            self.phase = Phase::Closed;
            return Ok(Verdict::Correct);
        }
        *attempts += 1;
        Ok(Verdict::Incorrect)
    }

    /// Drop any open or loading question without judging it.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    /// Close and invalidate every request issued so far.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Closed;
    }
}

impl Default for QuestionGate {
    fn default() -> Self {
        Self::new(QuestionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::from_json(
            r#"{"question":"What is 5 + 3?","options":{"A":"7","B":"8","C":"9","D":"10"},"correctAnswer":"B"}"#,
        )
        .unwrap()
    }

    #[test]
    fn wrong_answer_keeps_same_question() {
        let mut gate = QuestionGate::default();
        let req = gate.request().unwrap();
        gate.deliver(&req, Ok(question())).unwrap();
        let before = gate.question().cloned();
        assert_eq!(gate.submit("A"), Ok(Verdict::Incorrect));
        assert_eq!(gate.submit("C"), Ok(Verdict::Incorrect));
        assert_eq!(gate.question().cloned(), before);
        assert_eq!(gate.attempts(), 2);
        assert_eq!(gate.submit("B"), Ok(Verdict::Correct));
        assert!(gate.is_closed());
        assert!(gate.question().is_none());
    }

    #[test]
    fn answer_without_question_is_precedence_violation() {
        let mut gate = QuestionGate::default();
        assert_eq!(gate.submit("B"), Err(GateError::PrecedenceViolation));
        assert!(gate.is_closed());
        let req = gate.request().unwrap();
        assert_eq!(gate.submit("B"), Err(GateError::PrecedenceViolation));
        assert!(gate.is_loading());
        assert_eq!(gate.generation(), req.generation());
        assert_eq!(gate.pending(), Some(req.clone()));
        assert_eq!(gate.attempts(), 0);
        gate.deliver(&req, Ok(question())).unwrap();
        assert_eq!(gate.submit("B"), Ok(Verdict::Correct));
    }

    #[test]
    fn second_request_while_outstanding_is_rejected() {
        let mut gate = QuestionGate::default();
        let _req = gate.request().unwrap();
        assert_eq!(gate.request(), Err(GateError::PrecedenceViolation));
    }

    #[test]
    fn failed_fetch_closes_gate() {
        let mut gate = QuestionGate::default();
        let req = gate.request().unwrap();
        let err = gate.deliver(&req, Err(SourceError::Unavailable("offline".into())));
        assert!(matches!(err, Err(GateError::QuestionUnavailable(_))));
        assert!(gate.is_closed());
        assert!(gate.request().is_ok());
    }

    #[test]
    fn reset_discards_late_response() {
        let mut gate = QuestionGate::default();
        let req = gate.request().unwrap();
        gate.reset();
        assert_eq!(gate.deliver(&req, Ok(question())), Err(GateError::StaleResponse));
        assert!(gate.is_closed());
        assert_eq!(gate.generation(), 1);

        let fresh = gate.request().unwrap();
        assert_eq!(fresh.generation(), 1);
        gate.deliver(&fresh, Ok(question())).unwrap();
        assert!(gate.is_open());
    }

    #[test]
    fn duplicate_delivery_is_stale() {
        let mut gate = QuestionGate::default();
        let req = gate.request().unwrap();
        gate.deliver(&req, Ok(question())).unwrap();
        assert_eq!(gate.deliver(&req, Ok(question())), Err(GateError::StaleResponse));
    }
}
