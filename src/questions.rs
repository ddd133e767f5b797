//! Question records and the question-source boundary.
//!
//! The wire shape every source produces is
//! `{ "question": "...", "options": { "A": "...", ... }, "correctAnswer": "A" }`.
//! Option order is the insertion order of the `options` object.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Subject used when a request names a subject the bank does not carry.
pub const DEFAULT_SUBJECT: &str = "Math";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Parameters forwarded to a question source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionParams {
    pub subject: String,
    pub grade_band: String,
    pub difficulty: Option<Difficulty>,
}

impl Default for QuestionParams {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            grade_band: "3-4".to_string(),
            difficulty: None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("no questions available for subject {subject}")]
    NoQuestions { subject: String },
    #[error("malformed question: {0}")]
    Malformed(String),
    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub key: String,
    pub text: String,
}

/// A validated multiple-choice question.
///
/// ```
/// use quiz_arcade::questions::Question;
///
/// let q = Question::from_json(
///     r#"{"question":"What is 5 + 3?","options":{"A":"7","B":"8"},"correctAnswer":"B"}"#,
/// ).unwrap();
/// assert!(q.is_correct("B"));
/// assert!(!q.is_correct("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<AnswerOption>,
    correct_key: String,
}

fn valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

impl Question {
    pub fn try_new<P, K>(
        prompt: P,
        options: Vec<(K, String)>,
        correct_key: K,
    ) -> Result<Self, SourceError>
    where
        P: Into<String>,
        K: Into<String>,
    {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(SourceError::Malformed("empty prompt".into()));
        }
        if options.len() < 2 {
            return Err(SourceError::Malformed(format!(
                "expected at least two options, got {}",
                options.len()
            )));
        }
        let mut out: Vec<AnswerOption> = Vec::with_capacity(options.len());
        for (key, text) in options {
            let key = key.into();
            if !valid_key(&key) {
                return Err(SourceError::Malformed(format!("invalid option key {key:?}")));
            }
            if out.iter().any(|o| o.key == key) {
                return Err(SourceError::Malformed(format!("duplicate option key {key}")));
            }
            out.push(AnswerOption { key, text });
        }
        let correct_key = correct_key.into();
        if !out.iter().any(|o| o.key == correct_key) {
            return Err(SourceError::Malformed(format!(
                "correct answer {correct_key:?} is not an option"
            )));
        }
        Ok(Self { prompt, options: out, correct_key })
    }

    /// Parse and validate a single wire record.
    pub fn from_json(s: &str) -> Result<Self, SourceError> {
        let record: QuestionRecord =
            serde_json::from_str(s).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Self::try_from(record)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in display order.
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn correct_key(&self) -> &str {
        &self.correct_key
    }

    /// Exact key comparison. No case folding or trimming.
    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_key == key
    }
}

/// Wire representation of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = SourceError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let mut options = Vec::with_capacity(record.options.len());
        for (key, value) in record.options {
            match value {
                serde_json::Value::String(text) => options.push((key, text)),
                other => {
                    return Err(SourceError::Malformed(format!(
                        "option {key} is not text: {other}"
                    )))
                }
            }
        }
        Question::try_new(record.question, options, record.correct_answer)
    }
}

impl From<&Question> for QuestionRecord {
    fn from(q: &Question) -> Self {
        let options = q
            .options
            .iter()
            .map(|o| (o.key.clone(), serde_json::Value::String(o.text.clone())))
            .collect();
        Self { question: q.prompt.clone(), options, correct_answer: q.correct_key.clone() }
    }
}

/// Anything that can produce a question on demand.
///
/// Sources must tolerate being asked again after a failure; the gate treats
/// every error the same way.
pub trait QuestionSource {
    fn request(&mut self, params: &QuestionParams) -> Result<Question, SourceError>;
}

/// Local question bank keyed by subject.
///
/// Remembers the last few questions it served per subject and avoids handing
/// them out again right away.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    subjects: Vec<(String, Vec<Question>)>,
    recent: HashMap<String, VecDeque<usize>>,
    history_len: usize,
    rng: ChaCha8Rng,
}

impl QuestionBank {
    pub const DEFAULT_HISTORY_LEN: usize = 2;

    pub fn new(subjects: Vec<(String, Vec<Question>)>) -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self {
            subjects,
            recent: HashMap::new(),
            history_len: Self::DEFAULT_HISTORY_LEN,
            rng: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_history_len(mut self, n: usize) -> Self {
        self.history_len = n;
        self.recent.clear();
        self
    }

    /// Parse a bank in the shape `{ "<Subject>": [record, ...], ... }`.
    pub fn from_json(s: &str) -> Result<Self, SourceError> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(s).map_err(|e| SourceError::Malformed(e.to_string()))?;
        let mut subjects = Vec::with_capacity(raw.len());
        for (subject, records) in raw {
            let records: Vec<QuestionRecord> = serde_json::from_value(records)
                .map_err(|e| SourceError::Malformed(format!("{subject}: {e}")))?;
            let questions = records
                .into_iter()
                .map(Question::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            subjects.push((subject, questions));
        }
        Ok(Self::new(subjects))
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// The sample bank the arcade ships with.
    pub fn builtin() -> Self {
        fn q(prompt: &str, opts: [&str; 4], correct: &str) -> Question {
            let options = ["A", "B", "C", "D"]
                .into_iter()
                .zip(opts)
                .map(|(k, t)| (k.to_string(), t.to_string()))
                .collect();
            match Question::try_new(prompt, options, correct.to_string()) {
                Ok(q) => q,
                Err(e) => unreachable!("builtin question is invalid: {e}"),
            }
        }
        Self::new(vec![
            (
                "Math".to_string(),
                vec![
                    q("What is 5 + 3?", ["7", "8", "9", "10"], "B"),
                    q("What is 10 - 4?", ["5", "6", "7", "8"], "B"),
                    q("What is 3 × 4?", ["10", "11", "12", "13"], "C"),
                ],
            ),
            (
                "Science".to_string(),
                vec![
                    q(
                        "What is the largest planet in our solar system?",
                        ["Earth", "Mars", "Jupiter", "Saturn"],
                        "C",
                    ),
                    q(
                        "What do plants need to grow?",
                        [
                            "Water, sunlight, and air",
                            "Water and air only",
                            "Sunlight only",
                            "Air only",
                        ],
                        "A",
                    ),
                ],
            ),
            (
                "English".to_string(),
                vec![
                    q("Which word is a noun?", ["run", "happy", "dog", "quickly"], "C"),
                    q("What is the plural of \"cat\"?", ["cat", "cats", "cates", "caties"], "B"),
                ],
            ),
        ])
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|(s, _)| s.as_str())
    }

    fn resolve_subject(&self, subject: &str) -> Option<(&str, &[Question])> {
        self.subjects
            .iter()
            .find(|(s, _)| s == subject)
            .or_else(|| self.subjects.iter().find(|(s, _)| s == DEFAULT_SUBJECT))
            .filter(|(_, qs)| !qs.is_empty())
            .map(|(s, qs)| (s.as_str(), qs.as_slice()))
    }

    fn pick(&mut self, subject: &str, len: usize) -> usize {
        let recent = self.recent.entry(subject.to_string()).or_default();
        let mut candidates: Vec<usize> = (0..len).filter(|i| !recent.contains(i)).collect();
        if candidates.is_empty() {
            let last = recent.back().copied();
            candidates = (0..len).filter(|&i| len == 1 || Some(i) != last).collect();
        }
        let idx = candidates[self.rng.random_range(0..candidates.len())];
        if self.history_len > 0 {
            recent.push_back(idx);
            while recent.len() > self.history_len {
                recent.pop_front();
            }
        }
        idx
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestionSource for QuestionBank {
    fn request(&mut self, params: &QuestionParams) -> Result<Question, SourceError> {
        let Some((subject, questions)) = self.resolve_subject(&params.subject) else {
            return Err(SourceError::NoQuestions { subject: params.subject.clone() });
        };
        let subject = subject.to_string();
        let len = questions.len();
        let idx = self.pick(&subject, len);
        tracing::debug!(subject = %subject, index = idx, "serving question");
        self.resolve_subject(&subject)
            .and_then(|(_, qs)| qs.get(idx).cloned())
            .ok_or(SourceError::NoQuestions { subject })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_option_order() {
        let q = Question::from_json(
            r#"{"question":"Pick","options":{"D":"d","A":"a","C":"c"},"correctAnswer":"A"}"#,
        )
        .unwrap();
        let keys: Vec<&str> = q.options().iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["D", "A", "C"]);
        assert_eq!(q.option("C").map(|o| o.text.as_str()), Some("c"));
    }

    #[test]
    fn malformed_records_are_rejected() {
        let cases = [
            r#"{"question":"","options":{"A":"1","B":"2"},"correctAnswer":"A"}"#,
            r#"{"question":"Q","options":{"A":"1"},"correctAnswer":"A"}"#,
            r#"{"question":"Q","options":{"A":"1","B":"2"},"correctAnswer":"C"}"#,
            r#"{"question":"Q","options":{"a":"1","B":"2"},"correctAnswer":"B"}"#,
            r#"{"question":"Q","options":{"A":1,"B":"2"},"correctAnswer":"B"}"#,
            r#"{"question":"Q","options":{"A":"1","B":"2"}}"#,
            r#"not json"#,
        ];
        for case in cases {
            assert!(
                matches!(Question::from_json(case), Err(SourceError::Malformed(_))),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn unknown_subject_falls_back_to_math() {
        let mut bank = QuestionBank::builtin().with_seed(5);
        let params = QuestionParams { subject: "History".into(), ..QuestionParams::default() };
        let q = bank.request(&params).unwrap();
        let math = ["What is 5 + 3?", "What is 10 - 4?", "What is 3 × 4?"];
        assert!(math.contains(&q.prompt()));
    }

    #[test]
    fn empty_bank_reports_no_questions() {
        let mut bank = QuestionBank::new(Vec::new());
        assert!(matches!(
            bank.request(&QuestionParams::default()),
            Err(SourceError::NoQuestions { .. })
        ));
    }

    #[test]
    fn recent_history_prevents_immediate_repeats() {
        let mut bank = QuestionBank::builtin().with_seed(9).with_history_len(2);
        let params = QuestionParams::default();
        let served: Vec<String> =
            (0..30).map(|_| bank.request(&params).unwrap().prompt().to_string()).collect();
        for w in served.windows(3) {
            assert_ne!(w[0], w[1]);
            assert_ne!(w[0], w[2]);
            assert_ne!(w[1], w[2]);
        }
    }

    #[test]
    fn history_larger_than_subject_still_avoids_last() {
        let mut bank = QuestionBank::builtin().with_seed(1).with_history_len(8);
        let params = QuestionParams { subject: "Science".into(), ..QuestionParams::default() };
        let mut last = bank.request(&params).unwrap();
        for _ in 0..10 {
            let next = bank.request(&params).unwrap();
            assert_ne!(next, last);
            last = next;
        }
    }

    #[test]
    fn bank_json_round_trips_builtin_shape() {
        let json = r#"{"Art":[{"question":"Primary colour?","options":{"A":"Red","B":"Pink"},"correctAnswer":"A"}]}"#;
        let mut bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.subjects().collect::<Vec<_>>(), ["Art"]);
        let params = QuestionParams { subject: "Art".into(), ..QuestionParams::default() };
        let q = bank.request(&params).unwrap();
        let record = QuestionRecord::from(&q);
        assert_eq!(record.correct_answer, "A");
        assert_eq!(record.options.keys().collect::<Vec<_>>(), ["A", "B"]);
    }
}
