//! Core data model types for mathcoach.
//!
//! Problem sessions, submissions, and the parameters used to request a new
//! problem.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a syllabus outcome passed into a prompt.
pub const MAX_OUTCOME_CHARS: usize = 400;

/// Outcome used when the caller does not name one.
pub const DEFAULT_OUTCOME: &str = "General arithmetic competence";

/// How hard the generated problem should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A primary school level, P1 to P6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GradeLevel(u8);

impl GradeLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(format!(
                "grade must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for GradeLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for GradeLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GradeLevel> for u8 {
    fn from(value: GradeLevel) -> Self {
        value.0
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for GradeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['P', 'p']);
        let level: u8 = digits
            .parse()
            .map_err(|_| format!("invalid grade: {s}"))?;
        Self::new(level)
    }
}

/// Parameters for generating a new problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRequest {
    #[serde(default)]
    pub grade: GradeLevel,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Free-text syllabus outcome the problem should target.
    #[serde(default = "default_outcome")]
    pub outcome: String,
}

fn default_outcome() -> String {
    DEFAULT_OUTCOME.to_string()
}

impl Default for ProblemRequest {
    fn default() -> Self {
        Self {
            grade: GradeLevel::default(),
            difficulty: Difficulty::default(),
            outcome: default_outcome(),
        }
    }
}

impl ProblemRequest {
    pub fn new(grade: GradeLevel, difficulty: Difficulty, outcome: Option<&str>) -> Self {
        Self {
            grade,
            difficulty,
            outcome: outcome
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .unwrap_or(DEFAULT_OUTCOME)
                .to_string(),
        }
    }

    /// The outcome as it should appear in a prompt, capped at
    /// [`MAX_OUTCOME_CHARS`] characters.
    pub fn outcome_for_prompt(&self) -> &str {
        match self.outcome.char_indices().nth(MAX_OUTCOME_CHARS) {
            Some((idx, _)) => &self.outcome[..idx],
            None => &self.outcome,
        }
    }
}

/// A generated problem and its stored correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub problem_text: String,
    pub correct_answer: f64,
}

impl ProblemSession {
    pub fn new(problem_text: impl Into<String>, correct_answer: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            problem_text: problem_text.into(),
            correct_answer,
        }
    }
}

/// A graded answer to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// The normalized value of what the student typed.
    pub user_answer: f64,
    pub is_correct: bool,
    pub feedback_text: String,
}

/// What kind of explanation to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainMode {
    /// Nudge without revealing the answer.
    Hint,
    /// Full worked solution.
    Solution,
}

impl fmt::Display for ExplainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplainMode::Hint => write!(f, "hint"),
            ExplainMode::Solution => write!(f, "solution"),
        }
    }
}

impl FromStr for ExplainMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hint" => Ok(ExplainMode::Hint),
            "solution" => Ok(ExplainMode::Solution),
            other => Err(format!("mode must be 'hint' or 'solution', got: {other}")),
        }
    }
}
