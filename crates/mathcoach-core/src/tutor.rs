//! Tutor service.
//!
//! Ties the answer engine to a text generator and a record store: generates
//! and stores problems, grades submissions, and asks for hints and
//! solutions.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::{parse_answer, ParsedAnswer, RawAnswer};
use crate::equivalence::is_nearly_equal;
use crate::error::{ProviderError, TutorError};
use crate::model::{ExplainMode, ProblemRequest, ProblemSession, Submission};
use crate::prompt::{
    explain_prompt, feedback_prompt, improve_prompt, problem_prompt, ProblemDraft,
    NUMERIC_RETRY_SUFFIX,
};
use crate::store::SessionStore;
use crate::traits::{GenerateRequest, GenerateResponse, TextGenerator};

pub const CORRECT_FEEDBACK: &str = "Great job! Your answer is correct.";
pub const INCORRECT_FEEDBACK: &str = "Thanks for trying, review your steps and try again.";

/// Configuration for the tutor service.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Model for problem generation and feedback.
    pub fast_model: String,
    /// Model for hints and worked solutions.
    pub quality_model: String,
    /// Retries on transient provider errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
    /// Feedback text longer than this is cut.
    pub feedback_max_chars: usize,
    /// Explanations longer than this are cut.
    pub explain_max_chars: usize,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            fast_model: "gpt-4.1-mini".to_string(),
            quality_model: "gpt-4o".to_string(),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            feedback_max_chars: 2000,
            explain_max_chars: 4000,
        }
    }
}

/// A session together with its submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistory {
    pub session: ProblemSession,
    pub submissions: Vec<Submission>,
}

/// Outcome of comparing an answer against an expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub expected: ParsedAnswer,
    pub actual: ParsedAnswer,
    pub is_correct: bool,
}

/// Normalize both answers and compare them.
///
/// Fails with [`TutorError::NotANumber`] if either side does not parse, which
/// is a different outcome from an incorrect answer.
pub fn check_answer(expected: &RawAnswer, actual: &RawAnswer) -> Result<Verdict, TutorError> {
    let expected =
        parse_answer(expected).ok_or_else(|| TutorError::NotANumber(expected.to_string()))?;
    let actual = parse_answer(actual).ok_or_else(|| TutorError::NotANumber(actual.to_string()))?;
    Ok(Verdict {
        expected,
        actual,
        is_correct: is_nearly_equal(expected.value, actual.value),
    })
}

/// The tutor service.
pub struct Tutor {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn SessionStore>,
    config: TutorConfig,
}

impl Tutor {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn SessionStore>,
        config: TutorConfig,
    ) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    /// Generate and store a new problem.
    ///
    /// If the first reply has no usable numeric answer, asks once more with
    /// a stricter instruction before giving up.
    pub async fn generate_problem(&self, request: &ProblemRequest) -> Result<ProblemSession> {
        let prompt = problem_prompt(request);

        let (draft, answer) = match self.draft(&prompt).await? {
            Some(found) => found,
            None => {
                tracing::warn!("no numeric final_answer in first reply, retrying");
                let strict = format!("{prompt}{NUMERIC_RETRY_SUFFIX}");
                self.draft(&strict)
                    .await?
                    .ok_or(TutorError::NoNumericAnswer)?
            }
        };

        self.save_draft(draft, answer).await
    }

    /// Generate and store a variant of an existing problem.
    pub async fn improve_problem(
        &self,
        request: &ProblemRequest,
        based_on: &str,
    ) -> Result<ProblemSession> {
        if based_on.trim().is_empty() {
            return Err(TutorError::InvalidRequest("based-on problem text required".into()).into());
        }

        let (draft, answer) = self
            .draft(&improve_prompt(request, based_on))
            .await?
            .ok_or(TutorError::NoNumericAnswer)?;

        self.save_draft(draft, answer).await
    }

    /// Grade an answer and store the submission.
    ///
    /// The answer is parsed before anything else, so malformed input never
    /// touches the store. Feedback generation is best effort: on failure the
    /// default text is kept.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        answer: &RawAnswer,
        want_feedback: bool,
    ) -> Result<Submission> {
        let user_answer = parse_answer(answer)
            .ok_or_else(|| TutorError::NotANumber(answer.to_string()))?
            .value;

        let session = self.session(session_id).await?;

        let is_correct = is_nearly_equal(session.correct_answer, user_answer);
        tracing::info!(%session_id, user_answer, is_correct, "graded submission");

        let mut feedback_text = if is_correct {
            CORRECT_FEEDBACK
        } else {
            INCORRECT_FEEDBACK
        }
        .to_string();

        if want_feedback {
            let prompt = feedback_prompt(&session.problem_text, session.correct_answer, user_answer);
            match self.call(&self.config.fast_model, &prompt).await {
                Ok(response) => {
                    let text = truncate_chars(response.text.trim(), self.config.feedback_max_chars);
                    if !text.is_empty() {
                        feedback_text = text.to_string();
                    }
                }
                Err(e) => tracing::warn!("feedback generation failed, using default: {e:#}"),
            }
        }

        let submission = Submission {
            id: Uuid::new_v4(),
            session_id: session.id,
            created_at: Utc::now(),
            user_answer,
            is_correct,
            feedback_text,
        };
        self.store.insert_submission(&submission).await?;
        Ok(submission)
    }

    /// Ask for a hint or a worked solution for a stored problem.
    pub async fn explain(&self, session_id: Uuid, mode: ExplainMode) -> Result<String> {
        let session = self.session(session_id).await?;

        let prompt = explain_prompt(&session.problem_text, session.correct_answer, mode);
        let response = self.call(&self.config.quality_model, &prompt).await?;
        Ok(truncate_chars(response.text.trim(), self.config.explain_max_chars).to_string())
    }

    /// Look up a stored session.
    pub async fn session(&self, session_id: Uuid) -> Result<ProblemSession> {
        Ok(self
            .store
            .get_session(session_id)
            .await?
            .ok_or(TutorError::SessionNotFound(session_id))?)
    }

    /// Recent sessions, newest first, with their submissions.
    pub async fn history(&self, limit: usize) -> Result<Vec<SessionHistory>> {
        let sessions = self.store.recent_sessions(limit).await?;
        let mut history = Vec::with_capacity(sessions.len());
        for session in sessions {
            let submissions = self.store.submissions_for(session.id).await?;
            history.push(SessionHistory {
                session,
                submissions,
            });
        }
        Ok(history)
    }

    /// One generation round trip, parsed into a draft with a numeric answer.
    async fn draft(&self, prompt: &str) -> Result<Option<(ProblemDraft, f64)>> {
        let response = self.call(&self.config.fast_model, prompt).await?;
        let Some(draft) = ProblemDraft::from_reply(&response.text) else {
            return Ok(None);
        };
        Ok(draft.numeric_answer().map(|answer| (draft, answer)))
    }

    async fn save_draft(&self, draft: ProblemDraft, answer: f64) -> Result<ProblemSession> {
        let session = ProblemSession::new(draft.problem_text.trim(), answer);
        self.store.insert_session(&session).await?;
        tracing::info!(session_id = %session.id, "stored new problem session");
        Ok(session)
    }

    /// Call the generator, retrying transient provider errors with
    /// exponential backoff.
    async fn call(&self, model: &str, prompt: &str) -> Result<GenerateResponse> {
        let request = GenerateRequest::new(model, prompt);
        let mut retry_delay = self.config.retry_delay;
        let mut attempt = 0;

        loop {
            let err = match self.generator.generate(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let provider_err = err.downcast_ref::<ProviderError>();
            if provider_err.is_some_and(ProviderError::is_permanent)
                || attempt >= self.config.max_retries
            {
                return Err(err);
            }

            // Use the provider's retry-after hint if available
            if let Some(ms) = provider_err.and_then(ProviderError::retry_after_ms) {
                retry_delay = Duration::from_millis(ms);
            }

            attempt += 1;
            tracing::warn!(
                provider = self.generator.name(),
                attempt,
                "generation failed, retrying in {retry_delay:?}: {err:#}"
            );
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
    }
}

/// Cut `s` to at most `max` characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
