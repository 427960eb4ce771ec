//! Error types.
//!
//! `ProviderError` covers failures talking to a text-generation backend and
//! lives here so the tutor service can downcast and classify errors for retry
//! decisions without string matching. `TutorError` covers the outcomes a
//! caller has to show to the user.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with a text-generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// User-facing failures of the tutor service.
///
/// `NotANumber` and an incorrect answer are different outcomes: the former is
/// an error, the latter is a successful submission with `is_correct == false`.
#[derive(Debug, Error)]
pub enum TutorError {
    /// The answer matched none of the recognised numeric notations.
    #[error("answer not understood as a number (supports %, fractions): {0:?}")]
    NotANumber(String),

    /// No session with this id exists in the store.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The request is missing something required.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model did not produce a usable numeric final answer.
    #[error("model did not return a numeric final_answer")]
    NoNumericAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("gpt-x".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 10 }.is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(ProviderError::NetworkError("reset".into()).retry_after_ms(), None);
    }

    #[test]
    fn not_a_number_message() {
        let err = TutorError::NotANumber("abc".into());
        assert!(err.to_string().contains("not understood as a number"));
    }
}
