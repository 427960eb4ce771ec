//! Core trait definitions for text-generation backends.
//!
//! The async trait is implemented by the `mathcoach-providers` crate. The
//! record store seam lives in [`crate::store`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Text generation trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate text from a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4.1-mini").
    pub model: String,
    /// The full prompt.
    pub prompt: String,
    /// Maximum tokens to generate, if the caller wants a cap.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_output_tokens: None,
        }
    }
}

/// Response from a text generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text.
    pub text: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    #[serde(default)]
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

/// Extract the JSON object from an LLM reply.
///
/// Handles:
/// - A bare JSON object (returned trimmed)
/// - A ```json or generic ``` fenced block
/// - An object embedded in surrounding prose (outermost `{` ... `}`)
///
/// Returns `None` if the reply contains no braces at all.
pub fn extract_json_block(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();

    let body = match fenced_block(trimmed) {
        Some(inner) => inner.trim(),
        None => trimmed,
    };

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip the info string ("json", "JSON", ...) up to the end of the line.
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    // Truncated replies may never close the fence.
    let close = body.find("```").unwrap_or(body.len());
    Some(&body[..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object() {
        let reply = r#"  {"problem_text":"x","final_answer":3}  "#;
        assert_eq!(
            extract_json_block(reply),
            Some(r#"{"problem_text":"x","final_answer":3}"#)
        );
    }

    #[test]
    fn fenced_json_block() {
        let reply = "Here you go:\n```json\n{\"final_answer\": 12}\n```\nEnjoy!";
        assert_eq!(extract_json_block(reply), Some("{\"final_answer\": 12}"));
    }

    #[test]
    fn generic_fence() {
        let reply = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(reply), Some("{\"a\": 1}"));
    }

    #[test]
    fn truncated_fence() {
        let reply = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(reply), Some("{\"a\": 1}"));
    }

    #[test]
    fn embedded_in_prose() {
        let reply = "Sure! {\"a\": {\"b\": 2}} Hope this helps.";
        assert_eq!(extract_json_block(reply), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn no_object() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }
}
