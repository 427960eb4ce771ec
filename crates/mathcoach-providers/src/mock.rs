//! Mock provider for testing and offline use.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use mathcoach_core::traits::{
    GenerateRequest, GenerateResponse, ModelInfo, TextGenerator, TokenUsage,
};

/// A mock text generator that replays canned replies instead of calling an
/// API.
///
/// Queued replies are used first, in order. After that, a reply is chosen by
/// prompt substring, falling back to the default.
pub struct MockProvider {
    /// Map of prompt substring → reply.
    responses: HashMap<String, String>,
    /// One-shot replies consumed in order.
    queued: Mutex<VecDeque<String>>,
    /// Default reply if nothing else matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with the given prompt→reply mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            queued: Mutex::new(VecDeque::new()),
            default_response: r#"{"problem_text":"What is 2 + 3?","final_answer":5}"#.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        Self::new(HashMap::new()).with_default_response(response)
    }

    /// Replace the reply used when no queued reply or substring matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = response.to_string();
        self
    }

    /// Queue a reply to be returned by the next unanswered call.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply.into());
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let text = queued.unwrap_or_else(|| {
            self.responses
                .iter()
                .find(|(key, _)| request.prompt.contains(key.as_str()))
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| self.default_response.clone())
        });

        let input_tokens = (request.prompt.len() / 4) as u32; // Rough estimate
        let output_tokens = (text.len() / 4) as u32;

        Ok(GenerateResponse {
            text,
            model: request.model.clone(),
            token_usage: TokenUsage {
                input_tokens,
                output_tokens,
                total_tokens: input_tokens + output_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("hello");
        let response = provider
            .generate(&GenerateRequest::new("mock", "anything"))
            .await
            .unwrap();
        assert_eq!(response.text, "hello");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("Student answer".to_string(), "Nice work!".to_string());
        responses.insert("gentle hint".to_string(), "- Draw a model".to_string());

        let provider = MockProvider::new(responses);

        let resp = provider
            .generate(&GenerateRequest::new("mock", "Problem: x\nStudent answer: 3"))
            .await
            .unwrap();
        assert_eq!(resp.text, "Nice work!");

        let resp = provider
            .generate(&GenerateRequest::new("mock", "Give a gentle hint"))
            .await
            .unwrap();
        assert_eq!(resp.text, "- Draw a model");

        let resp = provider
            .generate(&GenerateRequest::new("mock", "Generate ONE problem"))
            .await
            .unwrap();
        assert!(resp.text.contains("final_answer"));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn queued_replies_come_first() {
        let provider = MockProvider::with_fixed_response("default");
        provider.push_reply("first");
        provider.push_reply("second");

        let req = GenerateRequest::new("mock", "prompt");
        assert_eq!(provider.generate(&req).await.unwrap().text, "first");
        assert_eq!(provider.generate(&req).await.unwrap().text, "second");
        assert_eq!(provider.generate(&req).await.unwrap().text, "default");
    }
}
