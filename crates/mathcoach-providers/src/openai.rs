//! OpenAI Responses API provider implementation.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mathcoach_core::error::ProviderError;
use mathcoach_core::traits::{
    GenerateRequest, GenerateResponse, ModelInfo, TextGenerator, TokenUsage,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible provider speaking the `/v1/responses` endpoint.
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            client,
        })
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    model: Option<String>,
    /// Convenience field some compatible servers include.
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    /// Older/compatible shape: a bare list of content parts.
    #[serde(default)]
    content: Vec<ContentPart>,
    #[serde(default)]
    usage: ResponsesUsage,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl ResponsesResponse {
    /// Text of the reply, looked up in order: `output_text`, the
    /// `output_text` parts of `output[].content[]`, then `content[0].text`.
    fn text(&self) -> String {
        if let Some(text) = &self.output_text {
            return text.clone();
        }

        let joined: String = self
            .output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|part| part.kind.as_deref().map_or(true, |k| k == "output_text"))
            .filter_map(|part| part.text.as_deref())
            .collect();
        if !joined.is_empty() {
            return joined;
        }

        self.content
            .first()
            .and_then(|part| part.text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let body = ResponsesRequest {
            model: &request.model,
            input: &request.prompt,
            max_output_tokens: request.max_output_tokens,
        };

        let mut req = self
            .client
            .post(format!("{}/v1/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ModelNotFound(format!("{}: {body}", request.model)).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ResponsesResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let text = api_response.text();
        tracing::debug!(latency_ms, chars = text.len(), "received response");

        Ok(GenerateResponse {
            text,
            model: api_response
                .model
                .unwrap_or_else(|| request.model.clone()),
            token_usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gpt-4.1-mini".into(),
                name: "GPT-4.1 Mini".into(),
                provider: "openai".into(),
                max_context: 1_000_000,
            },
            ModelInfo {
                id: "gpt-4.1".into(),
                name: "GPT-4.1".into(),
                provider: "openai".into(),
                max_context: 1_000_000,
            },
            ModelInfo {
                id: "gpt-4o".into(),
                name: "GPT-4o".into(),
                provider: "openai".into(),
                max_context: 128_000,
            },
        ]
    }
}
