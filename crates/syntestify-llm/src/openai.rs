//! OpenAI Provider Implementation
//!
//! Issues a single chat-completions request per prompt. Failures are
//! surfaced to the caller on first occurrence; there is no retry loop, so
//! the caller sees exactly what the provider returned.

use crate::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use syntestify_domain::traits::CompletionProvider;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Completion length cap, in tokens
const MAX_TOKENS: u32 = 512;

/// Sampling temperature; kept low so the output format stays stable
const TEMPERATURE: f32 = 0.3;

/// OpenAI chat-completions provider
///
/// The API credential is supplied at construction time, never read from the
/// environment inside this crate.
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider with the default endpoint and model
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use syntestify_llm::OpenAiProvider;
    ///
    /// let provider = OpenAiProvider::new("sk-...");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Override the API endpoint (e.g. a proxy or a compatible local server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the completion model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send one prompt as a single user message and return the trimmed
    /// completion text
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the endpoint returns a
    /// non-success status (the body text is carried as detail), or the
    /// response body fails to parse. A response with no message content
    /// yields an empty string; the caller decides what that means.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    type Error = CompletionError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        OpenAiProvider::complete(self, prompt).await
    }
}
