//! Syntestify Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from
//! `syntestify-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI chat-completions API integration
//!
//! # Examples
//!
//! ```
//! use syntestify_llm::MockProvider;
//! use syntestify_domain::traits::CompletionProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from the model!");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from the model!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use syntestify_domain::traits::CompletionProvider;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during completion operations
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status from the completion endpoint
    #[error("HTTP {status}: {detail}")]
    Api {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body text
        detail: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("Completion error: {0}")]
    Other(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls, and
/// counts invocations so tests can assert that no completion call was
/// attempted.
///
/// # Examples
///
/// ```
/// use syntestify_llm::MockProvider;
/// use syntestify_domain::traits::CompletionProvider;
///
/// # async fn example() {
/// let mut provider = MockProvider::new("default");
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.complete("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.complete("anything").await.unwrap(), "default");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), "ERROR".to_string());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = CompletionError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == "ERROR" {
                return Err(CompletionError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete("hello").await.unwrap(), "world");
        assert_eq!(provider.complete("foo").await.unwrap(), "bar");
        assert_eq!(
            provider.complete("unknown").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);
        provider.complete("prompt1").await.unwrap();
        assert_eq!(provider.call_count(), 1);
        provider.complete("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete("bad prompt").await;
        assert!(matches!(result.unwrap_err(), CompletionError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
