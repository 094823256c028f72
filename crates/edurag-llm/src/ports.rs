//! Chat model port definitions

use async_trait::async_trait;
use edurag_core::error::Result;

/// A single chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction
    pub system: String,

    /// User payload (documents, question, answer)
    pub user: String,

    /// Sampling temperature
    pub temperature: f64,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f64) -> Self {
        Self { system: system.into(), user: user.into(), temperature }
    }
}

/// Port for JSON-mode chat completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a chat completion and return the raw reply text.
    ///
    /// Implementations request a JSON object response; the caller still
    /// parses defensively via [`crate::reply::extract_json_object`].
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Get the name/identifier of the chat model
    fn model_name(&self) -> &str;
}
