use async_trait::async_trait;
use edurag_core::error::{EduragError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::ports::{ChatModel, ChatRequest};

/// Default OpenAI-compatible endpoint (DashScope international).
pub const DEFAULT_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "qwen-plus-latest";

/// Chat model adapter for any OpenAI-compatible endpoint
pub struct OpenAiChatModel {
    /// Base URL of the compatible-mode API
    base_url: String,

    /// Model name
    model: String,

    /// API key sent as a bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Create a new chat model adapter
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            EduragError::ModelUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
                remediation: "Check TLS configuration".to_string(),
            }
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create from environment: `DASHSCOPE_API_KEY` (or `DASHSCOPE_APIKEY`)
    /// plus optional `DASHSCOPE_BASE_URL`.
    pub fn from_env(model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = env::var("DASHSCOPE_API_KEY")
            .or_else(|_| env::var("DASHSCOPE_APIKEY"))
            .map_err(|_| EduragError::ConfigMissing {
                key: "DASHSCOPE_API_KEY".to_string(),
            })?;

        let base_url =
            env::var("DASHSCOPE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(base_url, model, api_key, timeout)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message { role: "system".to_string(), content: request.system.clone() },
                Message { role: "user".to_string(), content: request.user.clone() },
            ],
            temperature: request.temperature,
            response_format: ResponseFormat { format_type: "json_object".to_string() },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EduragError::ModelUnavailable {
                reason: format!("Failed to reach chat endpoint: {}", e),
                remediation: format!(
                    "Check network access to {} and the DASHSCOPE_BASE_URL setting",
                    self.base_url
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EduragError::ModelUnavailable {
                reason: format!("Chat API error ({}): {}", status, error_text),
                remediation: format!(
                    "Verify DASHSCOPE_API_KEY is valid and the model '{}' is available",
                    self.model
                ),
            });
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| EduragError::ModelUnavailable {
                reason: format!("Failed to parse chat response: {}", e),
                remediation: "Check API compatibility with the OpenAI chat schema".to_string(),
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EduragError::MalformedReply {
                reason: "chat response contained no choices".to_string(),
            })?;

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the OpenAI-compatible chat completions API
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}
