//! LLM provider client
//!
//! Thin wrapper over an OpenAI-compatible chat-completions endpoint. The
//! coach service owns prompts and persistence; this client only speaks HTTP.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IntegrationsConfig;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    Unconfigured,
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM provider returned status {0}")]
    Api(u16),
    #[error("LLM provider returned no choices")]
    EmptyResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatTurn>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn new(config: &IntegrationsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.llm_base_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// One chat-completion round trip: system prompt plus prior turns in,
    /// assistant text out.
    pub async fn complete(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let base_url = self.base_url.as_ref().ok_or(LlmError::Unconfigured)?;
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let mut messages = vec![ChatTurn {
            role: "system".to_string(),
            content: system.to_string(),
        }];
        messages.extend_from_slice(turns);

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: 512,
            temperature: 0.7,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(LlmError::Api(response.status().as_u16()));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}
