//! Chat-completion providers
//!
//! The hosted-model side of the knowledge capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use thiserror::Error;

pub mod openai;

pub use openai::OpenAiProvider;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("REQUEST FAILED: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MALFORMED JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API REJECTED: {0}")]
    Api(String),

    #[error("NO API KEY")]
    NoApiKey,

    #[error("INVALID RESPONSE")]
    InvalidResponse,

    #[error("RATE LIMITED")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Option<String>,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }

    /// Trimmed content, `None` when absent or blank
    pub fn trimmed_content(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Token accounting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

}

/// Request parameters
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            temperature: 0.2,
        }
    }
}

impl ChatParams {
    /// System + user prompt pair, the only shape the tutorial sends
    pub fn prompt(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A hosted chat-completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse>;
    fn default_model(&self) -> String;
    fn is_configured(&self) -> bool;
}
