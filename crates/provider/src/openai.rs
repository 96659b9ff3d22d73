//! OpenAI-compatible chat-completion provider

use crate::*;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, trace};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Provider speaking the `/chat/completions` protocol
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        let api_base = api_base
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base,
            default_model: default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn build_request(&self, params: &ChatParams) -> serde_json::Value {
        let model = if params.model.is_empty() {
            self.default_model.clone()
        } else {
            params.model.clone()
        };

        json!({
            "model": model,
            "messages": params.messages,
            "temperature": params.temperature,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse> {
        let choice = json["choices"]
            .get(0)
            .ok_or(ProviderError::InvalidResponse)?;
        let content = choice["message"]["content"].as_str().map(|s| s.to_string());
        let finish_reason = choice["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();

        let usage = if let Some(usage) = json["usage"].as_object() {
            let count = |key: &str| usage.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            Usage {
                prompt_tokens: count("prompt_tokens"),
                completion_tokens: count("completion_tokens"),
                total_tokens: count("total_tokens"),
            }
        } else {
            Usage::default()
        };

        Ok(ChatResponse {
            content,
            finish_reason,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        if !self.is_configured() {
            return Err(ProviderError::NoApiKey);
        }

        trace!("◆ CONNECTING TO {}", self.api_base);

        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request(&params);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }

        let text = response.text().await?;
        let json: serde_json::Value = serde_json::from_str(&text)?;

        if !status.is_success() {
            let error = json["error"]["message"]
                .as_str()
                .unwrap_or("UNKNOWN ERROR")
                .to_string();
            return Err(ProviderError::Api(error));
        }

        let parsed = self.parse_response(json)?;
        debug!(
            "◆ RESPONSE: finish_reason={} tokens={}",
            parsed.finish_reason, parsed.usage.total_tokens
        );
        Ok(parsed)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========== Construction Tests ==========

    #[test]
    fn test_new_with_defaults() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        assert_eq!(provider.api_base, "https://api.openai.com/v1");
        assert_eq!(provider.default_model, "gpt-4o-mini");
        assert_eq!(provider.api_key, "sk-test");
    }

    #[test]
    fn test_new_with_custom_base_trims_slash() {
        let provider =
            OpenAiProvider::new("sk-test", Some("http://localhost:8000/v1/".to_string()), None);
        assert_eq!(provider.api_base, "http://localhost:8000/v1");
    }

    #[test]
    fn test_is_configured() {
        assert!(OpenAiProvider::new("key", None, None).is_configured());
        assert!(!OpenAiProvider::new("", None, None).is_configured());
    }

    #[test]
    fn test_default_model_override() {
        let provider = OpenAiProvider::new("key", None, Some("gpt-4.1-mini".to_string()));
        assert_eq!(provider.default_model(), "gpt-4.1-mini");
    }

    // ========== build_request Tests ==========

    #[test]
    fn test_build_request_basic() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let params = ChatParams::prompt("gpt-4o-mini", "You are terse.", "Hello");

        let request = provider.build_request(&params);

        assert_eq!(request["model"], "gpt-4o-mini");
        assert!((request["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(request.as_object().unwrap().len(), 3);

        let messages = request["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are terse.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Hello");
    }

    #[test]
    fn test_build_request_falls_back_to_default_model() {
        let provider = OpenAiProvider::new("sk-test", None, Some("fallback".to_string()));
        let params = ChatParams {
            messages: vec![Message::user("hi")],
            ..Default::default()
        };

        let request = provider.build_request(&params);
        assert_eq!(request["model"], "fallback");
    }

    // ========== parse_response Tests ==========

    #[test]
    fn test_parse_response_simple() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let response_json = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Rome" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11 }
        });

        let response = provider.parse_response(response_json).unwrap();

        assert_eq!(response.content, Some("Rome".to_string()));
        assert_eq!(response.finish_reason, "stop");
        assert_eq!(response.usage.prompt_tokens, 10);
        assert_eq!(response.usage.completion_tokens, 1);
        assert_eq!(response.usage.total_tokens, 11);
    }

    #[test]
    fn test_parse_response_null_content() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let response_json = json!({
            "choices": [{ "message": { "content": null }, "finish_reason": "length" }]
        });

        let response = provider.parse_response(response_json).unwrap();
        assert_eq!(response.content, None);
        assert_eq!(response.finish_reason, "length");
        assert_eq!(response.usage.total_tokens, 0);
    }

    #[test]
    fn test_parse_response_missing_finish_reason() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let response_json = json!({ "choices": [{ "message": { "content": "ok" } }] });

        let response = provider.parse_response(response_json).unwrap();
        assert_eq!(response.finish_reason, "stop");
    }

    #[test]
    fn test_parse_response_empty_choices() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let result = provider.parse_response(json!({ "choices": [] }));
        assert!(matches!(result, Err(ProviderError::InvalidResponse)));
    }

    #[test]
    fn test_parse_response_missing_choices() {
        let provider = OpenAiProvider::new("sk-test", None, None);
        let result = provider.parse_response(json!({ "usage": {} }));
        assert!(matches!(result, Err(ProviderError::InvalidResponse)));
    }

    // ========== chat Tests ==========

    #[tokio::test]
    async fn test_chat_without_key_is_rejected() {
        let provider = OpenAiProvider::new("", None, None);
        let result = provider.chat(ChatParams::prompt("m", "s", "u")).await;
        assert!(matches!(result, Err(ProviderError::NoApiKey)));
    }
}
