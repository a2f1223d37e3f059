// src/services/gpt.rs
//! Outbound proxy to the GPT completion API.
//!
//! One reused reqwest client, one round trip per call. No retry or streaming;
//! upstream failures surface as GptError and map to envelope errors upstream.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
pub enum GptError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

#[derive(Debug, Clone)]
pub struct GptConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub text_model: String,
}

impl GptConfig {
    /// Build configuration from environment variables, with the same defaults
    /// the server applies at startup.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GPT_API_KEY").ok(),
            base_url: std::env::var("GPT_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: std::env::var("GPT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            text_model: std::env::var("GPT_TEXT_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo-instruct".to_string()),
        }
    }
}

// ---- Wire types (chat completions) ----

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion response, returned to clients verbatim.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

// ---- Wire types (legacy text completions) ----

#[derive(Debug, Serialize)]
struct TextCompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<TextChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextChoice {
    pub text: String,
    pub index: u32,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Model metadata from the model-availability check.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub owned_by: String,
}

#[derive(Debug)]
pub struct GptService {
    config: GptConfig,
    client: Client,
}

impl GptService {
    pub fn new(config: GptConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn api_key(&self) -> Result<&str, GptError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(GptError::NotConfigured)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Forward a question as a single user-role chat message and return the
    /// completion body verbatim.
    pub async fn ask_question(&self, question: &str) -> Result<ChatCompletionResponse, GptError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: question.to_string(),
            }],
        };

        debug!(model = %self.config.model, "Sending chat completion request");

        let response = self
            .post_json("v1/chat/completions", &request)
            .await?
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| GptError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &response.usage {
            info!(
                model = %response.model,
                tokens_used = usage.total_tokens,
                "Chat completion finished"
            );
        }

        Ok(response)
    }

    /// Same question against the legacy text-completions endpoint.
    pub async fn ask_text_question(
        &self,
        question: &str,
    ) -> Result<TextCompletionResponse, GptError> {
        let request = TextCompletionRequest {
            model: self.config.text_model.clone(),
            prompt: question.to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        };

        debug!(model = %self.config.text_model, "Sending text completion request");

        self.post_json("v1/completions", &request)
            .await?
            .json::<TextCompletionResponse>()
            .await
            .map_err(|e| GptError::InvalidResponse(e.to_string()))
    }

    /// Check that the configured model is available upstream.
    pub async fn check_model(&self) -> Result<ModelInfo, GptError> {
        let api_key = self.api_key()?;
        let url = self.url(&format!("v1/models/{}", self.config.model));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| GptError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json::<ModelInfo>()
            .await
            .map_err(|e| GptError::InvalidResponse(e.to_string()))
    }

    async fn post_json<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, GptError> {
        let api_key = self.api_key()?;
        let url = self.url(endpoint);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GptError::RequestFailed(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GptError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GptError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "GPT API request failed");
            return Err(GptError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "recommend a song".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "recommend a song");
    }

    #[test]
    fn test_chat_response_parses() {
        let body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Try this one."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 4, "total_tokens": 9}
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "Try this one.");
        assert_eq!(parsed.usage.unwrap().total_tokens, 9);
    }

    #[test]
    fn test_text_response_parses() {
        let body = r#"{
            "id": "cmpl-456",
            "object": "text_completion",
            "created": 1700000000,
            "model": "gpt-3.5-turbo-instruct",
            "choices": [{"text": "An answer.", "index": 0, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        }"#;

        let parsed: TextCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].text, "An answer.");
    }

    #[test]
    fn test_model_info_parses_without_created() {
        let body = r#"{"id": "gpt-3.5-turbo", "object": "model", "owned_by": "openai"}"#;

        let parsed: ModelInfo = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, "gpt-3.5-turbo");
        assert_eq!(parsed.created, 0);
    }

    #[test]
    fn test_missing_api_key_is_not_configured() {
        let config = GptConfig {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            text_model: "gpt-3.5-turbo-instruct".to_string(),
        };
        let service = GptService::new(config, Client::new());

        assert!(matches!(service.api_key(), Err(GptError::NotConfigured)));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = GptConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "https://api.openai.com/".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            text_model: "gpt-3.5-turbo-instruct".to_string(),
        };
        let service = GptService::new(config, Client::new());

        assert_eq!(
            service.url("v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
