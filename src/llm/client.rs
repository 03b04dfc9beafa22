//! Async LLM client for command interpretation and room description
//!
//! Model-agnostic HTTP client for chat completion APIs. Supports both
//! Anthropic and OpenAI-compatible endpoints. Requests carry a role-tagged
//! message list and the client returns the single completion string.

use crate::core::config::LlmConfig;
use crate::core::error::{Result, RoomError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    vision_model: String,
    max_tokens: u32,
    temperature: f32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            vision_model: model.clone(),
            model,
            max_tokens: 500,
            temperature: 0.7,
            api_format,
        }
    }

    /// Build a client from the `[llm]` config section
    pub fn from_config(config: &LlmConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Self::new(api_key, config.api_url.clone(), config.model.clone())
            .with_vision_model(config.vision_model.clone())
            .with_sampling(config.max_tokens, config.temperature);
        client.with_timeout(timeout)
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY (OPENAI_API_KEY is accepted as well)
    /// Optional: LLM_API_URL, LLM_MODEL, LLM_VISION_MODEL
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from_env()?;
        let defaults = LlmConfig::default();
        let api_url = std::env::var("LLM_API_URL").unwrap_or(defaults.api_url);
        let model = std::env::var("LLM_MODEL").unwrap_or(defaults.model);
        let vision_model = std::env::var("LLM_VISION_MODEL").unwrap_or(defaults.vision_model);

        Ok(Self::new(api_key, api_url, model).with_vision_model(vision_model))
    }

    /// Rebuild the HTTP client with a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoomError::LlmError(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub fn with_vision_model(mut self, model: String) -> Self {
        self.vision_model = model;
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Override the format detected from the URL, for proxies and gateways
    pub fn with_api_format(mut self, api_format: ApiFormat) -> Self {
        self.api_format = api_format;
        self
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a text completion request
    ///
    /// # Arguments
    /// * `system` - System prompt providing context and instructions
    /// * `user` - User message to process
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let content = MessageContent::Text(user.into());
        match self.api_format {
            ApiFormat::Anthropic => {
                self.complete_anthropic(&self.model, Some(system), content, self.max_tokens)
                    .await
            }
            ApiFormat::OpenAI => {
                let messages = vec![
                    Message {
                        role: "system".into(),
                        content: MessageContent::Text(system.into()),
                    },
                    Message {
                        role: "user".into(),
                        content,
                    },
                ];
                self.complete_openai(&self.model, messages, self.max_tokens, Some(self.temperature))
                    .await
            }
        }
    }

    /// Send a multimodal request: one text prompt plus one image URL
    pub async fn complete_with_image(&self, prompt: &str, image_url: &str) -> Result<String> {
        let text = ContentPart::Text {
            text: prompt.into(),
        };
        match self.api_format {
            ApiFormat::Anthropic => {
                let image = ContentPart::Image {
                    source: ImageSource {
                        kind: "url".into(),
                        url: image_url.into(),
                    },
                };
                let content = MessageContent::Parts(vec![text, image]);
                self.complete_anthropic(&self.vision_model, None, content, VISION_MAX_TOKENS)
                    .await
            }
            ApiFormat::OpenAI => {
                let image = ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                };
                let messages = vec![Message {
                    role: "user".into(),
                    content: MessageContent::Parts(vec![text, image]),
                }];
                self.complete_openai(&self.vision_model, messages, VISION_MAX_TOKENS, None)
                    .await
            }
        }
    }

    async fn complete_anthropic(
        &self,
        model: &str,
        system: Option<&str>,
        content: MessageContent,
        max_tokens: u32,
    ) -> Result<String> {
        let request = AnthropicRequest {
            model: model.into(),
            max_tokens,
            system: system.map(str::to_string),
            messages: vec![Message {
                role: "user".into(),
                content,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RoomError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RoomError::LlmError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| RoomError::LlmError(e.to_string()))?;

        completion
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| RoomError::LlmError("Empty response".into()))
    }

    async fn complete_openai(
        &self,
        model: &str,
        messages: Vec<Message>,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<String> {
        let request = OpenAIRequest {
            model: model.into(),
            max_tokens,
            temperature,
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RoomError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RoomError::LlmError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| RoomError::LlmError(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RoomError::LlmError("Empty response".into()))
    }
}

/// Read the API key, preferring LLM_API_KEY over OPENAI_API_KEY
pub fn api_key_from_env() -> Result<String> {
    std::env::var("LLM_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .map_err(|_| RoomError::LlmError("LLM_API_KEY not set".into()))
}

const VISION_MAX_TOKENS: u32 = 300;

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    Image { source: ImageSource },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: String,
    url: String,
}
