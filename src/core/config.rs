//! Service configuration with documented defaults
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The CLI applies its own flags last.

use crate::core::error::{Result, RoomError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// How commands are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    /// Fixed keyword table, no external calls
    Keyword,
    /// Forward commands to the language model, keyword table as fallback
    Llm,
}

impl Default for AssistantMode {
    fn default() -> Self {
        Self::Keyword
    }
}

impl std::str::FromStr for AssistantMode {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "mock" => Ok(Self::Keyword),
            "llm" | "delegated" => Ok(Self::Llm),
            other => Err(RoomError::ConfigError(format!(
                "unknown assistant mode '{}' (expected keyword or llm)",
                other
            ))),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub assistant: AssistantConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Which resolver handles commands
    pub mode: AssistantMode,

    /// Upper bound on one outbound completion call (seconds)
    ///
    /// Expiry is treated exactly like a transport failure: the caller gets
    /// the fixed `error` descriptor.
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            mode: AssistantMode::Keyword,
            timeout_secs: 30,
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Completion endpoint settings. The API key is never read from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completion endpoint. Anthropic URLs switch the wire format.
    pub api_url: String,
    /// Model used for command interpretation
    pub model: String,
    /// Model used for image description
    pub vision_model: String,
    /// Completion length cap for command interpretation
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-3.5-turbo".into(),
            vision_model: "gpt-4o-mini".into(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl AppConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load defaults, the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    ///
    /// Recognised: DREAMROOM_LISTEN_ADDR, DREAMROOM_MODE, LLM_API_URL,
    /// LLM_MODEL, LLM_VISION_MODEL, LLM_TIMEOUT_SECS.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DREAMROOM_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Some(mode) = lookup("DREAMROOM_MODE") {
            self.assistant.mode = mode.parse()?;
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.llm.api_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(model) = lookup("LLM_VISION_MODEL") {
            self.llm.vision_model = model;
        }
        if let Some(secs) = lookup("LLM_TIMEOUT_SECS") {
            self.assistant.timeout_secs = secs.trim().parse().map_err(|_| {
                RoomError::ConfigError(format!("LLM_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        Ok(())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.assistant.timeout_secs == 0 {
            return Err(RoomError::ConfigError(
                "assistant.timeout_secs must be greater than zero".into(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(RoomError::ConfigError(
                "llm.max_tokens must be greater than zero".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(RoomError::ConfigError(format!(
                "llm.temperature ({}) must be within 0.0..=2.0",
                self.llm.temperature
            )));
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server.listen_addr.parse().map_err(|e| {
            RoomError::ConfigError(format!(
                "invalid listen_addr '{}': {}",
                self.server.listen_addr, e
            ))
        })
    }
}
