//! Command resolution - converts free text plus room state to an action descriptor
//!
//! Resolution never fails. Keyword mode is a pure table lookup. Delegated
//! mode forwards the command to the language model; transport failures and
//! timeouts become the `error` descriptor, unusable output becomes `unknown`.

use crate::command::action::ActionDescriptor;
use crate::command::keywords::resolve_keywords;
use crate::core::config::{AppConfig, AssistantMode};
use crate::core::error::RoomError;
use crate::llm::client::{api_key_from_env, LlmClient};
use crate::llm::parser::{build_command_prompt, parse_action, COMMAND_SYSTEM_PROMPT};
use serde_json::Value;
use std::time::Duration;

enum Backend {
    Keyword,
    Llm(LlmClient),
}

/// Stateless command interpreter, shareable across requests
pub struct CommandResolver {
    backend: Backend,
    timeout: Duration,
}

impl CommandResolver {
    /// Keyword table only
    pub fn keyword() -> Self {
        Self {
            backend: Backend::Keyword,
            timeout: Duration::from_secs(30),
        }
    }

    /// Forward commands to `client`, waiting at most `timeout` per call
    pub fn delegated(client: LlmClient, timeout: Duration) -> Self {
        Self {
            backend: Backend::Llm(client),
            timeout,
        }
    }

    /// Build from config, reading the API key from the environment
    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_config_with_key(config, api_key_from_env().ok())
    }

    /// Build from config with an explicit key
    ///
    /// LLM mode without a key (or with a client that cannot be built)
    /// degrades to keyword mode.
    pub fn from_config_with_key(config: &AppConfig, api_key: Option<String>) -> Self {
        if config.assistant.mode == AssistantMode::Keyword {
            return Self::keyword();
        }

        let Some(api_key) = api_key else {
            tracing::warn!("LLM_API_KEY not set - falling back to keyword commands");
            return Self::keyword();
        };

        let timeout = config.assistant.timeout();
        match LlmClient::from_config(&config.llm, api_key, timeout) {
            Ok(client) => {
                tracing::info!(model = client.model(), "Delegating commands to language model");
                Self::delegated(client, timeout)
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM client unavailable - falling back to keyword commands");
                Self::keyword()
            }
        }
    }

    pub fn mode(&self) -> AssistantMode {
        match self.backend {
            Backend::Keyword => AssistantMode::Keyword,
            Backend::Llm(_) => AssistantMode::Llm,
        }
    }

    /// The language model client, when delegating
    pub fn client(&self) -> Option<&LlmClient> {
        match &self.backend {
            Backend::Keyword => None,
            Backend::Llm(client) => Some(client),
        }
    }

    /// Interpret `command` in the context of `room_state`
    pub async fn resolve(&self, command: &str, room_state: &Value) -> ActionDescriptor {
        let descriptor = match &self.backend {
            Backend::Keyword => resolve_keywords(command),
            Backend::Llm(client) => {
                resolve_delegated(client, command, room_state, self.timeout).await
            }
        };

        tracing::debug!(
            command,
            action = %descriptor.action,
            mode = ?self.mode(),
            "Resolved command"
        );
        descriptor
    }
}

/// One delegated resolution with a bounded wait
pub async fn resolve_delegated(
    client: &LlmClient,
    command: &str,
    room_state: &Value,
    timeout: Duration,
) -> ActionDescriptor {
    let prompt = build_command_prompt(command, room_state);

    let completion = tokio::time::timeout(timeout, client.complete(COMMAND_SYSTEM_PROMPT, &prompt))
        .await
        .unwrap_or_else(|_| Err(RoomError::Timeout(timeout.as_secs())));

    let response = match completion {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Command completion failed");
            return ActionDescriptor::error();
        }
    };

    match parse_action(&response) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            tracing::warn!(error = %e, response = %response, "Unusable command completion");
            ActionDescriptor::unknown()
        }
    }
}
