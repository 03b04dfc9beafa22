//! HTTP surface
//!
//! Routes:
//! - `GET  /healthz`
//! - `POST /api/ai-assistant`, `GET /api/ai-assistant`
//! - `POST /api/upload-room`, `GET /api/upload-room`
//! - `GET  /api/designs`
//! - `GET  /api/designs/:id`, `DELETE /api/designs/:id`
//! - `POST /api/designs/:id/commands`
//! - `PUT  /api/designs/:id/visibility`
//! - `GET  /api/shared/:slug`

pub mod routes;

use crate::command::resolver::CommandResolver;
use crate::core::config::AppConfig;
use crate::core::error::{Result, RoomError};
use crate::designs::store::{DesignStore, MemoryDesignStore};
use crate::llm::client::{api_key_from_env, LlmClient};
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<CommandResolver>,
    pub store: Arc<dyn DesignStore>,
    /// Used for photo descriptions; absent when no API key is configured
    pub llm: Option<LlmClient>,
}

impl AppState {
    pub fn new(resolver: CommandResolver, store: Arc<dyn DesignStore>, llm: Option<LlmClient>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            store,
            llm,
        }
    }

    /// Keyword resolver, in-memory store, no language model
    pub fn offline() -> Self {
        Self::new(
            CommandResolver::keyword(),
            Arc::new(MemoryDesignStore::new()),
            None,
        )
    }

    /// Build from config with an optional API key
    pub fn from_config(config: &AppConfig, api_key: Option<String>) -> Result<Self> {
        let llm = api_key
            .clone()
            .map(|key| LlmClient::from_config(&config.llm, key, config.assistant.timeout()))
            .transpose()?;
        let resolver = CommandResolver::from_config_with_key(config, api_key);

        Ok(Self::new(resolver, Arc::new(MemoryDesignStore::new()), llm))
    }
}

/// Assemble the router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route(
            "/api/ai-assistant",
            post(routes::ai_assistant).get(routes::ai_assistant_info),
        )
        .route(
            "/api/upload-room",
            post(routes::upload_room).get(routes::upload_room_info),
        )
        .route("/api/designs", get(routes::list_designs))
        .route(
            "/api/designs/:id",
            get(routes::get_design).delete(routes::delete_design),
        )
        .route("/api/designs/:id/commands", post(routes::design_command))
        .route("/api/designs/:id/visibility", put(routes::set_visibility))
        .route("/api/shared/:slug", get(routes::shared_design))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = config.listen_addr()?;
    let state = AppState::from_config(&config, api_key_from_env().ok())?;
    tracing::info!(mode = ?state.resolver.mode(), "Command resolver ready");

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "DreamRoom listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RoomError::IoError)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
