//! Stored room designs

use crate::room::state::DesignState;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A room design owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub room_type: String,
    pub design_state: DesignState,
    pub image_url: String,
    pub thumbnail_url: String,
    pub model_url: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub views: u64,
    pub likes: u64,
    /// Unix seconds
    pub created_at: u64,
    /// Unix seconds
    pub updated_at: u64,
}

/// Current time in unix seconds
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
