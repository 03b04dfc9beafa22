//! Room photo description and 3D model placeholder

use crate::llm::client::LlmClient;
use crate::llm::parser::DESCRIBE_ROOM_PROMPT;
use serde::{Deserialize, Serialize};

/// Used when the model answered but said nothing
pub const EMPTY_DESCRIPTION: &str = "A beautiful room space ready for redesign.";

/// Used when no model is configured or the call failed
pub const FALLBACK_DESCRIPTION: &str = "A room space ready for your creative touch.";

pub const PLACEHOLDER_MODEL_URL: &str = "/models/room-placeholder.glb";

/// Generated model artifacts for an uploaded room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomModel {
    pub model_url: String,
    pub thumbnail_url: String,
}

/// Describe a room photo. Never fails; falls back to fixed text.
pub async fn describe_room(client: Option<&LlmClient>, image_url: &str) -> String {
    let Some(client) = client else {
        return FALLBACK_DESCRIPTION.to_string();
    };

    match client.complete_with_image(DESCRIBE_ROOM_PROMPT, image_url).await {
        Ok(text) if text.trim().is_empty() => EMPTY_DESCRIPTION.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, image_url, "room description failed, using fallback");
            FALLBACK_DESCRIPTION.to_string()
        }
    }
}

/// Produce the 3D model for a room photo
///
/// There is no reconstruction backend; the model is a placeholder asset and
/// the original photo doubles as the thumbnail.
pub fn generate_room_model(image_url: &str) -> RoomModel {
    RoomModel {
        model_url: PLACEHOLDER_MODEL_URL.to_string(),
        thumbnail_url: image_url.to_string(),
    }
}
