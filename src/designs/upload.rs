//! Turning an uploaded room photo into a stored design
//!
//! The photo itself lives in external blob storage; the request carries its
//! public URL.

use crate::core::error::{Result, RoomError};
use crate::designs::model::{now_secs, Design};
use crate::designs::slug::design_slug;
use crate::designs::store::DesignStore;
use crate::llm::client::LlmClient;
use crate::llm::vision::{describe_room, generate_room_model};
use crate::room::state::DesignState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "My Room Design";
pub const DEFAULT_ROOM_TYPE: &str = "living_room";

/// Metadata submitted with an uploaded photo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub room_title: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub room_description: Option<String>,
}

/// Blank fields count as missing
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Describe, model and store an uploaded room
///
/// The description is generated only when none was supplied.
pub async fn process_upload(
    store: &dyn DesignStore,
    client: Option<&LlmClient>,
    request: UploadRequest,
) -> Result<Design> {
    let image_url = request.image_url.trim();
    if image_url.is_empty() {
        return Err(RoomError::InvalidDesign("No file uploaded".into()));
    }

    let title = non_blank(&request.room_title).unwrap_or(DEFAULT_TITLE).to_string();
    let room_type = non_blank(&request.room_type)
        .unwrap_or(DEFAULT_ROOM_TYPE)
        .to_string();

    let description = match non_blank(&request.room_description) {
        Some(description) => description.to_string(),
        None => describe_room(client, image_url).await,
    };

    let model = generate_room_model(image_url);

    let design_state = DesignState {
        original_image: Some(image_url.to_string()),
        model_url: Some(model.model_url.clone()),
        ..DesignState::default()
    };

    let id = Uuid::new_v4();
    let now = now_secs();
    let design = Design {
        id,
        slug: design_slug(&title, &id),
        title,
        description,
        tags: vec![room_type.clone(), "ai-generated".into()],
        room_type,
        design_state,
        image_url: image_url.to_string(),
        thumbnail_url: model.thumbnail_url,
        model_url: model.model_url,
        is_public: false,
        views: 0,
        likes: 0,
        created_at: now,
        updated_at: now,
    };

    let design = store.insert(design)?;
    tracing::info!(id = %design.id, slug = %design.slug, "Stored uploaded design");
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::store::MemoryDesignStore;
    use crate::llm::vision::{FALLBACK_DESCRIPTION, PLACEHOLDER_MODEL_URL};

    fn request(image_url: &str) -> UploadRequest {
        UploadRequest {
            image_url: image_url.into(),
            ..UploadRequest::default()
        }
    }

    #[tokio::test]
    async fn test_upload_defaults() {
        let store = MemoryDesignStore::new();
        let design = process_upload(&store, None, request("https://img.example/r.jpg"))
            .await
            .unwrap();

        assert_eq!(design.title, DEFAULT_TITLE);
        assert_eq!(design.room_type, DEFAULT_ROOM_TYPE);
        assert_eq!(design.description, FALLBACK_DESCRIPTION);
        assert_eq!(design.tags, vec!["living_room", "ai-generated"]);
        assert_eq!(design.model_url, PLACEHOLDER_MODEL_URL);
        assert_eq!(design.thumbnail_url, "https://img.example/r.jpg");
        assert!(design.slug.starts_with("my-room-design-"));
        assert!(!design.is_public);
        assert_eq!(
            design.design_state.original_image.as_deref(),
            Some("https://img.example/r.jpg")
        );
        assert_eq!(store.get(design.id).unwrap(), design);
    }

    #[tokio::test]
    async fn test_upload_uses_supplied_fields() {
        let store = MemoryDesignStore::new();
        let design = process_upload(
            &store,
            None,
            UploadRequest {
                image_url: "https://img.example/k.jpg".into(),
                room_title: Some("Sunny Kitchen".into()),
                room_type: Some("kitchen".into()),
                room_description: Some("Bright kitchen with an island".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(design.title, "Sunny Kitchen");
        assert_eq!(design.room_type, "kitchen");
        assert_eq!(design.description, "Bright kitchen with an island");
        assert!(design.slug.starts_with("sunny-kitchen-"));
    }

    #[tokio::test]
    async fn test_upload_requires_image() {
        let store = MemoryDesignStore::new();
        let result = process_upload(&store, None, request("   ")).await;
        assert!(matches!(result, Err(RoomError::InvalidDesign(_))));
        assert!(store.is_empty());
    }
}
