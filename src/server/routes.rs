//! Route handlers
//!
//! Request and response bodies use camelCase keys. Failures are reported
//! as `{ success: false, error, ... }` with a matching status code.

use crate::command::action::{ActionDescriptor, ActionKind};
use crate::core::error::RoomError;
use crate::designs::model::Design;
use crate::designs::upload::{process_upload, UploadRequest};
use crate::room::state::DesignState;
use crate::server::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

pub const ASSISTANT_FAILURE_ERROR: &str = "Failed to process AI command";
pub const ASSISTANT_FAILURE_RESPONSE: &str =
    "I'm having trouble understanding your request. Please try again.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub command: String,
    #[serde(default)]
    pub room_state: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub success: bool,
    pub response: String,
    pub action: ActionKind,
    pub data: ActionDescriptor,
}

impl From<ActionDescriptor> for AssistantResponse {
    fn from(descriptor: ActionDescriptor) -> Self {
        Self {
            success: true,
            response: descriptor.message.clone(),
            action: descriptor.action,
            data: descriptor,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DesignCommandRequest {
    pub command: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub is_public: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCommandResponse {
    pub success: bool,
    pub response: String,
    pub action: ActionKind,
    pub data: ActionDescriptor,
    pub applied: bool,
    pub design_state: DesignState,
}

type ApiError = (StatusCode, Json<Value>);

fn failure(status: StatusCode, error: &str) -> ApiError {
    (status, Json(json!({ "success": false, "error": error })))
}

fn store_failure(e: RoomError) -> ApiError {
    match e {
        RoomError::DesignNotFound(_) => failure(StatusCode::NOT_FOUND, "Design not found"),
        other => {
            tracing::error!(error = %other, "Design store failure");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn design_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Bad design id");
        failure(StatusCode::BAD_REQUEST, "Invalid design id")
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Bad request body");
        failure(StatusCode::BAD_REQUEST, &rejection.body_text())
    })
}

pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// `POST /api/ai-assistant`
///
/// The resolver itself never fails; the 500 path covers bodies that cannot
/// be read as a command.
pub async fn ai_assistant(
    State(state): State<AppState>,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::error!(error = %rejection, "AI assistant request rejected");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": ASSISTANT_FAILURE_ERROR,
                    "response": ASSISTANT_FAILURE_RESPONSE,
                })),
            )
                .into_response();
        }
    };

    tracing::info!(command = %request.command, "AI assistant called");
    let descriptor = state
        .resolver
        .resolve(&request.command, &request.room_state)
        .await;
    tracing::info!(action = %descriptor.action, "AI assistant response");

    Json(AssistantResponse::from(descriptor)).into_response()
}

/// `GET /api/ai-assistant`
pub async fn ai_assistant_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "AI Assistant API is running",
        "mode": state.resolver.mode(),
        "endpoints": ["POST /api/ai-assistant - Process voice/text commands"],
    }))
}

/// `POST /api/upload-room`
pub async fn upload_room(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Upload request rejected");
            return upload_failure();
        }
    };

    tracing::info!(
        image_url = %request.image_url,
        title = ?request.room_title,
        room_type = ?request.room_type,
        "Room upload request"
    );

    match process_upload(state.store.as_ref(), state.llm.as_ref(), request).await {
        Ok(design) => Json(json!({
            "success": true,
            "message": "Room uploaded and processed successfully",
            "designId": design.id,
            "designData": design,
        }))
        .into_response(),
        Err(RoomError::InvalidDesign(message)) => {
            failure(StatusCode::BAD_REQUEST, &message).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Room upload failed");
            upload_failure()
        }
    }
}

fn upload_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Failed to process room upload",
            "message": "There was an error processing your room photo. Please try again.",
        })),
    )
        .into_response()
}

/// `GET /api/upload-room`
pub async fn upload_room_info() -> Json<Value> {
    Json(json!({
        "message": "Room Upload API is running",
        "endpoints": ["POST /api/upload-room - Upload and process room photos"],
    }))
}

/// `GET /api/designs`
pub async fn list_designs(State(state): State<AppState>) -> Json<Vec<Design>> {
    Json(state.store.list())
}

/// `GET /api/designs/:id`
pub async fn get_design(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Design>, ApiError> {
    let id = design_id(path)?;
    state.store.get(id).map(Json).map_err(store_failure)
}

/// `DELETE /api/designs/:id`
pub async fn delete_design(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = design_id(path)?;
    state.store.delete(id).map_err(store_failure)?;
    tracing::info!(%id, "Deleted design");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/designs/:id/visibility`
pub async fn set_visibility(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<VisibilityRequest>, JsonRejection>,
) -> Result<Json<Design>, ApiError> {
    let id = design_id(path)?;
    let request = json_body(payload)?;
    let design = state
        .store
        .set_public(id, request.is_public)
        .map_err(store_failure)?;
    tracing::info!(%id, is_public = design.is_public, "Design visibility changed");
    Ok(Json(design))
}

/// `GET /api/shared/:slug` - public designs only, counts one view
pub async fn shared_design(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Design>, ApiError> {
    let design = state.store.get_by_slug(&slug).map_err(store_failure)?;
    if !design.is_public {
        return Err(failure(StatusCode::NOT_FOUND, "Design not found"));
    }
    state.store.increment_views(design.id).map_err(store_failure)?;
    state.store.get(design.id).map(Json).map_err(store_failure)
}

/// `POST /api/designs/:id/commands` - resolve, apply and persist
///
/// Resolution runs against a snapshot without holding the store. The
/// descriptor is then applied to whatever state is stored at that point,
/// so concurrent commands on one design all land.
pub async fn design_command(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<DesignCommandRequest>, JsonRejection>,
) -> Result<Json<DesignCommandResponse>, ApiError> {
    let id = design_id(path)?;
    let request = json_body(payload)?;

    let snapshot = state.store.get(id).map_err(store_failure)?;
    let descriptor = state
        .resolver
        .resolve(&request.command, &snapshot.design_state.to_room_state())
        .await;

    let (design, applied) = state
        .store
        .apply_action(id, &descriptor)
        .map_err(store_failure)?;
    tracing::info!(%id, action = %descriptor.action, applied, "Design command");

    Ok(Json(DesignCommandResponse {
        success: true,
        response: descriptor.message.clone(),
        action: descriptor.action,
        data: descriptor,
        applied,
        design_state: design.design_state,
    }))
}
