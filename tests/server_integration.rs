//! End-to-end tests for the HTTP API
//!
//! Each test binds the router to an ephemeral port and talks to it with
//! reqwest.

use axum::routing::post;
use axum::{Json, Router};
use dreamroom::command::action::{ActionKind, UNKNOWN_MESSAGE};
use dreamroom::command::CommandResolver;
use dreamroom::designs::MemoryDesignStore;
use dreamroom::llm::LlmClient;
use dreamroom::server::routes::{ASSISTANT_FAILURE_ERROR, ASSISTANT_FAILURE_RESPONSE};
use dreamroom::server::{build_app, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn spawn_app() -> String {
    spawn_with(AppState::offline()).await
}

async fn spawn_with(state: AppState) -> String {
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// App whose resolver talks to a local completion endpoint. `reply` maps
/// the user prompt to the model's JSON answer; every answer is delayed.
async fn spawn_delegated_app(reply: fn(&str) -> Value, delay: Duration) -> String {
    let stub = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(request): Json<Value>| async move {
            let prompt = request["messages"][1]["content"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            tokio::time::sleep(delay).await;
            let content = reply(&prompt).to_string();
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    let client = LlmClient::new(
        "test-key".into(),
        format!("http://{}/v1/chat/completions", addr),
        "test-model".into(),
    );
    let resolver = CommandResolver::delegated(client, Duration::from_secs(5));
    spawn_with(AppState::new(
        resolver,
        Arc::new(MemoryDesignStore::new()),
        None,
    ))
    .await
}

async fn upload(client: &Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/api/upload-room", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

// ============================================================================
// Health and info
// ============================================================================

#[tokio::test]
async fn test_healthz() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{}/healthz", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_assistant_info() {
    let base = spawn_app().await;
    let body: Value = reqwest::get(format!("{}/api/ai-assistant", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "AI Assistant API is running");
    assert_eq!(body["mode"], "keyword");
}

// ============================================================================
// AI assistant
// ============================================================================

#[tokio::test]
async fn test_assistant_known_command() {
    let base = spawn_app().await;
    let response = Client::new()
        .post(format!("{}/api/ai-assistant", base))
        .json(&json!({ "command": "Please add sofa to room", "roomState": {} }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "add_furniture");
    assert_eq!(body["data"]["item"], "modern_sofa");
    assert_eq!(body["data"]["position"]["x"], 0.0);
    assert_eq!(body["response"], body["data"]["message"]);
}

#[tokio::test]
async fn test_assistant_unknown_command() {
    let base = spawn_app().await;
    let body: Value = Client::new()
        .post(format!("{}/api/ai-assistant", base))
        .json(&json!({ "command": "hello there" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "unknown");
    assert_eq!(body["response"], UNKNOWN_MESSAGE);
}

#[tokio::test]
async fn test_assistant_bad_body_is_500() {
    let base = spawn_app().await;
    let client = Client::new();

    for body in ["not json at all", r#"{"roomState": {}}"#] {
        let response = client
            .post(format!("{}/api/ai-assistant", base))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], ASSISTANT_FAILURE_ERROR);
        assert_eq!(body["response"], ASSISTANT_FAILURE_RESPONSE);
    }
}

// ============================================================================
// Upload and designs
// ============================================================================

#[tokio::test]
async fn test_upload_room() {
    let base = spawn_app().await;
    let client = Client::new();

    let body = upload(
        &client,
        &base,
        json!({
            "imageUrl": "https://img.example/den.jpg",
            "roomTitle": "Cozy Den",
            "roomType": "den",
            "roomDescription": "Small den with a fireplace"
        }),
    )
    .await;

    assert_eq!(body["success"], true);
    let design = &body["designData"];
    assert_eq!(design["id"], body["designId"]);
    assert_eq!(design["title"], "Cozy Den");
    assert_eq!(design["description"], "Small den with a fireplace");
    assert_eq!(design["tags"], json!(["den", "ai-generated"]));
    assert_eq!(design["isPublic"], false);
    assert_eq!(design["modelUrl"], "/models/room-placeholder.glb");
    assert_eq!(
        design["designState"]["originalImage"],
        "https://img.example/den.jpg"
    );
    assert_eq!(design["designState"]["lighting"]["brightness"], 70);
}

#[tokio::test]
async fn test_upload_without_image_is_400() {
    let base = spawn_app().await;
    let response = Client::new()
        .post(format!("{}/api/upload-room", base))
        .json(&json!({ "roomTitle": "Nothing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_design_lifecycle() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = upload(
        &client,
        &base,
        json!({ "imageUrl": "https://img.example/lr.jpg", "roomTitle": "Living Room" }),
    )
    .await;
    let id = created["designId"].as_str().unwrap().to_string();
    let slug = created["designData"]["slug"].as_str().unwrap().to_string();

    // Listed
    let list: Vec<Value> = client
        .get(format!("{}/api/designs", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id.as_str());

    // Command applied and persisted
    let response: Value = client
        .post(format!("{}/api/designs/{}/commands", base, id))
        .json(&json!({ "command": "add coffee table" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["applied"], true);
    assert_eq!(response["action"], ActionKind::AddFurniture.as_str());
    assert_eq!(response["designState"]["furniture"][0]["type"], "coffee_table");

    let fetched: Value = client
        .get(format!("{}/api/designs/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["designState"]["furniture"][0]["material"], "glass");

    // Suggestions change nothing
    let response: Value = client
        .post(format!("{}/api/designs/{}/commands", base, id))
        .json(&json!({ "command": "add something" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["applied"], false);
    assert_eq!(
        response["designState"]["furniture"].as_array().unwrap().len(),
        1
    );

    // Private designs are not shared
    let response = client
        .get(format!("{}/api/shared/{}", base, slug))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let published: Value = client
        .put(format!("{}/api/designs/{}/visibility", base, id))
        .json(&json!({ "isPublic": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(published["isPublic"], true);

    // Shared view counts views
    let shared: Value = client
        .get(format!("{}/api/shared/{}", base, slug))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(shared["views"], 1);

    // Delete
    let response = client
        .delete(format!("{}/api/designs/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/api/designs/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_design_routes() {
    let base = spawn_app().await;
    let client = Client::new();
    let id = uuid::Uuid::new_v4();

    let response = client
        .post(format!("{}/api/designs/{}/commands", base, id))
        .json(&json!({ "command": "add sofa" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/api/shared/no-such-room", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/designs/not-a-uuid", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid design id");

    let response = client
        .delete(format!("{}/api/designs/42", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>().await.unwrap()["success"], false);

    let created = upload(
        &client,
        &base,
        json!({ "imageUrl": "https://img.example/bath.jpg" }),
    )
    .await;
    let id = created["designId"].as_str().unwrap().to_string();

    for body in ["{}", "not json", r#"{"command": 7}"#] {
        let response = client
            .post(format!("{}/api/designs/{}/commands", base, id))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }

    let response = client
        .put(format!("{}/api/designs/{}/visibility", base, id))
        .json(&json!({ "public": "yes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Delegated resolver behind the API
// ============================================================================

fn furniture_reply(prompt: &str) -> Value {
    let item = if prompt.contains("add a lamp") { "lamp" } else { "rug" };
    json!({
        "action": "add_furniture",
        "item": item,
        "position": { "x": 3, "y": 0, "z": 1.5 },
        "message": format!("Added a {item}.")
    })
}

#[tokio::test]
async fn test_assistant_returns_model_json_unchanged() {
    let base = spawn_delegated_app(furniture_reply, Duration::ZERO).await;
    let body: Value = Client::new()
        .post(format!("{}/api/ai-assistant", base))
        .json(&json!({ "command": "add a lamp", "roomState": {} }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "add_furniture");
    assert_eq!(body["data"], furniture_reply("add a lamp"));
    assert_eq!(body["data"]["position"], json!({ "x": 3, "y": 0, "z": 1.5 }));
}

#[tokio::test]
async fn test_concurrent_commands_on_one_design_all_persist() {
    let base = spawn_delegated_app(furniture_reply, Duration::from_millis(300)).await;
    let client = Client::new();

    let created = upload(
        &client,
        &base,
        json!({ "imageUrl": "https://img.example/study.jpg", "roomDescription": "A study" }),
    )
    .await;
    let id = created["designId"].as_str().unwrap().to_string();
    let url = format!("{}/api/designs/{}/commands", base, id);

    let (a, b) = tokio::join!(
        client.post(&url).json(&json!({ "command": "add a lamp" })).send(),
        client.post(&url).json(&json!({ "command": "add a rug" })).send(),
    );
    let a: Value = a.unwrap().json().await.unwrap();
    let b: Value = b.unwrap().json().await.unwrap();
    assert_eq!(a["applied"], true);
    assert_eq!(b["applied"], true);

    let fetched: Value = client
        .get(format!("{}/api/designs/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut kinds: Vec<&str> = fetched["designState"]["furniture"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["type"].as_str().unwrap())
        .collect();
    kinds.sort();
    assert_eq!(kinds, vec!["lamp", "rug"]);

    // The later of the two responses already sees both pieces
    let longest = [&a, &b]
        .iter()
        .map(|r| r["designState"]["furniture"].as_array().unwrap().len())
        .max();
    assert_eq!(longest, Some(2));
}
