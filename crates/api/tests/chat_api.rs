//! HTTP-level tests for chatbot sessions.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json};
use mhc_core::collections::{CHATBOT_CONVERSATIONS, PROJECT_INQUIRIES};
use serde_json::json;

async fn start(app: &common::TestApp) -> String {
    let response = post_json(
        app.app(),
        "/api/v1/chat/sessions",
        json!({"page_url": "https://mhc-gc.com/services"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["conversation_id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_session_greets_and_persists() {
    let app = common::build_test_app();
    let response = post_json(app.app(), "/api/v1/chat/sessions", json!({})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let messages = json["data"]["messages"].as_array().unwrap();
    assert!(!messages.is_empty());
    assert_eq!(messages[0]["sender"], "bot");
    assert_eq!(json["data"]["lead_captured"], false);
    assert_eq!(app.memory.documents(CHATBOT_CONVERSATIONS).len(), 1);
}

#[tokio::test]
async fn start_session_accepts_an_empty_body() {
    let app = common::build_test_app();
    let response = post_empty(app.app(), "/api/v1/chat/sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = get(app.app(), "/api/v1/chat/sessions/conv_nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app.app(),
        "/api/v1/chat/sessions/conv_nope/messages",
        json!({"text": "hello"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_message_returns_400_without_change() {
    let app = common::build_test_app();
    let id = start(&app).await;
    let before = body_json(get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/messages"),
        json!({"text": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = body_json(get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await).await;
    assert_eq!(before["data"]["messages"], after["data"]["messages"]);
}

#[tokio::test]
async fn service_question_returns_reply_and_quick_replies() {
    let app = common::build_test_app();
    let id = start(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/messages"),
        json!({"message": "We need a new warehouse"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let messages = json["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "bot");
    assert!(messages[0]["message"].as_str().unwrap().contains("Industrial"));
    assert!(!json["data"]["quick_replies"].as_array().unwrap().is_empty());
    assert!(json["data"]["lead_form_due_in_ms"].is_null());

    // The visitor's message is recorded in the session ahead of the reply.
    let json = body_json(get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await).await;
    let messages = json["data"]["messages"].as_array().unwrap();
    assert_eq!(messages[messages.len() - 2]["sender"], "user");
    assert_eq!(messages[messages.len() - 2]["message"], "We need a new warehouse");
}

// ---------------------------------------------------------------------------
// Lead capture
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn cost_question_opens_form_after_delay_and_stores_lead() {
    let app = common::build_test_app();
    let id = start(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/messages"),
        json!({"text": "What's the cost for a medical building?"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["lead_form_due_in_ms"], 1000);

    let json = body_json(get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await).await;
    assert!(json["data"]["lead_form"].is_null());

    tokio::time::advance(Duration::from_millis(1000)).await;
    let json = body_json(get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await).await;
    assert_eq!(json["data"]["lead_form"]["reason"], "cost_estimate");
    assert!(!json["data"]["lead_form"]["project_types"]
        .as_array()
        .unwrap()
        .is_empty());

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/lead"),
        json!({
            "name": "Jane Doe",
            "phone": "509-555-1234",
            "email": "jane@example.com",
            "project_type": "medical"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["lead_captured"], true);

    let inquiries = app.memory.documents(PROJECT_INQUIRIES);
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0].get("reason"), Some(&json!("cost_estimate")));
    assert_eq!(inquiries[0].get("source"), Some(&json!("chatbot")));

    // Submitting again after capture is refused.
    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/lead"),
        json!({"name": "Jane Doe", "phone": "509-555-1234", "email": "jane@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.memory.documents(PROJECT_INQUIRIES).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn lead_missing_fields_returns_field_errors() {
    let app = common::build_test_app();
    let id = start(&app).await;
    post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/messages"),
        json!({"text": "Can I schedule a consultation?"}),
    )
    .await;
    tokio::time::advance(Duration::from_millis(1000)).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/lead"),
        json!({"name": "Jane Doe"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["phone"].is_string());
    assert!(json["fields"]["email"].is_string());
    assert!(app.memory.documents(PROJECT_INQUIRIES).is_empty());
}

#[tokio::test(start_paused = true)]
async fn lead_with_unselected_dropdowns_is_captured() {
    let app = common::build_test_app();
    let id = start(&app).await;
    post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/messages"),
        json!({"text": "How much would a new office cost?"}),
    )
    .await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    get(app.app(), &format!("/api/v1/chat/sessions/{id}")).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/lead"),
        json!({
            "name": "Jane Doe",
            "phone": "509-555-1234",
            "email": "jane@example.com",
            "projectType": "",
            "timeline": ""
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["lead_captured"], true);

    let inquiries = app.memory.documents(PROJECT_INQUIRIES);
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0].get("projectType"), Some(&json!(null)));
}

#[tokio::test]
async fn lead_without_form_returns_409() {
    let app = common::build_test_app();
    let id = start(&app).await;

    let response = post_json(
        app.app(),
        &format!("/api/v1/chat/sessions/{id}/lead"),
        json!({"name": "Jane", "phone": "5095551234", "email": "jane@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
