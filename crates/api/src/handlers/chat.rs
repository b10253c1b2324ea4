//! Handlers for chatbot sessions.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use mhc_core::chat::lead::LeadForm;
use mhc_core::chat::session::SessionMetadata;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::user_agent;
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional context sent when the widget opens.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default, alias = "pageUrl")]
    pub page_url: Option<String>,
    #[serde(default, alias = "userAgent")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(alias = "message")]
    pub text: String,
}

/// POST /api/v1/chat/sessions
///
/// Open a conversation. The body is optional; the user agent falls back to
/// the request header.
pub async fn start_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<StartSessionRequest>>,
) -> AppResult<impl IntoResponse> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let metadata = SessionMetadata {
        page_url: input.page_url,
        user_agent: input.user_agent.or_else(|| user_agent(&headers)),
    };
    let view = state.chat.start(metadata).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/chat/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let view = state.chat.view(&id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/chat/sessions/{id}/messages
///
/// 400 for blank text, 409 while the previous message is still being
/// answered.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let turn = state.chat.send_message(&id, input.text).await?;
    Ok(Json(DataResponse { data: turn }))
}

/// POST /api/v1/chat/sessions/{id}/lead
pub async fn submit_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<LeadForm>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.chat.submit_lead(&id, form).await?;
    Ok(Json(DataResponse { data: outcome }))
}
