//! Chatbot session routes mounted at `/chat/sessions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// ```text
/// POST /                 -> start_session
/// GET  /{id}             -> get_session
/// POST /{id}/messages    -> send_message
/// POST /{id}/lead        -> submit_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(chat::start_session))
        .route("/{id}", get(chat::get_session))
        .route("/{id}/messages", post(chat::send_message))
        .route("/{id}/lead", post(chat::submit_lead))
}
