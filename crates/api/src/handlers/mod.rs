pub mod admin;
pub mod chat;
pub mod contact;
pub mod content;
pub mod documents;

use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;

/// The `User-Agent` request header, when present and readable.
pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
