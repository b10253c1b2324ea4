//! Handler for the contact page form.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use mhc_core::contact::ContactForm;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::user_agent;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(flatten)]
    pub form: ContactForm,
    /// Page the form was submitted from.
    #[serde(default, alias = "pageUrl")]
    pub page_url: Option<String>,
}

/// POST /api/v1/contact
///
/// 201 with the inquiry id on success, 400 with per-field messages for an
/// invalid form, 503 with a phone fallback when the write fails.
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ContactRequest>,
) -> AppResult<impl IntoResponse> {
    let receipt = state
        .contact
        .submit(input.form, user_agent(&headers), input.page_url)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}
