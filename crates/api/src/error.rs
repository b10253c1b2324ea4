use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mhc_core::error::{CoreError, FieldErrors};
use mhc_gateway::GatewayError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`GatewayError`] for remote
/// data failures, plus HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A write could not be completed. The message is shown to the visitor
    /// as-is and should point them at another way to reach us.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields: Option<&FieldErrors> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(errors) => {
                    fields = Some(errors);
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Please correct the highlighted fields".to_string(),
                    )
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Remote data errors ---
            AppError::Gateway(err) => classify_gateway_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": message,
                "code": code,
                "fields": fields,
            }),
            None => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a gateway error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - Everything else means the hosted backend could not be used and maps to
///   503 with a sanitized message.
fn classify_gateway_error(err: &GatewayError) -> (StatusCode, &'static str, String) {
    match err {
        GatewayError::NotFound { collection, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{collection} document {id} not found"),
        ),
        other => {
            tracing::error!(error = %other, "Remote data error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "The data service is temporarily unavailable".to_string(),
            )
        }
    }
}
