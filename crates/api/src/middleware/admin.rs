//! Bearer-token guard for the content administration routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use mhc_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor: the request carried the admin token.
///
/// ```ignore
/// async fn publish(_admin: RequireAdmin, State(state): State<AppState>) -> AppResult<StatusCode> {
///     ...
/// }
/// ```
///
/// Rejects with 403 when no `ADMIN_TOKEN` is configured and with 401 when the
/// token is missing or wrong.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.site.admin_token.as_deref() else {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin routes are disabled".into(),
            )));
        };

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if !tokens_match(token.trim(), expected) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin token".into(),
            )));
        }
        Ok(RequireAdmin)
    }
}

/// Comparison whose running time does not depend on where the tokens differ.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
