//! Project document uploads (plans, drawings, photos attached to inquiries).

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use mhc_core::analytics::FILE_UPLOADED;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Storage folder for inquiry attachments.
const UPLOAD_PREFIX: &str = "inquiries";

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// Largest accepted upload body, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub url: String,
    pub path: String,
}

/// Keep letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

/// POST /api/v1/documents
///
/// Store the `file` field under `inquiries/{timestamp}_{name}` and return
/// its download URL.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResult>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or("document"));
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let size = data.len();
        let path = format!(
            "{UPLOAD_PREFIX}/{}_{file_name}",
            chrono::Utc::now().timestamp_millis()
        );
        let url = state
            .gateway
            .files
            .upload_file(&path, data.to_vec(), &content_type)
            .await?;

        state.analytics.track(
            FILE_UPLOADED,
            json!({ "path": path, "content_type": content_type, "size": size }),
        );
        return Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: UploadResult { url, path },
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "Multipart upload must include a '{FILE_FIELD}' field"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("plans v2.pdf"), "plans_v2.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\site.dwg"), "site.dwg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "document");
    }
}
