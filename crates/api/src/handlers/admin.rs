//! Content administration: drafts and publishing for projects and blog posts.
//!
//! All handlers require the admin Bearer token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mhc_core::analytics::DOCUMENT_CREATED;
use mhc_core::collections::{BLOG_POSTS, PROJECTS};
use mhc_core::content::{BlogPostDraft, ProjectDraft, PublicationStatus};
use mhc_gateway::repositories::ContentRepo;
use mhc_gateway::Fields;
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedDocument {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Published {
    pub id: String,
    pub status: &'static str,
}

fn created(state: &AppState, collection: &str, id: String) -> impl IntoResponse {
    state.analytics.track(
        DOCUMENT_CREATED,
        json!({ "collection": collection, "document_id": id }),
    );
    (
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedDocument { id },
        }),
    )
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/projects
pub async fn create_project(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> AppResult<impl IntoResponse> {
    draft.validate()?;
    let id = ContentRepo::create_project_draft(state.gateway.store.as_ref(), &draft).await?;
    Ok(created(&state, PROJECTS, id))
}

/// PUT /api/v1/admin/projects/{id}
///
/// Merge the given fields into the project. `id` and `status` are ignored;
/// publishing has its own endpoint.
pub async fn update_project(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<Fields>,
) -> AppResult<impl IntoResponse> {
    ContentRepo::update_project(state.gateway.store.as_ref(), &id, changes).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/projects/{id}/publish
pub async fn publish_project(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    ContentRepo::publish_project(state.gateway.store.as_ref(), &id).await?;
    Ok(Json(DataResponse {
        data: Published {
            id,
            status: PublicationStatus::Published.as_str(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Blog posts
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/blog-posts
pub async fn create_blog_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<BlogPostDraft>,
) -> AppResult<impl IntoResponse> {
    draft.validate()?;
    let id = ContentRepo::create_blog_post_draft(state.gateway.store.as_ref(), &draft).await?;
    Ok(created(&state, BLOG_POSTS, id))
}

/// POST /api/v1/admin/blog-posts/{id}/publish
pub async fn publish_blog_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    ContentRepo::publish_blog_post(state.gateway.store.as_ref(), &id).await?;
    Ok(Json(DataResponse {
        data: Published {
            id,
            status: PublicationStatus::Published.as_str(),
        },
    }))
}
