//! Public read handlers for site content.
//!
//! Every collection read answers 200; when the store could not be read the
//! envelope carries a `notice` alongside whatever data is available.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mhc_core::content::DEFAULT_BLOG_POST_LIMIT;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::{DataResponse, NoticeResponse};
use crate::services::content::{CatalogQuery, Listing};
use crate::state::AppState;

/// Upper bound for `?limit=` on list endpoints.
const MAX_LIST_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

fn notice<T: serde::Serialize>(listing: Listing<T>) -> Json<NoticeResponse<T>> {
    Json(NoticeResponse {
        data: listing.items,
        notice: listing.notice,
    })
}

/// GET /api/v1/projects?category=&q=&page=
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> impl IntoResponse {
    notice(state.content.catalog(&params).await)
}

/// GET /api/v1/projects/featured
pub async fn featured_projects(State(state): State<AppState>) -> impl IntoResponse {
    notice(state.content.featured().await)
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let project = state.content.project(&id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/blog-posts?limit=
pub async fn list_blog_posts(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_BLOG_POST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    notice(state.content.blog_posts(limit).await)
}

/// GET /api/v1/awards
pub async fn list_awards(State(state): State<AppState>) -> impl IntoResponse {
    notice(state.content.awards().await)
}

/// GET /api/v1/team-members
pub async fn list_team_members(State(state): State<AppState>) -> impl IntoResponse {
    notice(state.content.team_members().await)
}

/// GET /api/v1/client-logos
pub async fn list_client_logos(State(state): State<AppState>) -> impl IntoResponse {
    notice(state.content.client_logos().await)
}
