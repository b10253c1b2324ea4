//! Public content routes, merged at the `/api/v1` root.

use axum::routing::get;
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// ```text
/// GET /projects              -> list_projects
/// GET /projects/featured     -> featured_projects
/// GET /projects/{id}         -> get_project
/// GET /blog-posts            -> list_blog_posts
/// GET /awards                -> list_awards
/// GET /team-members          -> list_team_members
/// GET /client-logos          -> list_client_logos
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(content::list_projects))
        .route("/projects/featured", get(content::featured_projects))
        .route("/projects/{id}", get(content::get_project))
        .route("/blog-posts", get(content::list_blog_posts))
        .route("/awards", get(content::list_awards))
        .route("/team-members", get(content::list_team_members))
        .route("/client-logos", get(content::list_client_logos))
}
