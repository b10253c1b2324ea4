//! Admin content routes mounted at `/admin`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// POST /projects                   -> create_project
/// PUT  /projects/{id}              -> update_project
/// POST /projects/{id}/publish      -> publish_project
/// POST /blog-posts                 -> create_blog_post
/// POST /blog-posts/{id}/publish    -> publish_blog_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(admin::create_project))
        .route("/projects/{id}", put(admin::update_project))
        .route("/projects/{id}/publish", post(admin::publish_project))
        .route("/blog-posts", post(admin::create_blog_post))
        .route("/blog-posts/{id}/publish", post(admin::publish_blog_post))
}
