pub mod admin;
pub mod chat;
pub mod content;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::handlers::documents::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /chat/sessions                              start session (POST)
/// /chat/sessions/{id}                         session view
/// /chat/sessions/{id}/messages                send message (POST)
/// /chat/sessions/{id}/lead                    submit lead form (POST)
///
/// /contact                                    contact form (POST)
///
/// /projects                                   catalog (?category, ?q, ?page)
/// /projects/featured                          featured projects
/// /projects/{id}                              project detail
/// /blog-posts                                 latest posts (?limit)
/// /awards                                     latest awards
/// /team-members                               team
/// /client-logos                               client logos
///
/// /documents                                  multipart upload (POST)
///
/// /admin/projects                             create draft (admin)
/// /admin/projects/{id}                        update (PUT, admin)
/// /admin/projects/{id}/publish                publish (POST, admin)
/// /admin/blog-posts                           create draft (admin)
/// /admin/blog-posts/{id}/publish              publish (POST, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/chat/sessions", chat::router())
        .route("/contact", post(handlers::contact::submit_contact))
        .merge(content::router())
        .route(
            "/documents",
            post(handlers::documents::upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest("/admin", admin::router())
}
