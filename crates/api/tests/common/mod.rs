#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mhc_api::config::{ServerConfig, SiteConfig};
use mhc_api::router::build_app_router;
use mhc_api::services::LocalAssistant;
use mhc_api::state::{AppState, Gateway};
use mhc_events::{EventBus, FunctionNotifier};
use mhc_gateway::MemoryStore;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    }
}

/// A router over an in-memory gateway, plus the handles tests inspect.
pub struct TestApp {
    pub router: Router,
    pub memory: Arc<MemoryStore>,
    pub event_bus: Arc<EventBus>,
    /// Contact fallback directory; removed when the app is dropped.
    pub fallback_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, using the
/// default site settings and the test admin token.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Like [`build_test_app`], with a hook to adjust the site settings.
pub fn build_test_app_with(adjust: impl FnOnce(&mut SiteConfig)) -> TestApp {
    let fallback_dir = TempDir::new().unwrap();
    let mut site = SiteConfig {
        contact_fallback_dir: fallback_dir.path().to_path_buf(),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..SiteConfig::default()
    };
    adjust(&mut site);

    let memory = Arc::new(MemoryStore::new());
    let gateway = Gateway::memory(Arc::clone(&memory));
    let notifier = Arc::new(FunctionNotifier::new(Arc::clone(&gateway.functions)));
    let event_bus = Arc::new(EventBus::default());
    let config = test_config();

    let state = AppState::new(
        config.clone(),
        site,
        gateway,
        Arc::new(LocalAssistant::default()),
        notifier,
        Arc::clone(&event_bus),
    );

    TestApp {
        router: build_app_router(state, &config),
        memory,
        event_bus,
        fallback_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

/// POST with an empty body and no content type.
pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_as(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_as(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

/// POST a single-file multipart body.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response {
    const BOUNDARY: &str = "mhc-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
