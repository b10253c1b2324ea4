//! HTTP-level tests for the public content endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_multipart};
use mhc_core::collections::{AWARDS, BLOG_POSTS, PROJECTS};
use mhc_gateway::{Fields, MemoryStore};
use serde_json::{json, Value};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// 15 published projects (every third one commercial, the rest medical),
/// plus one draft.
fn seed_portfolio(memory: &MemoryStore) {
    for n in 1..=15 {
        let category = if n % 3 == 0 { "commercial" } else { "medical" };
        memory.seed(
            PROJECTS,
            &format!("p{n:02}"),
            fields(json!({
                "title": format!("Project {n}"),
                "description": "Built by MH Construction",
                "category": category,
                "location": if n == 7 { "Walla Walla, WA" } else { "Pasco, WA" },
                "featured": n <= 8,
                "status": "published",
                "completedDate": format!("2024-01-{n:02}"),
            })),
        );
    }
    memory.seed(
        PROJECTS,
        "draft",
        fields(json!({"title": "Secret", "category": "medical", "status": "draft"})),
    );
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_pages_published_projects() {
    let app = common::build_test_app();
    seed_portfolio(&app.memory);

    let json = body_json(get(app.app(), "/api/v1/projects").await).await;
    let data = &json["data"];
    assert_eq!(data["total_matching"], 15);
    assert_eq!(data["projects"].as_array().unwrap().len(), 12);
    assert_eq!(data["has_more"], true);
    assert_eq!(data["filter"], "all");
    // Newest completion first.
    assert_eq!(data["projects"][0]["id"], "p15");
    assert!(json.get("notice").is_none());

    let json = body_json(get(app.app(), "/api/v1/projects?page=2").await).await;
    assert_eq!(json["data"]["projects"].as_array().unwrap().len(), 15);
    assert_eq!(json["data"]["has_more"], false);
}

#[tokio::test]
async fn catalog_filters_by_category_and_tracks_it() {
    let app = common::build_test_app();
    seed_portfolio(&app.memory);
    let mut events = app.event_bus.subscribe();

    let json = body_json(get(app.app(), "/api/v1/projects?category=commercial").await).await;
    assert_eq!(json["data"]["total_matching"], 5);
    assert_eq!(json["data"]["filter"], "commercial");

    let event = events.try_recv().unwrap();
    assert_eq!(event.name, "project_filter_used");
    assert_eq!(event.params["filter_category"], "commercial");
}

#[tokio::test]
async fn catalog_search_matches_location() {
    let app = common::build_test_app();
    seed_portfolio(&app.memory);

    let json = body_json(get(app.app(), "/api/v1/projects?q=walla").await).await;
    assert_eq!(json["data"]["total_matching"], 1);
    assert_eq!(json["data"]["projects"][0]["id"], "p07");
}

#[tokio::test]
async fn empty_store_serves_the_sample_portfolio() {
    let app = common::build_test_app();
    let json = body_json(get(app.app(), "/api/v1/projects").await).await;
    let projects = json["data"]["projects"].as_array().unwrap();
    assert!(!projects.is_empty());
    assert!(projects[0]["id"].as_str().unwrap().starts_with("sample-"));
}

#[tokio::test]
async fn failed_read_degrades_with_notice() {
    let app = common::build_test_app_with(|site| site.sample_portfolio_fallback = false);
    app.memory.set_failing(true);

    let response = get(app.app(), "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["projects"].as_array().unwrap().is_empty());
    assert!(json["notice"].is_string());
}

#[tokio::test]
async fn featured_is_limited_to_six() {
    let app = common::build_test_app();
    seed_portfolio(&app.memory);

    let json = body_json(get(app.app(), "/api/v1/projects/featured").await).await;
    let projects = json["data"].as_array().unwrap();
    assert_eq!(projects.len(), 6);
    assert!(projects.iter().all(|p| p["featured"] == true));
}

#[tokio::test]
async fn project_detail_hides_drafts() {
    let app = common::build_test_app_with(|site| site.sample_portfolio_fallback = false);
    seed_portfolio(&app.memory);

    let response = get(app.app(), "/api/v1/projects/p03").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Project 3");

    let response = get(app.app(), "/api/v1/projects/draft").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Other collections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blog_posts_default_to_latest_three_published() {
    let app = common::build_test_app();
    for n in 1..=5 {
        app.memory.seed(
            BLOG_POSTS,
            &format!("b{n}"),
            fields(json!({
                "title": format!("Post {n}"),
                "excerpt": "News",
                "status": "published",
                "publishedDate": format!("2024-0{n}-01T00:00:00Z"),
            })),
        );
    }
    app.memory.seed(
        BLOG_POSTS,
        "b-draft",
        fields(json!({"title": "Draft", "excerpt": "x", "status": "draft"})),
    );

    let json = body_json(get(app.app(), "/api/v1/blog-posts").await).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["b5", "b4", "b3"]);

    let json = body_json(get(app.app(), "/api/v1/blog-posts?limit=5").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn awards_are_capped_at_three() {
    let app = common::build_test_app();
    for n in 1..=4 {
        app.memory.seed(
            AWARDS,
            &format!("a{n}"),
            fields(json!({"title": format!("Award {n}"), "createdAt": format!("2024-0{n}-01T00:00:00Z")})),
        );
    }

    let json = body_json(get(app.app(), "/api/v1/awards").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"][0]["id"], "a4");
}

#[tokio::test]
async fn collection_failures_return_empty_with_notice() {
    let app = common::build_test_app();
    app.memory.set_failing(true);

    for uri in ["/api/v1/team-members", "/api/v1/client-logos", "/api/v1/blog-posts"] {
        let response = get(app.app(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["data"], json!([]), "{uri}");
        assert!(json["notice"].is_string(), "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Document upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_stores_file_under_inquiries() {
    let app = common::build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/v1/documents",
        "file",
        "site plans.pdf",
        "application/pdf",
        b"%PDF-1.4 test",
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let path = json["data"]["path"].as_str().unwrap();
    assert!(path.starts_with("inquiries/"));
    assert!(path.ends_with("_site_plans.pdf"));
    assert!(json["data"]["url"].as_str().unwrap().ends_with(path));

    let files = app.memory.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content_type, "application/pdf");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let app = common::build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/v1/documents",
        "attachment",
        "a.pdf",
        "application/pdf",
        b"data",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.memory.files().is_empty());
}
