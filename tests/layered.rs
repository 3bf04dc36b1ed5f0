mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::{assert_endpoints, call, send, websocket_roundtrip, RequireRole, TestRouter};
use httprouter::layered::{self, LayeredApp};
use httprouter::prelude::*;

#[tokio::test]
async fn test_routes_reachable_under_joined_prefix() {
    common::init_tracing();
    let mut app: LayeredApp = LayeredApp::new();
    layered::mount_router(
        &mut app,
        Arc::new(TestRouter::ok()),
        MountOptions::new().prefix("/v1/"),
    )
    .unwrap();

    assert_endpoints(app.router(), "/v1/api").await;
}

#[tokio::test]
async fn test_websocket_roundtrip() {
    common::init_tracing();
    let mut app: LayeredApp = LayeredApp::new();
    layered::mount_router(&mut app, Arc::new(TestRouter::ok()), MountOptions::default()).unwrap();

    assert_eq!(websocket_roundtrip(app.router(), "/api/ws").await, "{}");
}

#[test]
fn test_mount_options_merge_into_router_spec() {
    common::init_tracing();
    let mut app: LayeredApp = LayeredApp::new();
    layered::mount_router(
        &mut app,
        Arc::new(TestRouter::ok()),
        MountOptions::new()
            .tags(["b", "c"])
            .response(401, ResponseDoc::new("Mount level"))
            .response(404, ResponseDoc::new("Not found")),
    )
    .unwrap();

    let post = app.operations().find("/api/post", HttpMethod::Post).unwrap();
    assert_eq!(post.tags, vec!["b", "c", "test", "writes"]);
    assert_eq!(post.responses[&401].description, "Unauthorized");
    assert_eq!(post.responses[&404].description, "Not found");

    let patch = app.operations().find("/api/patch", HttpMethod::Patch).unwrap();
    assert_eq!(patch.responses[&401].description, "Route level");
}

#[tokio::test]
async fn test_mount_guard_protects_every_route() {
    common::init_tracing();
    let mut app: LayeredApp = LayeredApp::new();
    layered::mount_router(
        &mut app,
        Arc::new(TestRouter::ok()),
        MountOptions::new().guard(RequireRole("reader")),
    )
    .unwrap();

    for (method, uri) in [("GET", "/api/get"), ("POST", "/api/post"), ("DELETE", "/api/delete")] {
        let (status, body) = call(app.router(), method, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 401);
    }

    let request = Request::builder()
        .uri("/api/get")
        .header("x-role", "reader")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"\"OK\"");
}

#[tokio::test]
async fn test_mount_guard_leaves_unsupported_method_to_axum() {
    common::init_tracing();
    let mut app: LayeredApp = LayeredApp::new();
    layered::mount_router(
        &mut app,
        Arc::new(TestRouter::ok()),
        MountOptions::new().guard(RequireRole("reader")),
    )
    .unwrap();

    let (status, _) = call(app.router(), "POST", "/api/get").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = call(app.router(), "PUT", "/api/delete").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_include_in_schema_given_at_mount_wins() {
    common::init_tracing();
    #[router(prefix = "/internal", include_in_schema = false)]
    struct Internal;

    #[routes]
    impl Internal {
        #[get("/a")]
        async fn a(&self) -> &'static str {
            "a"
        }

        #[get("/b", include_in_schema = true)]
        async fn b(&self) -> &'static str {
            "b"
        }
    }

    let mut hidden: LayeredApp = LayeredApp::new();
    layered::mount_router(&mut hidden, Arc::new(Internal::new()), MountOptions::default()).unwrap();
    let documented: Vec<_> = hidden.operations().documented().map(|op| op.path.as_str()).collect();
    assert_eq!(documented, vec!["/internal/b"]);

    let mut shown: LayeredApp = LayeredApp::new();
    layered::mount_router(
        &mut shown,
        Arc::new(Internal::new()),
        MountOptions::new().include_in_schema(true),
    )
    .unwrap();
    assert_eq!(shown.operations().documented().count(), 2);
}
