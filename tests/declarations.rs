mod common;

use common::TestRouter;
use httprouter::flat::{self, FlatApp};
use httprouter::prelude::*;
use httprouter::{inspect_router, RouterDecl, RouterMembers};

#[test]
fn test_router_attribute_declares_spec() {
    common::init_tracing();
    let spec = <TestRouter as RouterDecl>::router_spec();

    assert_eq!(spec.prefix, "/api");
    assert_eq!(spec.tags, vec!["test"]);
    assert_eq!(spec.responses[&401].description, "Unauthorized");
    assert_eq!(spec.deprecated, None);
    assert_eq!(spec.include_in_schema, None);
}

#[test]
fn test_inspect_finds_one_entry_per_declared_method() {
    common::init_tracing();
    let members: RouterMembers = inspect_router(Arc::new(TestRouter::ok())).unwrap();

    let routes: Vec<_> = members
        .routes
        .iter()
        .map(|(_, spec)| (spec.path.as_str(), spec.methods.clone()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("/get", vec![HttpMethod::Get]),
            ("/post", vec![HttpMethod::Post]),
            ("/put", vec![HttpMethod::Put]),
            ("/patch", vec![HttpMethod::Patch]),
            ("/delete", vec![HttpMethod::Delete]),
        ]
    );
    assert_eq!(members.websocket_routes.len(), 1);
    assert_eq!(members.websocket_routes[0].1.path, "/ws");
    assert_eq!(members.websocket_routes[0].1.name.as_deref(), Some("feed"));
    assert!(members.lifespan.is_some());
}

#[test]
fn test_route_attributes_fill_spec() {
    common::init_tracing();
    let members: RouterMembers = inspect_router(Arc::new(TestRouter::ok())).unwrap();
    let spec = |path: &str| {
        members
            .routes
            .iter()
            .map(|(_, spec)| spec)
            .find(|spec| spec.path == path)
            .unwrap()
    };

    let get = spec("/get");
    assert_eq!(get.name.as_deref(), Some("read"));
    assert_eq!(get.description.as_deref(), Some("Read the message"));
    assert_eq!(get.status_code, None);

    let post = spec("/post");
    assert_eq!(post.status_code, Some(202));
    assert_eq!(post.tags, vec!["writes"]);
    assert_eq!(post.description, None);

    assert_eq!(spec("/patch").responses[&401].description, "Route level");
}

#[router]
struct Bare;

#[routes]
impl Bare {
    /// Multi-line docs
    ///
    /// stay together.
    #[route(
        "/either",
        methods = [GET, post],
        name = "either_way",
        summary = "Either",
        operation_id = "either",
        deprecated = true,
        headers = { "x-either": "1" },
    )]
    async fn either(&self) -> &'static str {
        "either"
    }

    #[get("/static")]
    async fn associated() -> &'static str {
        "no receiver"
    }

    fn helper(&self) -> u8 {
        7
    }
}

#[test]
fn test_bare_router_and_route_options() {
    common::init_tracing();
    let spec = <Bare as RouterDecl>::router_spec();
    assert_eq!(spec.prefix, "");
    assert!(spec.tags.is_empty());

    let members: RouterMembers = inspect_router(Arc::new(Bare::new())).unwrap();
    assert_eq!(members.routes.len(), 2);
    assert!(members.lifespan.is_none());

    let either = &members.routes[0].1;
    assert_eq!(either.methods, vec![HttpMethod::Get, HttpMethod::Post]);
    assert_eq!(either.name.as_deref(), Some("either_way"));
    assert_eq!(either.summary.as_deref(), Some("Either"));
    assert_eq!(either.operation_id.as_deref(), Some("either"));
    assert_eq!(either.deprecated, Some(true));
    assert_eq!(either.description.as_deref(), Some("Multi-line docs\n\nstay together."));
    assert_eq!(either.response_headers.len(), 1);

    assert_eq!(Bare::new().helper(), 7);
}

#[tokio::test]
async fn test_route_options_apply_at_request_time() {
    common::init_tracing();
    let mut app: FlatApp = FlatApp::new();
    flat::mount_router(&mut app, Arc::new(Bare::new()), "").unwrap();
    let router = app.into_router();

    let (status, body) = common::call(router.clone(), "POST", "/either").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"either");

    let response = tower::ServiceExt::oneshot(
        router.clone(),
        axum::http::Request::builder()
            .uri("/either")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.headers()["x-either"], "1");

    let (status, body) = common::call(router, "GET", "/static").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"no receiver");
}

#[router(prefix = "/counter")]
struct Counter {
    step: u32,
    label: &'static str,
    #[default]
    hits: std::sync::atomic::AtomicU32,
}

#[routes]
impl Counter {
    #[post("/hit")]
    async fn hit(&self) -> String {
        let before = self
            .hits
            .fetch_add(self.step, std::sync::atomic::Ordering::SeqCst);
        format!("{} {}", self.label, before + self.step)
    }
}

#[tokio::test]
async fn test_constructor_takes_fields_in_order() {
    common::init_tracing();
    let mut app: FlatApp = FlatApp::new();
    flat::mount_router(&mut app, Arc::new(Counter::new(5, "hits")), "").unwrap();
    let router = app.into_router();

    common::call(router.clone(), "POST", "/counter/hit").await;
    let (_, body) = common::call(router, "POST", "/counter/hit").await;
    assert_eq!(body, b"hits 10");
}
