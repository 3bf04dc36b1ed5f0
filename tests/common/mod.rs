#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use httprouter::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tower::ServiceExt;

/// Route `tracing` output through the test harness so it shows with failures
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A router with one endpoint per method, a websocket and a lifespan
#[router(prefix = "/api", tags = ["test"], responses = { 401: "Unauthorized" })]
pub struct TestRouter {
    msg: String,
    #[default]
    pub started: AtomicBool,
    #[default]
    pub stopped: AtomicBool,
    #[default]
    pub teardowns: AtomicUsize,
}

#[routes]
impl TestRouter {
    /// Read the message
    #[get("/get")]
    async fn read(&self) -> Json<String> {
        Json(self.msg.clone())
    }

    #[post("/post", status_code = 202, tags = ["writes"])]
    async fn create(&self) -> Json<Vec<i32>> {
        Json(vec![0])
    }

    #[put("/put", status_code = 203)]
    async fn replace(&self) -> Json<Vec<i32>> {
        Json(vec![0])
    }

    #[patch("/patch", status_code = 203, responses = { 401: "Route level" })]
    async fn update(&self) -> Json<Vec<i32>> {
        Json(vec![0])
    }

    #[delete("/delete", status_code = 204)]
    async fn remove(&self) -> Json<serde_json::Value> {
        Json(serde_json::Value::Null)
    }

    #[websocket("/ws")]
    async fn feed(&self, mut socket: WebSocket) {
        let _ = socket.send(Message::Text("{}".into())).await;
        let _ = socket.send(Message::Close(None)).await;
    }

    #[lifespan]
    async fn lifespan(&self, running: Running) {
        self.started.store(true, Ordering::SeqCst);
        running.await;
        self.stopped.store(true, Ordering::SeqCst);
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

impl TestRouter {
    pub fn ok() -> Self {
        Self::new("OK".to_string())
    }
}

/// Appends its label to a shared log, then calls the next layer
pub struct Record(pub &'static str, pub &'static Mutex<Vec<&'static str>>);

#[async_trait]
impl Interceptor for Record {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult {
        self.1.lock().unwrap().push(self.0);
        next.run(request).await
    }
}

/// Rejects requests without the given role header value
pub struct RequireRole(pub &'static str);

#[async_trait]
impl Guard for RequireRole {
    async fn can_activate(&self, parts: &axum::http::request::Parts) -> GuardResult {
        match parts.headers.get("x-role") {
            None => Err(GuardError::Unauthorized("no role".into())),
            Some(role) if role == self.0 => Ok(()),
            Some(_) => Err(GuardError::Forbidden(format!("{} only", self.0))),
        }
    }
}

pub async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn call(router: axum::Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

/// Check every endpoint of a mounted `TestRouter` under `prefix`
pub async fn assert_endpoints(router: axum::Router, prefix: &str) {
    let (status, body) = call(router.clone(), "GET", &format!("{}/get", prefix)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"\"OK\"");

    let (status, body) = call(router.clone(), "POST", &format!("{}/post", prefix)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, b"[0]");

    for method in ["PUT", "PATCH"] {
        let uri = format!("{}/{}", prefix, method.to_lowercase());
        let (status, body) = call(router.clone(), method, &uri).await;
        assert_eq!(status, StatusCode::NON_AUTHORITATIVE_INFORMATION);
        assert_eq!(body, b"[0]");
    }

    let (status, body) = call(router, "DELETE", &format!("{}/delete", prefix)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

/// Serve `router` on an ephemeral port and read the first websocket message
pub async fn websocket_roundtrip(router: axum::Router, path: &str) -> String {
    use futures_util::StreamExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let (mut stream, _) = tokio_tungstenite::connect_async(format!("ws://{}{}", addr, path))
        .await
        .unwrap();
    let message = stream.next().await.unwrap().unwrap();
    let text = message.to_text().unwrap().to_string();

    let closing = stream.next().await;
    assert!(matches!(
        closing,
        Some(Ok(tokio_tungstenite::tungstenite::Message::Close(_))) | None
    ));

    server.abort();
    text
}
