use crate::guard::{Guard, GuardLayer};
use crate::interceptor::{Interceptor, InterceptorLayer};
use axum::{
    body::Body,
    extract::ws::{WebSocket, WebSocketUpgrade},
    handler::Handler,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Response,
    routing::{get, on, MethodFilter, MethodRouter},
};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type MakeMethodRouter<S> = Box<dyn FnOnce(MethodFilter) -> MethodRouter<S> + Send>;
type WsFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type WsFn = Arc<dyn Fn(WebSocket) -> WsFuture + Send + Sync>;

/// A type-erased HTTP handler waiting for its method set
pub struct Endpoint<S> {
    make: MakeMethodRouter<S>,
}

impl<S> Endpoint<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        Self {
            make: Box::new(move |filter| on(filter, handler)),
        }
    }

    pub fn into_method_router(self, filter: MethodFilter) -> MethodRouter<S> {
        (self.make)(filter)
    }
}

impl<S> fmt::Debug for Endpoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

/// A websocket handler; the upgrade is performed before it runs
#[derive(Clone)]
pub struct WsEndpoint {
    handler: WsFn,
}

impl WsEndpoint {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(WebSocket) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |socket| Box::pin(handler(socket))),
        }
    }

    pub fn into_method_router<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handler = self.handler;
        get(move |upgrade: WebSocketUpgrade| {
            let handler = Arc::clone(&handler);
            async move { upgrade.on_upgrade(move |socket| handler(socket)) }
        })
    }
}

impl fmt::Debug for WsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsEndpoint").finish_non_exhaustive()
    }
}

/// Per-route layers, applied innermost first: response status and headers,
/// interceptors, guards.
///
/// Every layer goes through `route_layer`, so a request whose method the route
/// does not accept still gets axum's `405` untouched.
#[derive(Default)]
pub(crate) struct RouteLayers {
    pub status_code: Option<u16>,
    pub response_headers: Vec<(HeaderName, HeaderValue)>,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
    pub guards: Vec<Arc<dyn Guard>>,
}

impl RouteLayers {
    pub fn apply<S>(self, mut route: MethodRouter<S>, path: &str) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let status = match self.status_code.map(StatusCode::from_u16) {
            Some(Ok(status)) => Some(status),
            Some(Err(_)) => {
                tracing::warn!(
                    "Ignoring invalid status code {:?} on {}",
                    self.status_code,
                    path
                );
                None
            }
            None => None,
        };

        if status.is_some() || !self.response_headers.is_empty() {
            let headers = Arc::new(self.response_headers);
            route = route.route_layer(axum::middleware::map_response(move |response: Response| {
                let headers = Arc::clone(&headers);
                async move { finish_response(response, status, &headers) }
            }));
        }
        wrap_route(route, &self.interceptors, &self.guards)
    }
}

/// Wrap the matched methods of a route in interceptors, then guards
///
/// Hosts call this once per enclosing level (router, mount call), so the
/// outermost level's guards run first.
pub(crate) fn wrap_route<S>(
    mut route: MethodRouter<S>,
    interceptors: &[Arc<dyn Interceptor>],
    guards: &[Arc<dyn Guard>],
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !interceptors.is_empty() {
        route = route.route_layer(InterceptorLayer::new(interceptors.to_vec()));
    }
    if !guards.is_empty() {
        route = route.route_layer(GuardLayer::new(guards.to_vec()));
    }
    route
}

/// Apply the declared status to a response still carrying the default `200 OK`
/// and add declared headers the handler did not set.
fn finish_response(
    mut response: Response,
    status: Option<StatusCode>,
    headers: &[(HeaderName, HeaderValue)],
) -> Response {
    if let Some(status) = status {
        if response.status() == StatusCode::OK {
            *response.status_mut() = status;
            if !allows_body(status) {
                response.headers_mut().remove(header::CONTENT_TYPE);
                response.headers_mut().remove(header::CONTENT_LENGTH);
                *response.body_mut() = Body::empty();
            }
        }
    }
    for (name, value) in headers {
        response
            .headers_mut()
            .entry(name.clone())
            .or_insert_with(|| value.clone());
    }
    response
}

fn allows_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use axum::Json;

    #[test]
    fn test_status_replaces_default_ok() {
        let response = finish_response(
            Json(vec![0]).into_response(),
            Some(StatusCode::ACCEPTED),
            &[],
        );
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_explicit_status_wins() {
        let response = finish_response(
            StatusCode::NOT_FOUND.into_response(),
            Some(StatusCode::ACCEPTED),
            &[],
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_no_content_drops_body() {
        let response = finish_response(
            Json(serde_json::Value::Null).into_response(),
            Some(StatusCode::NO_CONTENT),
            &[],
        );
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_headers_do_not_override_handler() {
        let name = HeaderName::from_static("x-source");
        let response = finish_response(
            ([(name.clone(), "handler")], "body").into_response(),
            None,
            &[
                (name.clone(), HeaderValue::from_static("route")),
                (HeaderName::from_static("x-extra"), HeaderValue::from_static("1")),
            ],
        );
        assert_eq!(response.headers()[&name], "handler");
        assert_eq!(response.headers()["x-extra"], "1");
    }

    struct Deny;

    #[async_trait::async_trait]
    impl Guard for Deny {
        async fn can_activate(
            &self,
            _parts: &axum::http::request::Parts,
        ) -> crate::guard::GuardResult {
            Err(crate::guard::GuardError::Forbidden("denied".into()))
        }
    }

    #[tokio::test]
    async fn test_unmatched_method_skips_route_layers() {
        use tower::ServiceExt;

        let layers = RouteLayers {
            status_code: Some(202),
            response_headers: vec![(
                HeaderName::from_static("x-route"),
                HeaderValue::from_static("1"),
            )],
            interceptors: Vec::new(),
            guards: vec![Arc::new(Deny) as Arc<dyn Guard>],
        };
        let route = layers.apply(
            Endpoint::<()>::new(|| async { "ok" }).into_method_router(MethodFilter::GET),
            "/items",
        );
        let app: axum::Router = axum::Router::new().route("/items", route);

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/items")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get("x-route").is_none());

        let request = axum::http::Request::builder()
            .uri("/items")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
