//! Flat host
//!
//! A plain route table: mounting pushes one [`Route`] or [`WebSocketRoute`]
//! record per endpoint, with the full path computed up front by
//! [`join_path`](crate::merge::join_path). Router interceptors and guards are
//! concatenated in front of the route's own. The table becomes an axum router
//! only when [`FlatApp::into_router`] is called.

use crate::catalog::{Catalog, Operation};
use crate::error::Result;
use crate::merge::{concat, join_path};
use crate::router::{inspect_router, Endpoint, RouteLayers, Router, WsEndpoint};
use crate::spec::{HttpMethod, RouteSpec, WebSocketSpec};
use std::fmt;
use std::sync::Arc;

/// An HTTP route record; `spec.path` holds the full path
pub struct Route<S = ()> {
    pub spec: RouteSpec,
    endpoint: Endpoint<S>,
}

impl<S> Route<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(spec: RouteSpec, endpoint: Endpoint<S>) -> Self {
        Self { spec, endpoint }
    }

    pub fn path(&self) -> &str {
        &self.spec.path
    }

    fn into_method_router(self) -> axum::routing::MethodRouter<S> {
        let RouteSpec {
            path,
            methods,
            status_code,
            response_headers,
            interceptors,
            guards,
            ..
        } = self.spec;
        RouteLayers {
            status_code,
            response_headers,
            interceptors,
            guards,
        }
        .apply(
            self.endpoint
                .into_method_router(HttpMethod::filter_all(&methods)),
            &path,
        )
    }
}

/// A websocket route record; `spec.path` holds the full path
pub struct WebSocketRoute {
    pub spec: WebSocketSpec,
    endpoint: WsEndpoint,
}

impl WebSocketRoute {
    pub fn new(spec: WebSocketSpec, endpoint: WsEndpoint) -> Self {
        Self { spec, endpoint }
    }

    pub fn path(&self) -> &str {
        &self.spec.path
    }
}

pub enum RouteEntry<S = ()> {
    Http(Route<S>),
    WebSocket(WebSocketRoute),
}

impl<S> RouteEntry<S> {
    pub fn path(&self) -> &str {
        match self {
            RouteEntry::Http(route) => &route.spec.path,
            RouteEntry::WebSocket(route) => &route.spec.path,
        }
    }
}

impl<S> fmt::Debug for RouteEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteEntry::Http(route) => f.debug_tuple("Http").field(&route.spec).finish(),
            RouteEntry::WebSocket(route) => f.debug_tuple("WebSocket").field(&route.spec).finish(),
        }
    }
}

/// The flat host: an ordered route table
pub struct FlatApp<S = ()> {
    routes: Vec<RouteEntry<S>>,
}

impl<S> FlatApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn routes(&self) -> &[RouteEntry<S>] {
        &self.routes
    }

    pub fn push_route(&mut self, route: Route<S>) {
        tracing::debug!("Adding route {:?} {}", route.spec.methods, route.spec.path);
        self.routes.push(RouteEntry::Http(route));
    }

    pub fn push_websocket_route(&mut self, route: WebSocketRoute) {
        tracing::debug!("Adding websocket route {}", route.spec.path);
        self.routes.push(RouteEntry::WebSocket(route));
    }

    /// One operation per table entry, in table order
    pub fn operations(&self) -> Catalog {
        let mut catalog = Catalog::new();
        for entry in &self.routes {
            match entry {
                RouteEntry::Http(route) => {
                    catalog.push(Operation::http(route.spec.path.clone(), &route.spec))
                }
                RouteEntry::WebSocket(route) => {
                    catalog.push(Operation::websocket(route.spec.path.clone(), &route.spec))
                }
            }
        }
        catalog
    }

    /// Build the axum router for the whole table
    pub fn into_router(self) -> axum::Router<S> {
        self.routes
            .into_iter()
            .fold(axum::Router::new(), |router, entry| match entry {
                RouteEntry::Http(route) => {
                    let path = route.spec.path.clone();
                    router.route(&path, route.into_method_router())
                }
                RouteEntry::WebSocket(route) => {
                    router.route(&route.spec.path, route.endpoint.into_method_router())
                }
            })
    }
}

impl<S> Default for FlatApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Mount a router onto a [`FlatApp`] under `prefix`
///
/// Every route lands at `prefix + router prefix + route path`.
pub fn mount_router<R, S>(app: &mut FlatApp<S>, router: Arc<R>, prefix: &str) -> Result<()>
where
    R: Router<S>,
    S: Clone + Send + Sync + 'static,
{
    let members = inspect_router(router)?;
    let router_spec = members.spec;
    let mounted = members.routes.len() + members.websocket_routes.len();

    for (endpoint, mut spec) in members.routes {
        spec.path = join_path(&[prefix, &router_spec.prefix, &spec.path]);
        spec.interceptors = concat([
            router_spec.interceptors.as_slice(),
            spec.interceptors.as_slice(),
        ]);
        spec.guards = concat([router_spec.guards.as_slice(), spec.guards.as_slice()]);
        if router_spec.include_in_schema == Some(false) {
            spec.include_in_schema = Some(false);
        }
        app.push_route(Route::new(spec, endpoint));
    }
    for (endpoint, mut spec) in members.websocket_routes {
        spec.path = join_path(&[prefix, &router_spec.prefix, &spec.path]);
        app.push_websocket_route(WebSocketRoute::new(spec, endpoint));
    }
    if let Some(lifespan) = members.lifespan {
        tracing::warn!(
            "Ignoring lifespan {}: the flat host does not run lifespans",
            lifespan.name()
        );
    }

    tracing::info!(
        "Mounted {} ({} routes)",
        std::any::type_name::<R>(),
        mounted
    );
    Ok(())
}
