//! Layered host
//!
//! Mounting copies the router spec, folds the mount options into the copy and
//! builds a [`LayeredRouter`] from it. The layered router wraps every route it
//! registers in the router's guards and interceptors, then the app registers
//! the whole router at once.
//!
//! Merge rules at mount time: tags are unioned, responses overlaid (router
//! entries win), the prefix is joined, and `include_in_schema` given at mount
//! time replaces the router's value.

use crate::catalog::{Catalog, Operation};
use crate::error::Result;
use crate::merge::{concat, join_path, overlay_responses, union_tags};
use crate::router::{
    inspect_router, wrap_route, Endpoint, MountOptions, RouteLayers, Router, WsEndpoint,
};
use crate::spec::{HttpMethod, RouteSpec, RouterSpec, WebSocketSpec};
use std::sync::Arc;

/// A router whose layers are applied to each route at registration
pub struct LayeredRouter<S = ()> {
    spec: RouterSpec,
    router: axum::Router<S>,
    operations: Vec<Operation>,
}

impl<S> LayeredRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(spec: RouterSpec) -> Self {
        Self {
            spec,
            router: axum::Router::new(),
            operations: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.spec.prefix
    }

    pub fn register(&mut self, spec: RouteSpec, endpoint: Endpoint<S>) {
        let path = join_path(&[&self.spec.prefix, &spec.path]);
        tracing::debug!("Registering {:?} {}", spec.methods, path);

        let mut operation = Operation::http(path.clone(), &spec);
        operation.tags = union_tags([self.spec.tags.as_slice(), spec.tags.as_slice()]);
        operation.responses = overlay_responses([&self.spec.responses, &spec.responses]);
        operation.deprecated = self.spec.deprecated.unwrap_or(false) || operation.deprecated;
        operation.include_in_schema = spec
            .include_in_schema
            .or(self.spec.include_in_schema)
            .unwrap_or(true);

        let RouteSpec {
            methods,
            status_code,
            response_headers,
            interceptors,
            guards,
            ..
        } = spec;
        let route = RouteLayers {
            status_code,
            response_headers,
            interceptors,
            guards,
        }
        .apply(
            endpoint.into_method_router(HttpMethod::filter_all(&methods)),
            &path,
        );
        let route = wrap_route(route, &self.spec.interceptors, &self.spec.guards);

        self.router = std::mem::take(&mut self.router).route(&path, route);
        self.operations.push(operation);
    }

    pub fn register_websocket(&mut self, spec: WebSocketSpec, endpoint: WsEndpoint) {
        let path = join_path(&[&self.spec.prefix, &spec.path]);
        tracing::debug!("Registering websocket {}", path);

        let route = wrap_route(
            endpoint.into_method_router(),
            &self.spec.interceptors,
            &self.spec.guards,
        );
        self.router = std::mem::take(&mut self.router).route(&path, route);
        self.operations.push(Operation::websocket(path, &spec));
    }
}

/// The layered host: registered routers merged into one axum router
pub struct LayeredApp<S = ()> {
    router: axum::Router<S>,
    catalog: Catalog,
}

impl<S> LayeredApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: axum::Router::new(),
            catalog: Catalog::new(),
        }
    }

    pub fn register(&mut self, router: LayeredRouter<S>) {
        tracing::debug!(
            "Registering router at {} ({} operations)",
            router.spec.prefix,
            router.operations.len()
        );
        self.router = std::mem::take(&mut self.router).merge(router.router);
        for operation in router.operations {
            self.catalog.push(operation);
        }
    }

    pub fn operations(&self) -> &Catalog {
        &self.catalog
    }

    pub fn router(&self) -> axum::Router<S> {
        self.router.clone()
    }
}

impl<S> Default for LayeredApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Mount a router onto a [`LayeredApp`]
pub fn mount_router<R, S>(
    app: &mut LayeredApp<S>,
    router: Arc<R>,
    options: MountOptions,
) -> Result<()>
where
    R: Router<S>,
    S: Clone + Send + Sync + 'static,
{
    let members = inspect_router(router)?;

    let mut spec = members.spec;
    spec.prefix = join_path(&[&options.prefix, &spec.prefix]);
    spec.tags = union_tags([options.tags.as_slice(), spec.tags.as_slice()]);
    spec.responses = overlay_responses([&options.responses, &spec.responses]);
    if options.deprecated == Some(true) {
        spec.deprecated = Some(true);
    }
    if options.include_in_schema.is_some() {
        spec.include_in_schema = options.include_in_schema;
    }
    spec.interceptors = concat([options.interceptors.as_slice(), spec.interceptors.as_slice()]);
    spec.guards = concat([options.guards.as_slice(), spec.guards.as_slice()]);

    let mut layered = LayeredRouter::new(spec);
    for (endpoint, route_spec) in members.routes {
        layered.register(route_spec, endpoint);
    }
    for (endpoint, ws_spec) in members.websocket_routes {
        layered.register_websocket(ws_spec, endpoint);
    }
    if let Some(lifespan) = members.lifespan {
        tracing::warn!(
            "Ignoring lifespan {}: the layered host does not run lifespans",
            lifespan.name()
        );
    }

    tracing::info!(
        "Mounted {} at {} ({} operations)",
        std::any::type_name::<R>(),
        layered.path(),
        layered.operations.len()
    );
    app.register(layered);
    Ok(())
}
