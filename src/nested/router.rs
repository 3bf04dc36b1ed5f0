use crate::catalog::Operation;
use crate::guard::Guard;
use crate::interceptor::Interceptor;
use crate::lifecycle::Lifespan;
use crate::merge::{join_path, overlay_responses, union_tags};
use crate::router::{wrap_route, Endpoint, MountOptions, RouteLayers, WsEndpoint};
use crate::spec::{HttpMethod, ResponseDoc, Responses, RouteSpec, RouterSpec, WebSocketSpec};
use axum::routing::MethodRouter;
use std::fmt;
use std::sync::Arc;

/// A group of routes sharing a prefix and documentation defaults
///
/// Routes are kept as one method router per path, the path already carrying the
/// router's prefix. Router tags, responses, `deprecated` and `include_in_schema`
/// are merged into each route as it is added; router guards and interceptors
/// are folded into every route when the router is included into an
/// [`ApiApp`](super::ApiApp) or another `ApiRouter`.
pub struct ApiRouter<S = ()> {
    prefix: String,
    tags: Vec<String>,
    responses: Responses,
    deprecated: bool,
    include_in_schema: bool,
    guards: Vec<Arc<dyn Guard>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    routes: Vec<(String, MethodRouter<S>)>,
    operations: Vec<Operation>,
    lifespans: Vec<Lifespan>,
}

/// A router resolved against mount options; paths start at the mount point
pub(super) struct IncludedRouter<S> {
    pub routes: Vec<(String, MethodRouter<S>)>,
    pub operations: Vec<Operation>,
    pub lifespans: Vec<Lifespan>,
}

impl<S> ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            tags: Vec::new(),
            responses: Responses::new(),
            deprecated: false,
            include_in_schema: true,
            guards: Vec::new(),
            interceptors: Vec::new(),
            routes: Vec::new(),
            operations: Vec::new(),
            lifespans: Vec::new(),
        }
    }

    /// A router carrying the defaults of a declared router spec
    pub fn from_spec(spec: &RouterSpec) -> Self {
        Self {
            prefix: spec.prefix.clone(),
            tags: spec.tags.clone(),
            responses: spec.responses.clone(),
            deprecated: spec.deprecated.unwrap_or(false),
            include_in_schema: spec.include_in_schema.unwrap_or(true),
            guards: spec.guards.clone(),
            interceptors: spec.interceptors.clone(),
            ..Self::new()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn response(mut self, status: u16, doc: ResponseDoc) -> Self {
        self.responses.insert(status, doc);
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn include_in_schema(mut self, include: bool) -> Self {
        self.include_in_schema = include;
        self
    }

    pub fn guard(mut self, guard: impl Guard) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn interceptor(mut self, interceptor: impl Interceptor) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }

    /// Operations registered so far, with paths under this router's prefix
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn add_api_route(&mut self, spec: RouteSpec, endpoint: Endpoint<S>) {
        let full_path = join_path(&[&self.prefix, &spec.path]);
        tracing::debug!("Adding route {:?} {}", spec.methods, full_path);

        let mut operation = Operation::http(full_path, &spec);
        operation.tags = union_tags([self.tags.as_slice(), spec.tags.as_slice()]);
        operation.responses = overlay_responses([&self.responses, &spec.responses]);
        operation.deprecated = self.deprecated || operation.deprecated;
        operation.include_in_schema = self.include_in_schema && operation.include_in_schema;

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
            &operation.path,
        );

        self.routes.push((operation.path.clone(), route));
        self.operations.push(operation);
    }

    pub fn add_api_websocket_route(&mut self, spec: WebSocketSpec, endpoint: WsEndpoint) {
        let full_path = join_path(&[&self.prefix, &spec.path]);
        tracing::debug!("Adding websocket route {}", full_path);

        self.routes.push((full_path.clone(), endpoint.into_method_router()));
        self.operations.push(Operation::websocket(full_path, &spec));
    }

    pub fn register_lifespan(&mut self, lifespan: Lifespan) {
        self.lifespans.push(lifespan);
    }

    /// Include another router below this one
    ///
    /// The sub-router's operations take this router's defaults as their
    /// outermost layer, the same way routes added directly do.
    pub fn include_router(&mut self, router: ApiRouter<S>, options: MountOptions) {
        let included = router.resolve(&options);
        for (path, route) in included.routes {
            self.routes.push((join_path(&[&self.prefix, &path]), route));
        }
        for mut operation in included.operations {
            operation.path = join_path(&[&self.prefix, &operation.path]);
            if !operation.is_websocket() {
                operation.tags = union_tags([self.tags.as_slice(), operation.tags.as_slice()]);
                operation.responses =
                    overlay_responses([&self.responses, &operation.responses]);
                operation.deprecated = self.deprecated || operation.deprecated;
                operation.include_in_schema =
                    self.include_in_schema && operation.include_in_schema;
            }
            self.operations.push(operation);
        }
        self.lifespans.extend(included.lifespans);
    }

    /// Apply mount options and this router's layers; paths of the returned
    /// operations start at the mount point.
    pub(super) fn resolve(self, options: &MountOptions) -> IncludedRouter<S> {
        let operations = self
            .operations
            .into_iter()
            .map(|mut operation| {
                operation.path = join_path(&[&options.prefix, &operation.path]);
                if !operation.is_websocket() {
                    operation.tags =
                        union_tags([options.tags.as_slice(), operation.tags.as_slice()]);
                    operation.responses =
                        overlay_responses([&options.responses, &operation.responses]);
                    operation.deprecated =
                        options.deprecated.unwrap_or(false) || operation.deprecated;
                    operation.include_in_schema =
                        options.include_in_schema.unwrap_or(true) && operation.include_in_schema;
                }
                operation
            })
            .collect();

        tracing::debug!(
            "Including {} routes at {} ({} interceptors, {} guards)",
            self.routes.len(),
            join_path(&[&options.prefix, &self.prefix]),
            options.interceptors.len() + self.interceptors.len(),
            options.guards.len() + self.guards.len()
        );
        // Router interceptors sit inside router guards, which sit inside the
        // mount layers.
        let routes = self
            .routes
            .into_iter()
            .map(|(path, route)| {
                let route = wrap_route(route, &self.interceptors, &self.guards);
                let route = wrap_route(route, &options.interceptors, &options.guards);
                (join_path(&[&options.prefix, &path]), route)
            })
            .collect();

        IncludedRouter {
            routes,
            operations,
            lifespans: self.lifespans,
        }
    }
}

impl<S> Default for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for ApiRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRouter")
            .field("prefix", &self.prefix)
            .field("tags", &self.tags)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("operations", &self.operations.len())
            .field("lifespans", &self.lifespans.len())
            .finish_non_exhaustive()
    }
}
