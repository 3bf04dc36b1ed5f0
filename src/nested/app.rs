use super::router::ApiRouter;
use crate::catalog::{Catalog, Operation};
use crate::config::ServeConfig;
use crate::error::Result;
use crate::lifecycle::{Lifespan, LifespanManager};
use crate::router::{Endpoint, MountOptions, WsEndpoint};
use crate::spec::{RouteSpec, WebSocketSpec};
use std::future::Future;
use tokio::net::TcpListener;

/// The nested host: an axum router plus a catalog and the mounted lifespans
///
/// ```rust,ignore
/// let mut app = ApiApp::new();
/// mount_router(&mut app, Arc::new(UserRouter::new(db)), MountOptions::default())?;
///
/// let listener = TcpListener::bind("127.0.0.1:8000").await?;
/// app.serve(listener, shutdown_signal()).await?;
/// ```
pub struct ApiApp<S = ()> {
    router: axum::Router<S>,
    catalog: Catalog,
    lifespans: LifespanManager,
}

impl<S> ApiApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: axum::Router::new(),
            catalog: Catalog::new(),
            lifespans: LifespanManager::new(),
        }
    }

    /// Apply the lifespan timeouts of a serve configuration
    pub fn with_config(mut self, config: &ServeConfig) -> Self {
        self.lifespans.set_startup_timeout(config.startup_timeout);
        self.lifespans.set_shutdown_timeout(config.shutdown_timeout);
        self
    }

    pub fn add_api_route(&mut self, spec: RouteSpec, endpoint: Endpoint<S>) {
        let mut router = ApiRouter::new();
        router.add_api_route(spec, endpoint);
        self.include_router(router, MountOptions::default());
    }

    pub fn add_api_websocket_route(&mut self, spec: WebSocketSpec, endpoint: WsEndpoint) {
        let mut router = ApiRouter::new();
        router.add_api_websocket_route(spec, endpoint);
        self.include_router(router, MountOptions::default());
    }

    pub fn register_lifespan(&mut self, lifespan: Lifespan) {
        self.lifespans.register(lifespan);
    }

    pub fn include_router(&mut self, router: ApiRouter<S>, options: MountOptions) {
        let included = router.resolve(&options);

        for mut operation in included.operations {
            if !operation.is_websocket() {
                if operation.operation_id.is_none() {
                    operation.operation_id = Some(generate_operation_id(&operation));
                }
                if operation.summary.is_none() {
                    operation.summary = operation.name.as_deref().map(title_case);
                }
            }
            self.catalog.push(operation);
        }
        for (path, route) in included.routes {
            self.router = std::mem::take(&mut self.router).route(&path, route);
        }
        self.lifespans.absorb(included.lifespans);
    }

    pub fn operations(&self) -> &Catalog {
        &self.catalog
    }

    /// The axum router holding every registered route
    pub fn router(&self) -> axum::Router<S> {
        self.router.clone()
    }

    /// Run the setup part of every mounted lifespan
    pub async fn start(&mut self) -> Result<()> {
        self.lifespans.start().await?;
        Ok(())
    }

    /// Run the teardown part of every started lifespan
    pub async fn shutdown(&mut self) -> Result<()> {
        self.lifespans.shutdown().await?;
        Ok(())
    }

    /// Serve until `signal` completes, wrapping the serving period in the
    /// mounted lifespans
    ///
    /// Teardown runs whether serving ends normally or with an error.
    pub async fn serve_with_state<F>(
        mut self,
        listener: TcpListener,
        state: S,
        signal: F,
    ) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.start().await?;

        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Listening on {}", addr);
        }
        let app: axum::Router = self.router.clone().with_state(state);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await;
        if let Err(e) = &served {
            tracing::error!("Server error: {}", e);
        }

        let stopped = self.shutdown().await;
        served?;
        stopped
    }
}

impl ApiApp<()> {
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.serve_with_state(listener, (), signal).await
    }
}

impl<S> Default for ApiApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// `{name}{path}` with non-word characters replaced, suffixed with the first
/// method
pub(super) fn generate_operation_id(operation: &Operation) -> String {
    let base = format!("{}{}", operation.name.as_deref().unwrap_or(""), operation.path);
    let base: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match operation.methods.first() {
        Some(method) => format!("{}_{}", base, method.as_ref().to_lowercase()),
        None => base,
    }
}

/// `fake_get_handler` becomes `Fake Get Handler`
pub(super) fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::HttpMethod;

    #[test]
    fn test_generate_operation_id() {
        let spec = RouteSpec::post("/post").name("fake_post_handler");
        let operation = Operation::http("/api/post", &spec);
        assert_eq!(
            generate_operation_id(&operation),
            "fake_post_handler_api_post_post"
        );
    }

    #[test]
    fn test_generate_operation_id_with_parameters() {
        let spec = RouteSpec::new("/users/{id}", [HttpMethod::Get, HttpMethod::Put]).name("user");
        let operation = Operation::http("/users/{id}", &spec);
        assert_eq!(generate_operation_id(&operation), "user_users__id__get");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("fake_get_handler"), "Fake Get Handler");
        assert_eq!(title_case("notify"), "Notify");
        assert_eq!(title_case("HTTP_status"), "Http Status");
    }
}
