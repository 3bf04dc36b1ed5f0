//! Router discovery
//!
//! A router is a plain struct whose handlers are listed, in order, by its
//! [`Router::declare`] implementation. `#[routes]` writes that implementation
//! from the annotated methods of an impl block; it can also be written by hand.
//!
//! ```
//! use httprouter::{inspect_router, Declarations, HttpMethod, RouteSpec, Router, RouterSpec};
//! use std::sync::Arc;
//!
//! struct Health;
//!
//! impl Router for Health {
//!     fn router_spec() -> Option<RouterSpec> {
//!         Some(RouterSpec::new().prefix("/health"))
//!     }
//!
//!     fn declare(self: Arc<Self>, routes: &mut Declarations) {
//!         routes.route(RouteSpec::get("/"), || async { "up" });
//!     }
//! }
//!
//! let members = inspect_router(Arc::new(Health)).unwrap();
//! assert_eq!(members.routes.len(), 1);
//! assert_eq!(members.routes[0].1.methods, vec![HttpMethod::Get]);
//! ```
//!
//! A router runs at most one lifespan, and `#[routes]` rejects a second one:
//!
//! ```compile_fail
//! use httprouter::prelude::*;
//!
//! #[router(prefix = "/jobs")]
//! struct Jobs;
//!
//! #[routes]
//! impl Jobs {
//!     #[get("/")]
//!     async fn list(&self) -> &'static str {
//!         "[]"
//!     }
//!
//!     #[lifespan]
//!     async fn warm_up(&self, running: Running) {
//!         running.await;
//!     }
//!
//!     #[lifespan]
//!     async fn drain(&self, running: Running) {
//!         running.await;
//!     }
//! }
//! ```

mod endpoint;
mod options;

#[doc(hidden)]
pub mod probe;

pub use endpoint::{Endpoint, WsEndpoint};
pub use options::MountOptions;

pub(crate) use endpoint::{wrap_route, RouteLayers};

use crate::error::{Result, RouterError};
use crate::lifecycle::{Lifespan, LifespanOutcome, Running};
use crate::spec::{RouteSpec, RouterSpec, WebSocketSpec};
use axum::extract::ws::WebSocket;
use axum::handler::Handler;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A struct that groups endpoint handlers under shared defaults
///
/// `S` is the axum state type the handlers extract from; routers that do not
/// use state implement `Router` for every `S`.
pub trait Router<S = ()>: Send + Sync + Sized + 'static {
    /// The router-level defaults, `None` when the type was never declared as a
    /// router
    fn router_spec() -> Option<RouterSpec> {
        None
    }

    /// List every endpoint of this router, in declaration order
    fn declare(self: Arc<Self>, routes: &mut Declarations<S>);
}

/// The ordered endpoint list a router fills in [`Router::declare`]
pub struct Declarations<S = ()> {
    routes: Vec<(Endpoint<S>, RouteSpec)>,
    websocket_routes: Vec<(WsEndpoint, WebSocketSpec)>,
    lifespans: Vec<Lifespan>,
}

impl<S> Declarations<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            websocket_routes: Vec::new(),
            lifespans: Vec::new(),
        }
    }

    pub fn route<H, T>(&mut self, spec: RouteSpec, handler: H) -> &mut Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.routes.push((Endpoint::new(handler), spec));
        self
    }

    pub fn websocket<F, Fut>(&mut self, spec: WebSocketSpec, handler: F) -> &mut Self
    where
        F: Fn(WebSocket) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.websocket_routes.push((WsEndpoint::new(handler), spec));
        self
    }

    /// Declare the router's lifespan; see [`Running`]
    pub fn lifespan<F, Fut>(&mut self, hook: F) -> &mut Self
    where
        F: FnOnce(Running) -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: LifespanOutcome,
    {
        self.lifespans.push(Lifespan::new("lifespan", hook));
        self
    }
}

impl<S> Default for Declarations<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Everything discovered on a router instance
///
/// Built fresh by every [`inspect_router`] call.
pub struct RouterMembers<S = ()> {
    pub spec: RouterSpec,
    pub routes: Vec<(Endpoint<S>, RouteSpec)>,
    pub websocket_routes: Vec<(WsEndpoint, WebSocketSpec)>,
    pub lifespan: Option<Lifespan>,
}

impl<S> fmt::Debug for RouterMembers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterMembers")
            .field("spec", &self.spec)
            .field(
                "routes",
                &self.routes.iter().map(|(_, spec)| spec).collect::<Vec<_>>(),
            )
            .field(
                "websocket_routes",
                &self
                    .websocket_routes
                    .iter()
                    .map(|(_, spec)| spec)
                    .collect::<Vec<_>>(),
            )
            .field("lifespan", &self.lifespan)
            .finish()
    }
}

/// Collect the router spec and every declared endpoint of a router
///
/// Fails with [`RouterError::NotARouter`] when the type carries no router
/// spec, and with [`RouterError::DuplicateLifespan`] when it declares more than
/// one lifespan.
pub fn inspect_router<R, S>(router: Arc<R>) -> Result<RouterMembers<S>>
where
    R: Router<S>,
    S: Clone + Send + Sync + 'static,
{
    let type_name = std::any::type_name::<R>();
    let spec = <R as Router<S>>::router_spec().ok_or(RouterError::NotARouter { type_name })?;

    let mut declarations = Declarations::new();
    router.declare(&mut declarations);
    let Declarations {
        routes,
        websocket_routes,
        mut lifespans,
    } = declarations;

    if lifespans.len() > 1 {
        return Err(RouterError::DuplicateLifespan {
            type_name,
            count: lifespans.len(),
        });
    }
    let lifespan = lifespans.pop().map(|lifespan| lifespan.rename(type_name));

    tracing::debug!(
        "Inspected {}: {} routes, {} websocket routes, lifespan: {}",
        type_name,
        routes.len(),
        websocket_routes.len(),
        lifespan.is_some()
    );

    Ok(RouterMembers {
        spec,
        routes,
        websocket_routes,
        lifespan,
    })
}
