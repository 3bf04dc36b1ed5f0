//! # httprouter
//!
//! Class-based routing for axum.
//!
//! Endpoints are declared as annotated methods on a plain struct, then the
//! struct is mounted onto one of three hosts. Mounting merges the router's
//! defaults (prefix, tags, responses, guards and interceptors) with per-route
//! values and the options given at the mount call, then registers every route
//! with axum. Request handling stays with axum from then on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use httprouter::prelude::*;
//! use httprouter::nested::{self, ApiApp};
//!
//! #[router(prefix = "/users", tags = ["users"])]
//! pub struct UserRouter {
//!     greeting: String,
//! }
//!
//! #[routes]
//! impl UserRouter {
//!     /// Look up one user
//!     #[get("/{id}")]
//!     async fn get_user(&self, #[param] id: u64) -> Json<String> {
//!         Json(format!("{} #{}", self.greeting, id))
//!     }
//!
//!     #[post("/", status_code = 201)]
//!     async fn create_user(&self, #[body] name: String) -> Json<String> {
//!         Json(name)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> httprouter::Result<()> {
//!     let mut app = ApiApp::new();
//!     nested::mount_router(
//!         &mut app,
//!         Arc::new(UserRouter::new("hello".into())),
//!         MountOptions::new().prefix("/api"),
//!     )?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     app.serve(listener, shutdown_signal()).await
//! }
//! ```
//!
//! ## Hosts
//!
//! - [`nested`]: routers are included into an app or into each other; the
//!   only host that runs lifespans.
//! - [`flat`]: a route table with full paths computed at mount time.
//! - [`layered`]: router layers are applied to each route as it is registered.

pub mod catalog;
pub mod config;
pub mod error;
pub mod flat;
pub mod guard;
pub mod interceptor;
pub mod layered;
pub mod lifecycle;
pub mod merge;
pub mod nested;
pub mod router;
pub mod spec;

#[doc(hidden)]
pub use router::probe as __private;

// Re-export core types
pub use error::{Result, RouterError};
pub use lifecycle::{shutdown_signal, Lifespan, Running};
pub use router::{
    inspect_router, Declarations, Endpoint, MountOptions, Router, RouterMembers, WsEndpoint,
};
pub use spec::{
    HttpMethod, ResponseDoc, Responses, RouteSpec, RouterDecl, RouterSpec, WebSocketSpec,
};

// Re-export macros
pub use httprouter_macro::{
    body, delete, get, lifespan, param, patch, post, put, query, route, router, routes, websocket,
};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use httprouter::prelude::*;
/// ```
///
/// The [`Router`](crate::Router) trait is left out so it does not shadow
/// `axum::Router`; the macros name it by full path.
pub mod prelude {
    pub use crate::config::{ConfigService, ServeConfig};
    pub use crate::error::{Result, RouterError};
    pub use crate::guard::{Guard, GuardError, GuardResult};
    pub use crate::interceptor::{Interceptor, InterceptorResult, Next};
    pub use crate::lifecycle::{shutdown_signal, Running};
    pub use crate::router::MountOptions;
    pub use crate::spec::{HttpMethod, ResponseDoc, RouteSpec, RouterSpec, WebSocketSpec};
    pub use crate::{
        body, delete, get, lifespan, param, patch, post, put, query, route, router, routes,
        websocket,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        extract::{
            ws::{Message, WebSocket},
            Path, Query, State,
        },
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    pub use std::sync::Arc;
}
