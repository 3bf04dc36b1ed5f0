//! Route middleware
//!
//! Interceptors wrap a route: they see the request before the handler and the
//! response after it. Router-level interceptors are concatenated in front of
//! route-level ones, so the outer layer runs first.

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;

mod layer;
mod logging;

pub use layer::{InterceptorLayer, InterceptorMiddleware};
pub use logging::LoggingInterceptor;

/// standard return type for Interceptors
pub type InterceptorResult = Result<Response, InterceptorError>;

/// A type-erased error for interceptors
pub type InterceptorError = Box<dyn std::error::Error + Send + Sync>;

type NextFuture = Pin<Box<dyn Future<Output = InterceptorResult> + Send>>;
type NextFn = Box<dyn FnOnce(Request<Body>) -> NextFuture + Send>;

/// Represents the next handler in the chain
pub struct Next {
    run: NextFn,
}

impl Next {
    /// Create a new Next handler
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> NextFuture + Send + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Execute the next handler
    pub async fn run(self, request: Request<Body>) -> InterceptorResult {
        (self.run)(request).await
    }
}

/// The Interceptor trait
///
/// Interceptors can inspect/modify the request before it reaches the handler,
/// and inspect/modify the response after the handler returns. An `Err` is
/// turned into a `500 Internal Server Error` response.
///
/// # Example
/// ```
/// use httprouter::interceptor::{Interceptor, InterceptorResult, Next};
/// use httprouter::async_trait;
/// use httprouter::axum::{body::Body, http::Request};
///
/// struct PoweredBy;
///
/// #[async_trait]
/// impl Interceptor for PoweredBy {
///     async fn intercept(&self, req: Request<Body>, next: Next) -> InterceptorResult {
///         let mut res = next.run(req).await?;
///         res.headers_mut().insert("x-powered-by", "httprouter".parse().unwrap());
///         Ok(res)
///     }
/// }
/// ```
#[async_trait]
pub trait Interceptor: Send + Sync + 'static {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult;
}
