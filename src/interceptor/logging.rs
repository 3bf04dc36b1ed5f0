use crate::interceptor::{Interceptor, InterceptorResult, Next};
use async_trait::async_trait;
use axum::{body::Body, http::Request};
use std::time::Instant;

/// Logs every request a router handles, with its status and latency
///
/// The optional label names the router in the log line; by default the
/// matched path is enough.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor {
    label: Option<&'static str>,
}

impl LoggingInterceptor {
    pub fn labeled(label: &'static str) -> Self {
        Self { label: Some(label) }
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        let router = self.label.unwrap_or("-");
        let started = Instant::now();

        let result = next.run(request).await;
        let latency = started.elapsed();
        match &result {
            Ok(response) => tracing::info!(
                router,
                %method,
                path,
                status = response.status().as_u16(),
                ?latency,
                "handled request"
            ),
            Err(e) => tracing::error!(
                router,
                %method,
                path,
                error = %e,
                ?latency,
                "request failed"
            ),
        }
        result
    }
}
