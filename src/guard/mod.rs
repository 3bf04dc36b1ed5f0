//! Route guards
//!
//! Guards run before the handler and may reject the request. They play the
//! part of route dependencies: a router's guards apply to every one of its
//! routes, and guards passed at mount time apply to every route of the mounted
//! router.

use async_trait::async_trait;
use axum::{
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

mod layer;

pub use layer::{GuardLayer, GuardMiddleware};

/// Standard Result type for Guard
/// Ok(()) means allowed
/// Err(GuardError) means denied
pub type GuardResult = Result<(), GuardError>;

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::Forbidden(_) => StatusCode::FORBIDDEN,
            GuardError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// The Guard trait
/// Implement this to protect routes
///
/// ```
/// use httprouter::guard::{Guard, GuardError, GuardResult};
/// use httprouter::async_trait;
/// use httprouter::axum::http::request::Parts;
///
/// struct ApiKey(&'static str);
///
/// #[async_trait]
/// impl Guard for ApiKey {
///     async fn can_activate(&self, parts: &Parts) -> GuardResult {
///         match parts.headers.get("x-api-key") {
///             Some(value) if value == self.0 => Ok(()),
///             _ => Err(GuardError::Unauthorized("missing api key".into())),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Guard: Send + Sync + 'static {
    async fn can_activate(&self, parts: &Parts) -> GuardResult;
}
