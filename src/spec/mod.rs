//! Endpoint and router specifications
//!
//! These are the records the declaration attributes produce. A [`RouteSpec`]
//! describes one HTTP endpoint, a [`WebSocketSpec`] one websocket endpoint and a
//! [`RouterSpec`] the defaults shared by every endpoint of a router.
//!
//! Hosts never mutate a spec they were handed; when a mount needs to adjust one
//! it works on a clone.

mod method;
mod route;
mod router;

pub use method::HttpMethod;
pub use route::{RouteSpec, WebSocketSpec};
pub use router::{RouterDecl, RouterSpec};

use serde::Serialize;
use std::collections::BTreeMap;

/// Documentation for one response status of an endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDoc {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl ResponseDoc {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            content: None,
        }
    }

    /// Attach a content description, e.g. `{"application/json": {}}`
    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(content);
        self
    }
}

/// Documented responses keyed by status code
pub type Responses = BTreeMap<u16, ResponseDoc>;
