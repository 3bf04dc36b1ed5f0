//! Operation catalog
//!
//! Each host records what it registered together with the documentation
//! metadata that survived the merge. The catalog is a plain list; nothing here
//! produces a schema document.

use crate::spec::{HttpMethod, Responses, RouteSpec, WebSocketSpec};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Http,
    WebSocket,
}

/// One registered endpoint, with its final path and merged metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub path: String,
    pub kind: OperationKind,
    pub methods: Vec<HttpMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub tags: Vec<String>,
    pub responses: Responses,
    pub deprecated: bool,
    pub include_in_schema: bool,
}

impl Operation {
    /// Record for an HTTP route, taking metadata from its `RouteSpec` as is
    pub fn http(path: impl Into<String>, spec: &RouteSpec) -> Self {
        Self {
            path: path.into(),
            kind: OperationKind::Http,
            methods: spec.methods.clone(),
            name: spec.name.clone(),
            operation_id: spec.operation_id.clone(),
            summary: spec.summary.clone(),
            description: spec.description.clone(),
            response_description: Some(spec.response_description.clone()),
            status_code: spec.status_code,
            tags: spec.tags.clone(),
            responses: spec.responses.clone(),
            deprecated: spec.deprecated.unwrap_or(false),
            include_in_schema: spec.include_in_schema.unwrap_or(true),
        }
    }

    /// Record for a websocket route; websockets are never documented
    pub fn websocket(path: impl Into<String>, spec: &WebSocketSpec) -> Self {
        Self {
            path: path.into(),
            kind: OperationKind::WebSocket,
            methods: vec![HttpMethod::Get],
            name: spec.name.clone(),
            operation_id: None,
            summary: None,
            description: None,
            response_description: None,
            status_code: None,
            tags: Vec::new(),
            responses: Responses::new(),
            deprecated: false,
            include_in_schema: false,
        }
    }

    pub fn is_websocket(&self) -> bool {
        self.kind == OperationKind::WebSocket
    }
}

/// Every operation a host registered, in registration order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    operations: Vec<Operation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// The HTTP operation registered for `path` and `method`
    pub fn find(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.operations.iter().find(|op| {
            op.kind == OperationKind::Http && op.path == path && op.methods.contains(&method)
        })
    }

    pub fn find_websocket(&self, path: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|op| op.is_websocket() && op.path == path)
    }

    /// Operations that would appear in generated documentation
    pub fn documented(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.include_in_schema)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ResponseDoc;

    #[test]
    fn test_find_by_path_and_method() {
        let mut catalog = Catalog::new();
        catalog.push(Operation::http("/api/items", &RouteSpec::get("/items")));
        catalog.push(Operation::http("/api/items", &RouteSpec::post("/items")));
        catalog.push(Operation::websocket("/api/ws", &WebSocketSpec::new("/ws")));

        assert_eq!(catalog.len(), 3);
        assert!(catalog.find("/api/items", HttpMethod::Post).is_some());
        assert!(catalog.find("/api/items", HttpMethod::Delete).is_none());
        assert!(catalog.find("/api/ws", HttpMethod::Get).is_none());
        assert!(catalog.find_websocket("/api/ws").is_some());
    }

    #[test]
    fn test_documented_skips_hidden_and_websockets() {
        let mut catalog = Catalog::new();
        catalog.push(Operation::http("/shown", &RouteSpec::get("/shown")));
        catalog.push(Operation::http(
            "/hidden",
            &RouteSpec::get("/hidden").include_in_schema(false),
        ));
        catalog.push(Operation::websocket("/ws", &WebSocketSpec::new("/ws")));

        let documented: Vec<_> = catalog.documented().map(|op| op.path.as_str()).collect();
        assert_eq!(documented, vec!["/shown"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut catalog = Catalog::new();
        catalog.push(Operation::http(
            "/post",
            &RouteSpec::post("/post")
                .status_code(202)
                .response(401, ResponseDoc::new("Unauthorized")),
        ));

        let value: serde_json::Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["statusCode"], 202);
        assert_eq!(value[0]["methods"][0], "POST");
        assert_eq!(value[0]["responses"]["401"]["description"], "Unauthorized");
        assert_eq!(value[0]["includeInSchema"], true);
    }
}
