use super::{HttpMethod, ResponseDoc, Responses};
use crate::guard::Guard;
use crate::interceptor::Interceptor;
use axum::http::{HeaderName, HeaderValue};
use std::fmt;
use std::sync::Arc;

/// Specification of one HTTP endpoint
///
/// Built by the `#[get]`, `#[post]`, `#[put]`, `#[patch]`, `#[delete]` and
/// `#[route]` attributes, or by hand:
///
/// ```
/// use httprouter::{HttpMethod, RouteSpec};
///
/// let spec = RouteSpec::post("/items")
///     .status_code(201)
///     .tags(["items"])
///     .summary("Create an item");
///
/// assert_eq!(spec.methods, vec![HttpMethod::Post]);
/// assert_eq!(spec.status_code, Some(201));
/// ```
#[derive(Clone)]
pub struct RouteSpec {
    pub path: String,
    pub methods: Vec<HttpMethod>,

    /// Status applied to responses that still carry the default `200 OK`
    pub status_code: Option<u16>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub response_description: String,
    pub responses: Responses,
    pub deprecated: Option<bool>,
    pub operation_id: Option<String>,

    /// `None` inherits the router's setting
    pub include_in_schema: Option<bool>,
    pub name: Option<String>,
    pub response_headers: Vec<(HeaderName, HeaderValue)>,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
    pub guards: Vec<Arc<dyn Guard>>,
}

impl RouteSpec {
    pub fn new(path: impl Into<String>, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        Self {
            path: path.into(),
            methods: methods.into_iter().collect(),
            status_code: None,
            tags: Vec::new(),
            summary: None,
            description: None,
            response_description: "Successful Response".to_string(),
            responses: Responses::new(),
            deprecated: None,
            operation_id: None,
            include_in_schema: None,
            name: None,
            response_headers: Vec::new(),
            interceptors: Vec::new(),
            guards: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, [HttpMethod::Get])
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, [HttpMethod::Post])
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(path, [HttpMethod::Put])
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(path, [HttpMethod::Patch])
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, [HttpMethod::Delete])
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
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

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn response_description(mut self, description: impl Into<String>) -> Self {
        self.response_description = description.into();
        self
    }

    pub fn responses(mut self, responses: Responses) -> Self {
        self.responses = responses;
        self
    }

    pub fn response(mut self, status: u16, doc: ResponseDoc) -> Self {
        self.responses.insert(status, doc);
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn include_in_schema(mut self, include: bool) -> Self {
        self.include_in_schema = Some(include);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn response_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.response_headers.push((name, value));
        self
    }

    pub fn interceptor(mut self, interceptor: impl Interceptor) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn guard(mut self, guard: impl Guard) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("path", &self.path)
            .field("methods", &self.methods)
            .field("status_code", &self.status_code)
            .field("tags", &self.tags)
            .field("name", &self.name)
            .field("include_in_schema", &self.include_in_schema)
            .field("interceptors", &self.interceptors.len())
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

/// Specification of one websocket endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketSpec {
    pub path: String,
    pub name: Option<String>,
}

impl WebSocketSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_constructors_default_their_method() {
        assert_eq!(RouteSpec::get("/").methods, vec![HttpMethod::Get]);
        assert_eq!(RouteSpec::post("/").methods, vec![HttpMethod::Post]);
        assert_eq!(RouteSpec::put("/").methods, vec![HttpMethod::Put]);
        assert_eq!(RouteSpec::patch("/").methods, vec![HttpMethod::Patch]);
        assert_eq!(RouteSpec::delete("/").methods, vec![HttpMethod::Delete]);
    }

    #[test]
    fn test_defaults() {
        let spec = RouteSpec::get("/get");
        assert_eq!(spec.response_description, "Successful Response");
        assert_eq!(spec.status_code, None);
        assert_eq!(spec.include_in_schema, None);
        assert!(spec.tags.is_empty());
        assert!(spec.responses.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let spec = RouteSpec::delete("/delete")
            .status_code(204)
            .tags(["a", "b"])
            .response(401, ResponseDoc::new("Unauthorized"))
            .include_in_schema(false)
            .name("remove");

        assert_eq!(spec.status_code, Some(204));
        assert_eq!(spec.tags, vec!["a", "b"]);
        assert_eq!(spec.responses[&401].description, "Unauthorized");
        assert_eq!(spec.include_in_schema, Some(false));
        assert_eq!(spec.name.as_deref(), Some("remove"));
    }
}
