use super::{ResponseDoc, Responses};
use crate::guard::Guard;
use crate::interceptor::Interceptor;
use std::fmt;
use std::sync::Arc;

/// Router-level defaults inherited by every endpoint of a router
///
/// Produced by `#[router(...)]`; the bare `#[router]` form yields
/// `RouterSpec::default()`.
#[derive(Clone, Default)]
pub struct RouterSpec {
    pub prefix: String,
    pub tags: Vec<String>,
    pub responses: Responses,
    pub deprecated: Option<bool>,
    pub include_in_schema: Option<bool>,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
    pub guards: Vec<Arc<dyn Guard>>,
}

impl RouterSpec {
    pub fn new() -> Self {
        Self::default()
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

    pub fn include_in_schema(mut self, include: bool) -> Self {
        self.include_in_schema = Some(include);
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

impl fmt::Debug for RouterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterSpec")
            .field("prefix", &self.prefix)
            .field("tags", &self.tags)
            .field("responses", &self.responses)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("interceptors", &self.interceptors.len())
            .field("guards", &self.guards.len())
            .finish()
    }
}

/// Associates a [`RouterSpec`] with a router type
///
/// Implemented by the `#[router]` attribute. A type without this association
/// cannot be mounted through the macro path.
pub trait RouterDecl {
    fn router_spec() -> RouterSpec;
}
