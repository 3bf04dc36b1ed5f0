use crate::guard::Guard;
use crate::interceptor::Interceptor;
use crate::spec::{ResponseDoc, Responses};
use std::fmt;
use std::sync::Arc;

/// Overrides given at mount time
///
/// They form the outermost merge layer: tags and responses are merged under
/// the router's own, guards and interceptors run before the router's.
#[derive(Clone, Default)]
pub struct MountOptions {
    pub prefix: String,
    pub tags: Vec<String>,
    pub responses: Responses,
    pub deprecated: Option<bool>,

    /// `None` keeps the router's setting
    pub include_in_schema: Option<bool>,
    pub guards: Vec<Arc<dyn Guard>>,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
}

impl MountOptions {
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

    pub fn guard(mut self, guard: impl Guard) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn interceptor(mut self, interceptor: impl Interceptor) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }
}

impl fmt::Debug for MountOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountOptions")
            .field("prefix", &self.prefix)
            .field("tags", &self.tags)
            .field("responses", &self.responses)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("guards", &self.guards.len())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
