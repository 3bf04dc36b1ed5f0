use axum::http::Method;
use axum::routing::MethodFilter;
use serde::Serialize;

/// HTTP methods a route can be declared for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }

    /// Combined filter for a method set; an empty set means GET
    pub fn filter_all(methods: &[HttpMethod]) -> MethodFilter {
        methods
            .iter()
            .map(|method| method.filter())
            .reduce(MethodFilter::or)
            .unwrap_or(MethodFilter::GET)
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_and_parse() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::from_str("delete").unwrap(), HttpMethod::Delete);
        assert!(HttpMethod::from_str("TRACE").is_err());
    }

    #[test]
    fn test_into_http_method() {
        assert_eq!(Method::from(HttpMethod::Put), Method::PUT);
    }
}
