use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::result::RouteResult;
use crate::router::RouteRequest;

/// Maximum inline headers before heap allocation.
/// Most requests carry <=16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage.
///
/// Header names use `Arc<str>`: they repeat across requests (Content-Type,
/// Authorization, ...) and cloning one is an atomic increment.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Reserved attribute holding the [`RouteResult`] of the current request.
pub const ROUTE_RESULT_ATTRIBUTE: &str = "brrt.route_result";

/// Attribute namespace owned by the dispatcher. Path params never write
/// into it.
pub const RESERVED_ATTRIBUTE_PREFIX: &str = "brrt.";

/// A value in the per-request attribute store.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Path params and other plain strings.
    Text(String),
    Json(Value),
    /// The match outcome, under [`ROUTE_RESULT_ATTRIBUTE`].
    Route(Box<RouteResult>),
}

impl AttributeValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Request data passed to a handler.
///
/// Built by the boundary (a server, a test, the CLI) and handed to the
/// [`Dispatcher`](super::Dispatcher), which adds path params and the match
/// result to `attributes` before invoking the handler.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path, without the query string
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    /// HTTP headers (stack-allocated for <=16 headers)
    pub headers: HeaderVec,
    /// Per-request attribute store
    pub attributes: HashMap<String, AttributeValue>,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Build a request from a method and a request target (`/path?query`).
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: HeaderVec::new(),
            attributes: HashMap::new(),
            body: None,
        }
    }

    /// Copy method, target and headers out of an `http::Request`.
    ///
    /// Header values that are not visible ASCII are skipped.
    #[must_use]
    pub fn from_http<B>(req: &http::Request<B>, body: Option<Value>) -> Self {
        let mut request = Self::new(req.method().clone(), req.uri().path());
        request.query = req.uri().query().map(str::to_string);
        for (name, value) in req.headers() {
            if let Ok(value) = value.to_str() {
                request
                    .headers
                    .push((Arc::from(name.as_str()), value.to_string()));
            }
        }
        request.body = body;
        request
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    /// A path parameter merged in by the dispatcher.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_str)
    }

    /// The match result stored by the dispatcher, if any.
    #[must_use]
    pub fn route_result(&self) -> Option<&RouteResult> {
        match self.attributes.get(ROUTE_RESULT_ATTRIBUTE) {
            Some(AttributeValue::Route(result)) => Some(&**result),
            _ => None,
        }
    }

    /// Convert headers to HashMap for compatibility
    /// Note: This allocates - use get_header() in hot paths
    #[must_use]
    pub fn headers_map(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl RouteRequest for HandlerRequest {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn host(&self) -> Option<&str> {
        self.get_header("host")
    }
}
