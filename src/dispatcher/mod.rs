//! # Dispatcher Module
//!
//! The dispatcher is the boundary consumer of the routing contract. It calls
//! the router once per request and turns the [`RouteResult`](crate::result::RouteResult)
//! into a [`HandlerResponse`].
//!
//! ## Request Flow
//!
//! 1. Router matches the incoming request and returns a result
//! 2. On a match, path params are merged into the request attributes and the
//!    result is stored under [`ROUTE_RESULT_ATTRIBUTE`]
//! 3. The handler is resolved: direct endpoints are called as-is, named
//!    references go through a [`HandlerRegistry`]
//! 4. The handler runs; its response is returned unchanged
//!
//! ## Error Handling
//!
//! - No route for the path: the fallback endpoint (404 by default)
//! - Path matched, method did not: 405 with an `Allow` header
//! - Named handler missing from the registry: 500
//! - Handler panics are caught and returned as 500 responses
//!
//! ## Attribute collisions
//!
//! Keys starting with [`RESERVED_ATTRIBUTE_PREFIX`] belong to the dispatcher.
//! A path param with such a name is skipped (and logged); any other param
//! overwrites an attribute of the same name set by the caller.
//!
//! ```rust
//! use brrtroute::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, Registry};
//! use brrtroute::route::Handler;
//! use brrtroute::router::{RadixRouter, RouteCollector};
//! use http::Method;
//!
//! let mut routes = RouteCollector::new(RadixRouter::new());
//! routes.get("/pets/{id}", Handler::named("get_pet"))?;
//!
//! let registry = Registry::new().with("get_pet", |req: &HandlerRequest| {
//!     HandlerResponse::json(200, serde_json::json!({ "id": req.path_param("id") }))
//! });
//! let dispatcher = Dispatcher::new(routes.into_router(), registry);
//!
//! let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/5"));
//! assert_eq!(resp.status, 200);
//!
//! let resp = dispatcher.dispatch(HandlerRequest::new(Method::DELETE, "/pets/5"));
//! assert_eq!(resp.status, 405);
//! assert_eq!(resp.get_header("allow"), Some("GET"));
//! # Ok::<(), brrtroute::RouteError>(())
//! ```

mod core;
mod registry;
mod request;
mod response;

pub use self::core::Dispatcher;
pub use registry::{HandlerRegistry, Registry};
pub use request::{
    AttributeValue, HandlerRequest, HeaderVec, MAX_INLINE_HEADERS, RESERVED_ATTRIBUTE_PREFIX,
    ROUTE_RESULT_ATTRIBUTE,
};
pub use response::HandlerResponse;
