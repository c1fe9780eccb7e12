//! # Router Module
//!
//! The router module defines the routing contract and ships two engines that
//! implement it.
//!
//! ## Overview
//!
//! A router is responsible for:
//! - Holding the routes registered at startup
//! - Matching incoming requests (method + path) to a registered route
//! - Extracting path parameters from the matched route
//! - Reporting *why* a request missed: no path matched at all, or a path
//!   matched but not for this method (with the union of allowed methods)
//! - Generating URIs from route names and substitutions
//!
//! ## Engines
//!
//! | Engine           | Lookup | Precedence                                             |
//! |------------------|--------|--------------------------------------------------------|
//! | [`LinearRouter`] | O(n)   | registration order                                     |
//! | [`RadixRouter`]  | O(k)   | static before placeholder per depth, then registration |
//!
//! Both agree on everything else: method handling, failure reporting, option
//! keys ([`CONSTRAINTS_OPTION`], [`DEFAULTS_OPTION`]) and URI generation.
//!
//! ## Example
//!
//! ```rust
//! use brrtroute::method::Methods;
//! use brrtroute::route::{Handler, Route};
//! use brrtroute::router::{LinearRouter, Router};
//!
//! let mut router = LinearRouter::new();
//! router.add_route(
//!     Route::new("/pets/{id}", Handler::named("get_pet"), Methods::only(["GET"])?)?
//!         .with_name("pet"),
//! )?;
//!
//! let result = router.match_route("GET", "/pets/7");
//! assert_eq!(result.matched_route_name(), Some("pet"));
//! assert_eq!(result.matched_params().get("id"), Some("7"));
//!
//! let miss = router.match_route("DELETE", "/pets/7");
//! assert!(miss.is_method_failure());
//!
//! assert_eq!(router.generate_uri("pet", &[("id", "8")]).unwrap(), "/pets/8");
//! # Ok::<(), brrtroute::RouteError>(())
//! ```
//!
//! ## Lifecycle
//!
//! Routes are registered during startup (`&mut self`). After that a router is
//! only read (`&self`), so it can be shared across threads without locking.
//! [`SharedRouter`] covers the case where the whole table is rebuilt and
//! swapped at runtime.

mod collector;
mod compiled;
mod linear;
mod radix;
mod shared;

pub use collector::RouteCollector;
pub use compiled::{CONSTRAINTS_OPTION, DEFAULTS_OPTION};
pub use linear::LinearRouter;
pub use radix::RadixRouter;
pub use shared::SharedRouter;

use std::sync::Arc;

use crate::error::{RouteError, UriError};
use crate::result::RouteResult;
use crate::route::Route;

/// The view of a request a router needs.
///
/// Host and scheme are exposed for engines that route on them; the bundled
/// engines only look at method and path.
pub trait RouteRequest {
    fn method(&self) -> &str;

    /// Request path without the query string.
    fn path(&self) -> &str;

    fn host(&self) -> Option<&str> {
        None
    }

    fn scheme(&self) -> Option<&str> {
        None
    }
}

impl<M, P> RouteRequest for (M, P)
where
    M: AsRef<str>,
    P: AsRef<str>,
{
    fn method(&self) -> &str {
        self.0.as_ref()
    }

    fn path(&self) -> &str {
        self.1.as_ref()
    }
}

impl<B> RouteRequest for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn host(&self) -> Option<&str> {
        self.uri().host().or_else(|| {
            self.headers()
                .get(http::header::HOST)
                .and_then(|v| v.to_str().ok())
        })
    }

    fn scheme(&self) -> Option<&str> {
        self.uri().scheme_str()
    }
}

/// The routing contract.
///
/// `add_route` is the only mutating operation and belongs to startup;
/// everything else takes `&self`. `match_request` never fails: misses are
/// [`RouteResult`] values.
pub trait Router: Send + Sync {
    /// Register a route, returning the shared handle stored by the router.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidOption`] when an engine-recognized option is malformed
    /// - [`RouteError::DuplicateName`] when the route's explicit name is taken
    fn add_route(&mut self, route: Route) -> Result<Arc<Route>, RouteError>;

    /// Match a request against the registered routes.
    fn match_request<Q>(&self, request: &Q) -> RouteResult
    where
        Q: RouteRequest + ?Sized;

    /// Convenience wrapper over [`Router::match_request`].
    fn match_route(&self, method: &str, path: &str) -> RouteResult {
        self.match_request(&(method, path))
    }

    /// Build a URI for the route registered under `name`.
    ///
    /// Later duplicates in `substitutions` win; declared defaults fill gaps.
    /// Values are percent-encoded.
    fn generate_uri(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<String, UriError>;

    /// Registered routes in registration order.
    fn routes(&self) -> Vec<Arc<Route>>;

    /// Short engine name, used in logs.
    fn algorithm(&self) -> &'static str;
}
