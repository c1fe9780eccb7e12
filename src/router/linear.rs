//! Linear-scan routing engine.
//!
//! Every registered pattern is tested in registration order. Simple and
//! predictable, and a good fit for small route sets.
//!
//! **Precedence:** first registered, first matched. Registering
//! `/users/{id}` before `/users/new` means `GET /users/new` resolves to
//! `/users/{id}` with `id = "new"`.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::compiled::{resolve, CompiledRoute, NameIndex};
use super::{RouteRequest, Router};
use crate::error::{RouteError, UriError};
use crate::result::RouteResult;
use crate::route::pattern::split_request_path;
use crate::route::Route;

/// Registration-ordered route table.
#[derive(Debug, Clone, Default)]
pub struct LinearRouter {
    routes: Vec<CompiledRoute>,
    names: NameIndex,
}

impl LinearRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Router for LinearRouter {
    fn add_route(&mut self, route: Route) -> Result<Arc<Route>, RouteError> {
        let compiled = CompiledRoute::compile(route)?;
        self.names.claim(&compiled.route, self.routes.len())?;
        let route = Arc::clone(&compiled.route);
        self.routes.push(compiled);
        info!(
            route = %route.identifier(),
            methods = %route.methods(),
            path = %route.path(),
            routes_count = self.routes.len(),
            algorithm = "linear",
            "Route registered"
        );
        Ok(route)
    }

    fn match_request<Q>(&self, request: &Q) -> RouteResult
    where
        Q: RouteRequest + ?Sized,
    {
        let (method, path) = (request.method(), request.path());
        debug!(method = %method, path = %path, algorithm = "linear", "Route match attempt");
        let started = Instant::now();

        let decoded = split_request_path(path);
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();

        let candidates = self.routes.iter().filter_map(|compiled| {
            compiled
                .pattern
                .match_segments(&segments)
                .map(|params| (compiled, params))
        });
        resolve("linear", method, path, started, candidates)
    }

    fn generate_uri(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<String, UriError> {
        let idx = self.names.get(name).ok_or_else(|| UriError::UnknownRoute {
            name: name.to_string(),
        })?;
        self.routes[idx].generate(substitutions)
    }

    fn routes(&self) -> Vec<Arc<Route>> {
        self.routes.iter().map(|c| Arc::clone(&c.route)).collect()
    }

    fn algorithm(&self) -> &'static str {
        "linear"
    }
}
