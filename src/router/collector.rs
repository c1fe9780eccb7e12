use std::sync::Arc;
use tracing::debug;

use super::{Router, SharedRouter};
use crate::error::RouteError;
use crate::method::Methods;
use crate::route::{Handler, Route};

/// Startup-time route registration with collision checks.
///
/// Engines accept any route; the collector additionally rejects a second
/// route whose pattern accepts the same paths as an earlier one (see
/// [`PathPattern::same_shape`](crate::route::PathPattern::same_shape)) and
/// whose methods overlap it, since the later route could never match.
///
/// ```rust
/// use brrtroute::route::Handler;
/// use brrtroute::router::{RadixRouter, RouteCollector, Router};
///
/// let mut routes = RouteCollector::new(RadixRouter::new());
/// routes.get("/pets", Handler::named("list_pets"))?;
/// routes.post("/pets", Handler::named("add_pet"))?;
/// assert!(routes.get("/pets", Handler::named("again")).is_err());
///
/// let router = routes.into_router();
/// assert_eq!(router.routes().len(), 2);
/// # Ok::<(), brrtroute::RouteError>(())
/// ```
#[derive(Debug, Default)]
pub struct RouteCollector<R: Router> {
    router: R,
    routes: Vec<Arc<Route>>,
}

impl<R: Router> RouteCollector<R> {
    pub fn new(router: R) -> Self {
        let routes = router.routes();
        Self { router, routes }
    }

    /// Register a fully built route.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateRoute`] on a path and method collision, plus
    /// anything [`Router::add_route`] reports.
    pub fn add(&mut self, route: Route) -> Result<Arc<Route>, RouteError> {
        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| {
                r.pattern().same_shape(route.pattern()) && r.methods().overlaps(route.methods())
            })
        {
            debug!(
                path = %route.path(),
                existing = %existing.identifier(),
                "Route collision rejected"
            );
            return Err(RouteError::DuplicateRoute {
                path: route.path().to_string(),
                methods: route.methods().to_string(),
            });
        }
        let route = self.router.add_route(route)?;
        self.routes.push(Arc::clone(&route));
        Ok(route)
    }

    /// Build and register a route in one step.
    pub fn route(
        &mut self,
        path: &str,
        handler: Handler,
        methods: Methods,
    ) -> Result<Arc<Route>, RouteError> {
        self.add(Route::new(path, handler, methods)?)
    }

    pub fn get(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::only(["GET"])?)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::only(["POST"])?)
    }

    pub fn put(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::only(["PUT"])?)
    }

    pub fn patch(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::only(["PATCH"])?)
    }

    pub fn delete(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::only(["DELETE"])?)
    }

    pub fn any(&mut self, path: &str, handler: Handler) -> Result<Arc<Route>, RouteError> {
        self.route(path, handler, Methods::Any)
    }

    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Finish registration.
    pub fn into_router(self) -> R {
        self.router
    }

    /// Finish registration and wrap the router for runtime replacement.
    pub fn into_shared(self) -> SharedRouter<R> {
        SharedRouter::new(self.router)
    }
}
