use http::Method;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::registry::{HandlerRegistry, Registry};
use super::request::{
    AttributeValue, HandlerRequest, RESERVED_ATTRIBUTE_PREFIX, ROUTE_RESULT_ATTRIBUTE,
};
use super::response::HandlerResponse;
use crate::config::RuntimeConfig;
use crate::method::allow_header;
use crate::result::RouteResult;
use crate::route::{Endpoint, Handler};
use crate::router::{Router, SharedRouter};

fn not_found(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::error(404, "Not Found")
}

/// Turns match results into responses.
///
/// The dispatcher owns a [`SharedRouter`], so the routing table can be
/// replaced at runtime through [`Dispatcher::router`] while requests are
/// being served.
pub struct Dispatcher<R, G = Registry> {
    router: SharedRouter<R>,
    registry: G,
    fallback: Arc<dyn Endpoint>,
    implicit_head: bool,
    implicit_options: bool,
}

impl<R: Router, G: HandlerRegistry> Dispatcher<R, G> {
    /// Create a dispatcher with the default 404 fallback and implicit
    /// HEAD/OPTIONS enabled.
    pub fn new(router: R, registry: G) -> Self {
        Self::with_shared(SharedRouter::new(router), registry)
    }

    /// Create a dispatcher over a router that is also held elsewhere.
    pub fn with_shared(router: SharedRouter<R>, registry: G) -> Self {
        Self {
            router,
            registry,
            fallback: Arc::new(not_found),
            implicit_head: true,
            implicit_options: true,
        }
    }

    /// Endpoint called when no route matches the path.
    #[must_use]
    pub fn with_fallback<E>(mut self, fallback: E) -> Self
    where
        E: Endpoint + 'static,
    {
        self.fallback = Arc::new(fallback);
        self
    }

    #[must_use]
    pub fn with_implicit_head(mut self, enabled: bool) -> Self {
        self.implicit_head = enabled;
        self
    }

    #[must_use]
    pub fn with_implicit_options(mut self, enabled: bool) -> Self {
        self.implicit_options = enabled;
        self
    }

    #[must_use]
    pub fn with_runtime_config(self, config: &RuntimeConfig) -> Self {
        self.with_implicit_head(config.implicit_head)
            .with_implicit_options(config.implicit_options)
    }

    #[must_use]
    pub fn router(&self) -> &SharedRouter<R> {
        &self.router
    }

    #[must_use]
    pub fn registry(&self) -> &G {
        &self.registry
    }

    /// Route one request and produce its response.
    ///
    /// - match: params are merged into the request attributes, the result is
    ///   stored under [`ROUTE_RESULT_ATTRIBUTE`], and the handler's response
    ///   is returned unchanged
    /// - method mismatch: `405` with an `Allow` header, or the implicit
    ///   HEAD/OPTIONS behaviour when enabled
    /// - no match: the fallback endpoint
    pub fn dispatch(&self, req: HandlerRequest) -> HandlerResponse {
        let result = self.router.match_request(&req);

        if result.is_success() {
            return self.invoke(req, result);
        }
        if !result.is_method_failure() {
            debug!(method = %req.method, path = %req.path, "Dispatching to fallback");
            return self.fallback.call(&req);
        }

        let allowed = result.allowed_methods();

        if self.implicit_head && req.method == Method::HEAD && allowed.contains(&Method::GET) {
            let get_result = self.router.match_route(Method::GET.as_str(), &req.path);
            if get_result.is_success() {
                debug!(path = %req.path, "Serving HEAD through GET route");
                let mut resp = self.invoke(req, get_result);
                resp.body = serde_json::Value::Null;
                return resp;
            }
        }

        let allow = allow_header(allowed);
        if self.implicit_options && req.method == Method::OPTIONS {
            let mut resp = HandlerResponse::empty(200);
            resp.set_header("Allow", allow);
            return resp;
        }

        let mut resp = HandlerResponse::error(405, "Method Not Allowed");
        resp.set_header("Allow", allow);
        resp
    }

    fn invoke(&self, mut req: HandlerRequest, result: RouteResult) -> HandlerResponse {
        let Some(handler) = result.matched_handler().cloned() else {
            return self.fallback.call(&req);
        };
        let route_name = result.matched_route_name().unwrap_or_default().to_string();

        for (name, value) in result.matched_params().iter() {
            if name.starts_with(RESERVED_ATTRIBUTE_PREFIX) {
                warn!(
                    route = %route_name,
                    param = %name,
                    "Path param collides with reserved attribute - skipped"
                );
                continue;
            }
            req.set_attribute(name, AttributeValue::Text(value.to_string()));
        }
        req.set_attribute(ROUTE_RESULT_ATTRIBUTE, AttributeValue::Route(Box::new(result)));

        let endpoint = match &handler {
            Handler::Direct(endpoint) => Arc::clone(endpoint),
            Handler::Named(name) => match self.registry.resolve(name) {
                Some(endpoint) => endpoint,
                None => {
                    error!(
                        handler_name = %name,
                        route = %route_name,
                        "Handler not found - CRITICAL"
                    );
                    return HandlerResponse::error(
                        500,
                        &format!("Handler '{name}' is not registered"),
                    );
                }
            },
        };

        info!(
            handler = %handler,
            route = %route_name,
            method = %req.method,
            path = %req.path,
            "Request dispatched to handler"
        );
        let start = Instant::now();

        match catch_unwind(AssertUnwindSafe(|| endpoint.call(&req))) {
            Ok(resp) => {
                info!(
                    handler = %handler,
                    status = resp.status,
                    latency_us = start.elapsed().as_micros(),
                    "Handler execution complete"
                );
                resp
            }
            Err(panic) => {
                let panic_message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    handler = %handler,
                    route = %route_name,
                    panic_message = %panic_message,
                    "Handler panicked - CRITICAL"
                );
                HandlerResponse::error(500, &format!("Handler panicked: {panic_message}"))
            }
        }
    }
}

impl<R, G: std::fmt::Debug> std::fmt::Debug for Dispatcher<R, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("implicit_head", &self.implicit_head)
            .field("implicit_options", &self.implicit_options)
            .finish_non_exhaustive()
    }
}
