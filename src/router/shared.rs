use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

use super::{RouteRequest, Router};
use crate::error::UriError;
use crate::result::RouteResult;

/// A frozen router that can be swapped wholesale at runtime.
///
/// Readers load the current table without locking; [`SharedRouter::replace`]
/// publishes a fully built replacement. A request that already loaded the
/// old table finishes against it. Routes are never added to a published
/// router in place.
#[derive(Debug)]
pub struct SharedRouter<R> {
    inner: Arc<ArcSwap<R>>,
}

impl<R> Clone for SharedRouter<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Router> SharedRouter<R> {
    pub fn new(router: R) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// Snapshot of the current table.
    #[must_use]
    pub fn load(&self) -> Arc<R> {
        self.inner.load_full()
    }

    pub fn match_request<Q>(&self, request: &Q) -> RouteResult
    where
        Q: RouteRequest + ?Sized,
    {
        self.inner.load().match_request(request)
    }

    pub fn match_route(&self, method: &str, path: &str) -> RouteResult {
        self.inner.load().match_route(method, path)
    }

    pub fn generate_uri(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<String, UriError> {
        self.inner.load().generate_uri(name, substitutions)
    }

    /// Publish a new table.
    pub fn replace(&self, router: R) {
        let routes_count = router.routes().len();
        self.inner.store(Arc::new(router));
        info!(routes_count, "Routing table replaced");
    }
}
