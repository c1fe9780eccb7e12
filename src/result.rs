//! Match outcomes.
//!
//! A [`RouteResult`] is produced exactly once per `match_request` call and
//! is a plain value afterwards: it owns its data, holds no borrow of the
//! router, and stays valid if the router is later rebuilt.
//!
//! Every accessor is total. Asking a failure for its params returns an empty
//! [`Params`], asking a success for its allowed methods returns an empty
//! slice. Callers branch on [`RouteResult::is_success`] /
//! [`RouteResult::is_method_failure`] (or `match` on the variants) rather
//! than relying on errors.

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouteError;
use crate::method::{MethodVec, Methods};
use crate::route::{Handler, Route};

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have <=4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the compiled route
/// table; cloning one is an atomic increment rather than a string copy.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Parameters extracted from a matched path (placeholder name -> segment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self(ParamVec::new())
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: Arc<str>, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Remove a value, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k.as_ref() == name)?;
        Some(self.0.remove(idx).1)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy into a `HashMap`.
    /// Note: This allocates - use [`Params::get`] in hot paths instead.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl From<ParamVec> for Params {
    fn from(pairs: ParamVec) -> Self {
        Self(pairs)
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a (Arc<str>, String);
    type IntoIter = std::slice::Iter<'a, (Arc<str>, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A successful match.
#[derive(Debug, Clone)]
pub struct RouteSuccess {
    route_name: String,
    handler: Handler,
    params: Params,
    route: Option<Arc<Route>>,
}

impl RouteSuccess {
    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered route, when the result came from a router.
    #[must_use]
    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }
}

impl PartialEq for RouteSuccess {
    fn eq(&self, other: &Self) -> bool {
        let same_route = match (&self.route, &other.route) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.route_name == other.route_name
            && self.handler == other.handler
            && self.params == other.params
            && same_route
    }
}

/// A failed match. `allowed` is set only for method mismatches.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFailure {
    allowed: Option<MethodVec>,
    // Always empty; lets `matched_params` hand out a reference.
    params: Params,
}

impl RouteFailure {
    #[must_use]
    pub fn is_method_failure(&self) -> bool {
        self.allowed.is_some()
    }

    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        self.allowed.as_deref().unwrap_or(&[])
    }
}

/// Outcome of one match attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    Success(RouteSuccess),
    Failure(RouteFailure),
}

impl RouteResult {
    /// Build a success for a match produced outside the bundled engines.
    ///
    /// # Errors
    ///
    /// [`RouteError::EmptyRouteName`] when `name` is empty, in every build
    /// profile.
    pub fn from_route_match(
        name: impl Into<String>,
        handler: Handler,
        params: Params,
    ) -> Result<Self, RouteError> {
        let route_name = name.into();
        if route_name.is_empty() {
            return Err(RouteError::EmptyRouteName);
        }
        Ok(RouteResult::Success(RouteSuccess {
            route_name,
            handler,
            params,
            route: None,
        }))
    }

    /// Build a success carrying the registered route.
    #[must_use]
    pub fn from_route(route: &Arc<Route>, params: Params) -> Self {
        RouteResult::Success(RouteSuccess {
            route_name: route.identifier().to_string(),
            handler: route.handler().clone(),
            params,
            route: Some(Arc::clone(route)),
        })
    }

    /// Build a failure.
    ///
    /// `None` and [`Methods::Any`] produce a plain not-found failure, since
    /// "any method" can never be the cause of a mismatch. A concrete,
    /// non-empty set produces a method failure.
    #[must_use]
    pub fn from_route_failure(methods: Option<Methods>) -> Self {
        let allowed = match methods {
            Some(Methods::Only(set)) if !set.is_empty() => Some(set),
            _ => None,
        };
        RouteResult::Failure(RouteFailure {
            allowed,
            params: Params::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, RouteResult::Success(_))
    }

    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    #[must_use]
    pub fn is_method_failure(&self) -> bool {
        match self {
            RouteResult::Failure(f) => f.is_method_failure(),
            RouteResult::Success(_) => false,
        }
    }

    /// Matched route name, `None` on failure.
    #[must_use]
    pub fn matched_route_name(&self) -> Option<&str> {
        match self {
            RouteResult::Success(s) => Some(s.route_name()),
            RouteResult::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn matched_handler(&self) -> Option<&Handler> {
        match self {
            RouteResult::Success(s) => Some(s.handler()),
            RouteResult::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn matched_route(&self) -> Option<&Arc<Route>> {
        match self {
            RouteResult::Success(s) => s.route(),
            RouteResult::Failure(_) => None,
        }
    }

    /// Matched params, empty on failure.
    #[must_use]
    pub fn matched_params(&self) -> &Params {
        match self {
            RouteResult::Success(s) => s.params(),
            RouteResult::Failure(f) => &f.params,
        }
    }

    /// Allowed methods for a method failure, empty otherwise.
    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        match self {
            RouteResult::Failure(f) => f.allowed_methods(),
            RouteResult::Success(_) => &[],
        }
    }
}
