use std::fmt;
use std::sync::Arc;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Something the dispatcher can invoke directly.
///
/// Implemented for any `Fn(&HandlerRequest) -> HandlerResponse` closure.
pub trait Endpoint: Send + Sync {
    fn call(&self, req: &HandlerRequest) -> HandlerResponse;
}

impl<F> Endpoint for F
where
    F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync,
{
    fn call(&self, req: &HandlerRequest) -> HandlerResponse {
        self(req)
    }
}

/// Opaque handler reference carried by a route.
///
/// The router never looks inside it; it is forwarded in the match result.
/// `Named` references are resolved by a
/// [`HandlerRegistry`](crate::dispatcher::HandlerRegistry) at dispatch time.
#[derive(Clone)]
pub enum Handler {
    Direct(Arc<dyn Endpoint>),
    Named(Arc<str>),
}

impl Handler {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Handler::Named(Arc::from(name))
    }

    #[must_use]
    pub fn direct<E>(endpoint: E) -> Self
    where
        E: Endpoint + 'static,
    {
        Handler::Direct(Arc::new(endpoint))
    }

    /// Registry key for named handlers.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Handler::Named(name) => Some(name),
            Handler::Direct(_) => None,
        }
    }

    /// Named references must be non-empty and contain no whitespace.
    pub(crate) fn is_resolvable(&self) -> bool {
        match self {
            Handler::Direct(_) => true,
            Handler::Named(name) => !name.is_empty() && !name.chars().any(char::is_whitespace),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Direct(a), Handler::Direct(b)) => Arc::ptr_eq(a, b),
            (Handler::Named(a), Handler::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Direct(_) => f.write_str("Direct(<endpoint>)"),
            Handler::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Direct(_) => f.write_str("<direct>"),
            Handler::Named(name) => f.write_str(name),
        }
    }
}
