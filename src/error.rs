//! Error types for route construction and reverse URI generation.
//!
//! Routing misses and method mismatches are *not* errors; they are
//! [`RouteResult`](crate::result::RouteResult) values. The two types here
//! cover the only fallible operations in the core:
//!
//! - [`RouteError`] - raised synchronously while building a [`Route`](crate::route::Route)
//!   or registering it with a router. Treat it as startup misconfiguration.
//! - [`UriError`] - raised by `generate_uri`. Recoverable per call site; the
//!   router is never left in a different state.

use thiserror::Error;

/// Structurally invalid route input, reported at construction or registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid HTTP method token `{token}`")]
    InvalidMethod { token: String },

    #[error("method list is empty after normalization")]
    EmptyMethods,

    #[error("invalid handler reference `{reference}`")]
    InvalidHandler { reference: String },

    #[error("invalid route option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("route name `{name}` is already registered")]
    DuplicateName { name: String },

    #[error("route `{path}` already registered for methods {methods}")]
    DuplicateRoute { path: String, methods: String },

    #[error("matched route name is empty")]
    EmptyRouteName,
}

impl RouteError {
    #[inline]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        RouteError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        RouteError::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to produce a URI from a route name and substitutions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("no route named `{name}`")]
    UnknownRoute { name: String },

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParameter { route: String, param: String },

    #[error("value `{value}` for parameter `{param}` of route `{route}` violates its constraint")]
    ConstraintViolation {
        route: String,
        param: String,
        value: String,
    },
}
