use serde_json::{Map, Value};
use std::fmt;

use super::handler::Handler;
use super::pattern::PathPattern;
use crate::error::RouteError;
use crate::method::Methods;

/// Separates path and methods in generated route identifiers (`/users^GET:POST`).
pub const IDENTIFIER_SEPARATOR: char = '^';

/// Engine-specific route options, passed through uninterpreted by `Route`.
pub type RouteOptions = Map<String, Value>;

/// One routable path pattern with its handler, methods, optional name and
/// options.
///
/// The pattern is parsed when the route is built, so malformed input fails
/// here rather than at match time. Options can be set until the route is
/// handed to a router; after registration the router holds it behind an
/// `Arc` and nothing mutates it.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    handler: Handler,
    methods: Methods,
    name: Option<String>,
    identifier: String,
    options: RouteOptions,
}

impl Route {
    /// Build a route.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPattern`] for an empty or malformed path
    /// - [`RouteError::InvalidHandler`] for an empty or whitespace-bearing named reference
    /// - [`RouteError::EmptyMethods`] for a concrete but empty method set
    pub fn new(path: &str, handler: Handler, methods: Methods) -> Result<Self, RouteError> {
        let pattern = PathPattern::parse(path)?;
        if !handler.is_resolvable() {
            return Err(RouteError::InvalidHandler {
                reference: handler.to_string(),
            });
        }
        if matches!(&methods, Methods::Only(set) if set.is_empty()) {
            return Err(RouteError::EmptyMethods);
        }
        let identifier = generated_identifier(path, &methods);
        Ok(Self {
            pattern,
            handler,
            methods,
            name: None,
            identifier,
            options: RouteOptions::new(),
        })
    }

    /// Give the route a name for reverse URI generation. An empty name
    /// leaves the route unnamed.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            self.name = None;
            self.identifier = generated_identifier(self.path(), &self.methods);
        } else {
            self.identifier.clone_from(&name);
            self.name = Some(name);
        }
        self
    }

    /// Set a single option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Replace all options.
    pub fn set_options(&mut self, options: RouteOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.pattern.source()
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name reported in match results: the explicit name, or
    /// `path^METHOD:METHOD` (just `path` for any-method routes).
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn allows_method(&self, method: &str) -> bool {
        self.methods.allows(method)
    }

    #[inline]
    #[must_use]
    pub fn allows_any_method(&self) -> bool {
        self.methods.is_any()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.methods, self.path(), self.handler)
    }
}

fn generated_identifier(path: &str, methods: &Methods) -> String {
    match methods {
        Methods::Any => path.to_string(),
        Methods::Only(_) => format!("{path}{IDENTIFIER_SEPARATOR}{methods}"),
    }
}
