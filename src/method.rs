//! HTTP method sets for routes.
//!
//! A route either accepts any method ([`Methods::Any`]) or a concrete,
//! non-empty set of uppercase tokens ([`Methods::Only`]). The two never
//! compare equal, so `Any` cannot be mistaken for "every method I happen to
//! have listed".
//!
//! Concrete sets are kept sorted and deduplicated so that generated route
//! names, `Allow` headers and log output are stable across runs.

use http::Method;
use smallvec::SmallVec;
use std::fmt;

use crate::error::RouteError;

/// Separator used by the multi-method shorthand (`GET:POST`).
///
/// Method tokens may not contain it.
pub const METHOD_SEPARATOR: char = ':';

/// Most routes list at most four methods.
pub type MethodVec = SmallVec<[Method; 4]>;

/// Methods a route accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Methods {
    /// Every method is accepted.
    #[default]
    Any,
    /// Only the listed methods (sorted, unique, never empty).
    Only(MethodVec),
}

impl Methods {
    /// Build a concrete set from raw tokens.
    ///
    /// Tokens are uppercased before parsing. An empty token, a token
    /// containing [`METHOD_SEPARATOR`] or an invalid HTTP token fails with
    /// [`RouteError::InvalidMethod`]; an empty input fails with
    /// [`RouteError::EmptyMethods`].
    pub fn only<I, S>(tokens: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = MethodVec::new();
        for token in tokens {
            set.push(parse_token(token.as_ref())?);
        }
        if set.is_empty() {
            return Err(RouteError::EmptyMethods);
        }
        Ok(Methods::Only(canonicalize(set)))
    }

    /// Parse the `GET:POST` shorthand. `*` means any method.
    pub fn parse_shorthand(spec: &str) -> Result<Self, RouteError> {
        if spec == "*" {
            return Ok(Methods::Any);
        }
        Self::only(spec.split(METHOD_SEPARATOR))
    }

    #[inline]
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Methods::Any)
    }

    /// Whether `method` is accepted. Total over all strings: malformed input
    /// simply returns `false` for concrete sets.
    #[must_use]
    pub fn allows(&self, method: &str) -> bool {
        match self {
            Methods::Any => true,
            Methods::Only(set) => set
                .iter()
                .any(|m| m.as_str().eq_ignore_ascii_case(method)),
        }
    }

    /// Concrete methods, empty for [`Methods::Any`].
    #[must_use]
    pub fn as_slice(&self) -> &[Method] {
        match self {
            Methods::Any => &[],
            Methods::Only(set) => set.as_slice(),
        }
    }

    /// Whether two method sets share at least one accepted method.
    #[must_use]
    pub fn overlaps(&self, other: &Methods) -> bool {
        match (self, other) {
            (Methods::Any, _) | (_, Methods::Any) => true,
            (Methods::Only(a), Methods::Only(b)) => a.iter().any(|m| b.contains(m)),
        }
    }

    /// Union of the concrete sets in `sets`. `Any` entries contribute nothing,
    /// since they cannot produce a method mismatch.
    #[must_use]
    pub fn union<'a, I>(sets: I) -> MethodVec
    where
        I: IntoIterator<Item = &'a Methods>,
    {
        let mut all = MethodVec::new();
        for set in sets {
            all.extend(set.as_slice().iter().cloned());
        }
        canonicalize(all)
    }
}

impl fmt::Display for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Methods::Any => f.write_str("*"),
            Methods::Only(set) => {
                for (i, m) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{METHOD_SEPARATOR}")?;
                    }
                    f.write_str(m.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// Render methods as an `Allow` header value (`GET, POST`).
#[must_use]
pub fn allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_token(token: &str) -> Result<Method, RouteError> {
    if token.is_empty() || token.contains(METHOD_SEPARATOR) {
        return Err(RouteError::InvalidMethod {
            token: token.to_string(),
        });
    }
    let upper = token.to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes()).map_err(|_| RouteError::InvalidMethod {
        token: token.to_string(),
    })
}

fn canonicalize(mut set: MethodVec) -> MethodVec {
    set.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    set.dedup();
    set
}
