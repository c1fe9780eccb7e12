//! Path pattern grammar shared by every routing engine.
//!
//! ```text
//! /users                  literal segment
//! /users/{id}             placeholder, captures one segment
//! /users/{id:\d+}         placeholder with a regex constraint (whole segment)
//! /archive/{year?}        optional placeholder
//! /archive/{year?:\d{4}}  optional placeholder with a constraint
//! ```
//!
//! Placeholders must span a whole segment. Once a placeholder is optional,
//! every segment after it must be an optional placeholder as well.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{RouteError, UriError};
use crate::result::Params;

/// A compiled regex constraint, keeping its source for comparison and display.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
}

impl Constraint {
    /// Compile `source`, anchored to the whole segment.
    pub fn new(source: &str) -> Result<Self, String> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| e.to_string())?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A named placeholder in a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    name: Arc<str>,
    constraint: Option<Constraint>,
    optional: bool,
}

impl Placeholder {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, cheap to clone into [`Params`].
    #[must_use]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    #[must_use]
    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether a request segment satisfies this placeholder.
    #[inline]
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.constraint.as_ref().map_or(true, |c| c.is_match(value))
    }
}

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Param(Placeholder),
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse and validate `source`.
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        if source.is_empty() {
            return Err(RouteError::invalid_pattern(source, "pattern is empty"));
        }
        if !source.starts_with('/') {
            return Err(RouteError::invalid_pattern(source, "pattern must start with `/`"));
        }

        let mut segments = Vec::with_capacity(source.matches('/').count());
        let mut seen_optional = false;

        for raw in source.split('/').filter(|s| !s.is_empty()) {
            let segment = parse_segment(source, raw)?;
            match &segment {
                Segment::Param(p) if p.optional => seen_optional = true,
                _ if seen_optional => {
                    return Err(RouteError::invalid_pattern(
                        source,
                        format!("segment `{raw}` follows an optional placeholder"),
                    ));
                }
                _ => {}
            }
            if let Segment::Param(p) = &segment {
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(q) if q.name == p.name));
                if duplicate {
                    return Err(RouteError::invalid_pattern(
                        source,
                        format!("placeholder `{}` appears twice", p.name),
                    ));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    #[must_use]
    pub fn placeholder(&self, name: &str) -> Option<&Placeholder> {
        self.placeholders().find(|p| p.name() == name)
    }

    /// Number of segments that must be present for a match.
    #[must_use]
    pub fn required_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| !matches!(s, Segment::Param(p) if p.optional))
            .count()
    }

    /// Whether both patterns accept exactly the same request paths.
    ///
    /// Placeholder names do not matter; literals, constraints and
    /// optionality do. `/items` and `/items/` are equivalent.
    #[must_use]
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(a), Segment::Param(b)) => {
                        a.optional == b.optional && a.constraint == b.constraint
                    }
                    _ => false,
                })
    }

    /// Return a copy with extra constraints applied to placeholders that do
    /// not already carry an inline one.
    ///
    /// Fails if a key names no placeholder or a regex does not compile.
    pub fn with_constraints(&self, extra: &HashMap<String, String>) -> Result<Self, RouteError> {
        let mut pattern = self.clone();
        for (name, source) in extra {
            let placeholder = pattern
                .segments
                .iter_mut()
                .find_map(|s| match s {
                    Segment::Param(p) if &*p.name == name.as_str() => Some(p),
                    _ => None,
                })
                .ok_or_else(|| {
                    RouteError::invalid_option("constraints", format!("unknown placeholder `{name}`"))
                })?;
            if placeholder.constraint.is_none() {
                let constraint = Constraint::new(source)
                    .map_err(|e| RouteError::invalid_option("constraints", e))?;
                placeholder.constraint = Some(constraint);
            }
        }
        Ok(pattern)
    }

    /// Match already-split request segments, linear-scan style.
    #[must_use]
    pub fn match_segments(&self, request: &[&str]) -> Option<Params> {
        if request.len() > self.segments.len() || request.len() < self.required_len() {
            return None;
        }
        let mut params = Params::new();
        for (segment, actual) in self.segments.iter().zip(request.iter()) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                Segment::Param(p) => {
                    if !p.accepts(actual) {
                        return None;
                    }
                    params.insert(Arc::clone(&p.name), (*actual).to_string());
                }
            }
        }
        Some(params)
    }

    /// Substitute values into the pattern.
    ///
    /// `lookup` returns the supplied or default value for a placeholder.
    /// Values are checked against constraints, then percent-encoded. An empty
    /// value counts as absent, since a placeholder never captures an empty
    /// segment. Generation stops at the first optional placeholder without a
    /// value; values for placeholders after it are ignored.
    pub fn expand<'a, F>(&self, route: &str, lookup: F) -> Result<String, UriError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut uri = String::with_capacity(self.source.len());
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    uri.push('/');
                    uri.push_str(literal);
                }
                Segment::Param(p) => match lookup(p.name()).filter(|v| !v.is_empty()) {
                    Some(value) => {
                        if !p.accepts(value) {
                            return Err(UriError::ConstraintViolation {
                                route: route.to_string(),
                                param: p.name().to_string(),
                                value: value.to_string(),
                            });
                        }
                        uri.push('/');
                        uri.push_str(&urlencoding::encode(value));
                    }
                    None if p.optional => {
                        for later in self.segments[idx + 1..].iter().filter_map(|s| match s {
                            Segment::Param(q) if lookup(q.name()).is_some_and(|v| !v.is_empty()) => {
                                Some(q.name())
                            }
                            _ => None,
                        }) {
                            debug!(
                                route = %route,
                                param = %later,
                                omitted = %p.name(),
                                "Substitution ignored after omitted optional placeholder"
                            );
                        }
                        break;
                    }
                    None => {
                        return Err(UriError::MissingParameter {
                            route: route.to_string(),
                            param: p.name().to_string(),
                        });
                    }
                },
            }
        }
        if uri.is_empty() {
            uri.push('/');
        }
        Ok(uri)
    }
}

fn parse_segment(source: &str, raw: &str) -> Result<Segment, RouteError> {
    let is_placeholder = raw.starts_with('{') && raw.ends_with('}') && raw.len() >= 2;
    if !is_placeholder {
        if raw.contains('{') || raw.contains('}') {
            return Err(RouteError::invalid_pattern(
                source,
                format!("placeholder in `{raw}` must span the whole segment"),
            ));
        }
        // Request segments are compared after percent-decoding.
        if raw.contains('%') {
            return Err(RouteError::invalid_pattern(
                source,
                format!("literal `{raw}` must not be percent-encoded"),
            ));
        }
        return Ok(Segment::Literal(raw.to_string()));
    }

    let inner = &raw[1..raw.len() - 1];
    let (head, constraint) = match inner.split_once(':') {
        Some((head, regex)) => (head, Some(regex)),
        None => (inner, None),
    };
    let (name, optional) = match head.strip_suffix('?') {
        Some(name) => (name, true),
        None => (head, false),
    };

    if !is_valid_name(name) {
        return Err(RouteError::invalid_pattern(
            source,
            format!("invalid placeholder name `{name}`"),
        ));
    }

    let constraint = match constraint {
        Some("") => {
            return Err(RouteError::invalid_pattern(
                source,
                format!("empty constraint for `{name}`"),
            ));
        }
        Some(regex) => Some(
            Constraint::new(regex)
                .map_err(|e| RouteError::invalid_pattern(source, format!("`{name}`: {e}")))?,
        ),
        None => None,
    };

    Ok(Segment::Param(Placeholder {
        name: Arc::from(name),
        constraint,
        optional,
    }))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Split a request path into decoded, non-empty segments.
///
/// Empty segments are dropped, so `/users/` and `//users` both yield
/// `["users"]`. Segments that fail to decode are kept verbatim.
#[must_use]
pub fn split_request_path(path: &str) -> Vec<std::borrow::Cow<'_, str>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).unwrap_or(std::borrow::Cow::Borrowed(s)))
        .collect()
}
