//! Route compilation shared by every engine.
//!
//! Engines recognize two keys in [`Route::options`]:
//!
//! - `constraints`: `{ "id": "\\d+" }`, regexes for placeholders that carry
//!   no inline constraint.
//! - `defaults`: `{ "page": "1" }`, values used for optional placeholders that
//!   did not match and for missing substitutions during URI generation.
//!
//! Anything else in the options map is left alone.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{RouteError, UriError};
use crate::method::Methods;
use crate::result::{Params, RouteResult};
use crate::route::{PathPattern, Route};

pub const CONSTRAINTS_OPTION: &str = "constraints";
pub const DEFAULTS_OPTION: &str = "defaults";

/// A registered route plus the engine-side view of its options.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRoute {
    pub route: Arc<Route>,
    pub pattern: PathPattern,
    pub defaults: Vec<(Arc<str>, String)>,
}

impl CompiledRoute {
    pub fn compile(route: Route) -> Result<Self, RouteError> {
        let constraints = string_map(&route, CONSTRAINTS_OPTION, |_, v| match v {
            Value::String(s) => Ok(s.clone()),
            other => Err(format!("expected a regex string, got {other}")),
        })?;
        let pattern = route.pattern().with_constraints(&constraints)?;

        let defaults = string_map(&route, DEFAULTS_OPTION, |_, v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(format!("expected a scalar, got {other}")),
        })?;
        let mut resolved = Vec::with_capacity(defaults.len());
        for (name, value) in defaults {
            let placeholder = pattern.placeholder(&name).ok_or_else(|| {
                RouteError::invalid_option(DEFAULTS_OPTION, format!("unknown placeholder `{name}`"))
            })?;
            resolved.push((Arc::clone(placeholder.name_arc()), value));
        }
        // HashMap iteration order is arbitrary; keep params output stable.
        resolved.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self {
            route: Arc::new(route),
            pattern,
            defaults: resolved,
        })
    }

    #[must_use]
    pub fn default_for(&self, name: &str) -> Option<&str> {
        self.defaults
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Fill in declared defaults for placeholders that did not match.
    pub fn apply_defaults(&self, params: &mut Params) {
        for (name, value) in &self.defaults {
            if !params.contains(name) {
                params.insert(Arc::clone(name), value.clone());
            }
        }
    }

    /// Substitutions win over defaults; later duplicates win over earlier ones.
    pub fn generate(&self, substitutions: &[(&str, &str)]) -> Result<String, UriError> {
        self.pattern.expand(self.route.identifier(), |key| {
            substitutions
                .iter()
                .rfind(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .or_else(|| self.default_for(key))
        })
    }
}

fn string_map<F>(route: &Route, key: &str, convert: F) -> Result<HashMap<String, String>, RouteError>
where
    F: Fn(&str, &Value) -> Result<String, String>,
{
    match route.options().get(key) {
        None | Some(Value::Null) => Ok(HashMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| {
                convert(name, value)
                    .map(|v| (name.clone(), v))
                    .map_err(|reason| RouteError::invalid_option(key, format!("`{name}`: {reason}")))
            })
            .collect(),
        Some(other) => Err(RouteError::invalid_option(
            key,
            format!("expected an object, got {other}"),
        )),
    }
}

/// Explicit route names, for reverse generation.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameIndex(HashMap<String, usize>);

impl NameIndex {
    /// Reserve `route`'s name for index `idx`, rejecting duplicates.
    pub fn claim(&mut self, route: &Route, idx: usize) -> Result<(), RouteError> {
        let Some(name) = route.name() else {
            return Ok(());
        };
        if self.0.contains_key(name) {
            return Err(RouteError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.0.insert(name.to_string(), idx);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }
}

/// Apply the matching contract to the path-matching set, given in
/// precedence order: the first candidate that allows `method` wins; if none
/// does, the union of their methods is reported.
pub(crate) fn resolve<'a, I>(
    algorithm: &'static str,
    method: &str,
    path: &str,
    started: Instant,
    candidates: I,
) -> RouteResult
where
    I: IntoIterator<Item = (&'a CompiledRoute, Params)>,
{
    let mut path_matched: Vec<&Methods> = Vec::new();

    for (compiled, mut params) in candidates {
        if compiled.route.allows_method(method) {
            compiled.apply_defaults(&mut params);
            let duration = started.elapsed();
            if duration > std::time::Duration::from_millis(1) {
                warn!(
                    method = %method,
                    path = %path,
                    route = %compiled.route.identifier(),
                    route_pattern = %compiled.route.path(),
                    duration_us = duration.as_micros(),
                    algorithm,
                    "Slow route matching detected"
                );
            } else {
                info!(
                    method = %method,
                    path = %path,
                    route = %compiled.route.identifier(),
                    route_pattern = %compiled.route.path(),
                    path_params = ?params,
                    duration_us = duration.as_micros(),
                    algorithm,
                    "Route matched"
                );
            }
            return RouteResult::from_route(&compiled.route, params);
        }
        path_matched.push(compiled.route.methods());
    }

    if path_matched.is_empty() {
        debug!(
            method = %method,
            path = %path,
            duration_us = started.elapsed().as_micros(),
            algorithm,
            "No route matched"
        );
        return RouteResult::from_route_failure(None);
    }

    let allowed = Methods::union(path_matched);
    warn!(
        method = %method,
        path = %path,
        allowed = %crate::method::allow_header(&allowed),
        algorithm,
        "Method not allowed"
    );
    RouteResult::from_route_failure(Some(Methods::Only(allowed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Handler;
    use serde_json::json;

    fn route(path: &str) -> Route {
        Route::new(path, Handler::named("h"), Methods::Any).unwrap()
    }

    #[test]
    fn test_constraints_from_options() {
        let compiled = CompiledRoute::compile(
            route("/users/{id}").with_option(CONSTRAINTS_OPTION, json!({"id": "\\d+"})),
        )
        .unwrap();
        assert!(compiled.pattern.match_segments(&["users", "12"]).is_some());
        assert!(compiled.pattern.match_segments(&["users", "ab"]).is_none());
    }

    #[test]
    fn test_bad_options_fail_at_compile() {
        let cases = [
            route("/u/{id}").with_option(CONSTRAINTS_OPTION, json!({"nope": "\\d+"})),
            route("/u/{id}").with_option(CONSTRAINTS_OPTION, json!({"id": "("})),
            route("/u/{id}").with_option(CONSTRAINTS_OPTION, json!(["id"])),
            route("/u/{id}").with_option(DEFAULTS_OPTION, json!({"other": "1"})),
            route("/u/{id}").with_option(DEFAULTS_OPTION, json!({"id": {"x": 1}})),
        ];
        for case in cases {
            assert!(matches!(
                CompiledRoute::compile(case),
                Err(RouteError::InvalidOption { .. })
            ));
        }
    }

    #[test]
    fn test_defaults() {
        let compiled = CompiledRoute::compile(
            route("/list/{page?}").with_option(DEFAULTS_OPTION, json!({"page": 1})),
        )
        .unwrap();
        let mut params = Params::new();
        compiled.apply_defaults(&mut params);
        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(compiled.generate(&[]).unwrap(), "/list/1");
        assert_eq!(compiled.generate(&[("page", "3")]).unwrap(), "/list/3");
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let compiled =
            CompiledRoute::compile(route("/x").with_option("middleware", json!(["auth"]))).unwrap();
        assert!(compiled.defaults.is_empty());
    }

    #[test]
    fn test_name_index_rejects_duplicates() {
        let mut index = NameIndex::default();
        index.claim(&route("/a").with_name("a"), 0).unwrap();
        index.claim(&route("/b"), 1).unwrap();
        assert_eq!(
            index.claim(&route("/c").with_name("a"), 2),
            Err(RouteError::DuplicateName { name: "a".into() })
        );
        assert_eq!(index.get("a"), Some(0));
        assert_eq!(index.get("/b"), None);
    }
}
