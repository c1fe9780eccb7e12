//! Radix tree implementation for efficient HTTP route matching
//!
//! This module provides a segment tree (compact prefix tree) for O(k)
//! route matching where k is the number of path segments. Lookup cost does
//! not grow with the number of registered routes the way a linear scan does.
//!
//! ## Implementation Details
//!
//! The tree is built by splitting patterns into segments:
//! - Each node represents a path segment
//! - Static segments (e.g., `users`) match exactly
//! - Placeholder segments (e.g., `{id}`, `{id:\d+}`) match any segment their
//!   constraint accepts
//! - Routes are stored at terminal nodes in registration order
//! - A route with optional trailing placeholders is stored at every depth
//!   where the remaining segments are all optional
//!
//! ## Precedence
//!
//! Every route whose pattern matches the path is collected, then ordered:
//! 1. by shape, compared segment by segment from the left, where a static
//!    segment sorts before a placeholder;
//! 2. among routes with the same shape, by registration order.
//!
//! So `/users/new` wins over `/users/{id}` for `GET /users/new` no matter
//! which was registered first, while `/x/{b}/{c}` wins over a later
//! `/x/{a}/{d}` even though the two capture different names. The first route
//! in that order that allows the request method is the match.
//!
//! ## Example
//!
//! ```rust
//! use brrtroute::method::Methods;
//! use brrtroute::route::{Handler, Route};
//! use brrtroute::router::{RadixRouter, Router};
//!
//! let mut router = RadixRouter::new();
//! router.add_route(Route::new("/users/{id}", Handler::named("get_user"), Methods::Any)?)?;
//!
//! let result = router.match_route("GET", "/users/123");
//! assert_eq!(result.matched_params().get("id"), Some("123"));
//! # Ok::<(), brrtroute::RouteError>(())
//! ```

use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::compiled::{resolve, CompiledRoute, NameIndex};
use super::{RouteRequest, Router};
use crate::error::{RouteError, UriError};
use crate::result::{ParamVec, Params, RouteResult};
use crate::route::pattern::{split_request_path, Placeholder, Segment};
use crate::route::Route;

/// Node in the radix tree
///
/// Each node represents a segment of a URL path and can have children
/// that share common prefixes.
#[derive(Debug, Clone, Default)]
struct RadixNode {
    /// The literal segment this node represents (empty for root and placeholders)
    segment: Cow<'static, str>,
    /// Placeholder matched by this node, if it is a parameter node
    placeholder: Option<Placeholder>,
    /// Indices of routes that terminate here, in registration order
    routes: Vec<usize>,
    /// Child nodes for static segments
    children: Vec<RadixNode>,
    /// Child nodes for placeholders. Different names or constraints at the
    /// same position get separate nodes (e.g. /users/{id}/posts vs
    /// /users/{user_id}/comments)
    param_children: Vec<RadixNode>,
}

impl RadixNode {
    fn new(segment: Cow<'static, str>) -> Self {
        Self {
            segment,
            ..Self::default()
        }
    }

    fn new_param(placeholder: Placeholder) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..Self::default()
        }
    }

    /// Insert a route into the tree
    fn insert(&mut self, segments: &[Segment], route: usize) {
        let all_optional = segments
            .iter()
            .all(|s| matches!(s, Segment::Param(p) if p.is_optional()));
        if all_optional {
            // Covers the exact end of the pattern as well as each point
            // where the remaining optional placeholders may be omitted.
            self.routes.push(route);
        }

        let Some((segment, remaining)) = segments.split_first() else {
            return;
        };

        match segment {
            Segment::Param(placeholder) => {
                // Reuse a child only when name and constraint are identical
                if let Some(child) = self
                    .param_children
                    .iter_mut()
                    .find(|c| c.placeholder.as_ref() == Some(placeholder))
                {
                    child.insert(remaining, route);
                    return;
                }
                let mut child = RadixNode::new_param(placeholder.clone());
                child.insert(remaining, route);
                self.param_children.push(child);
            }
            Segment::Literal(literal) => {
                if let Some(child) = self.children.iter_mut().find(|c| c.segment == *literal) {
                    child.insert(remaining, route);
                    return;
                }
                let mut child = RadixNode::new(Cow::Owned(literal.clone()));
                child.insert(remaining, route);
                self.children.push(child);
            }
        }
    }

    /// Collect every route whose pattern matches `segments`, with its shape
    /// (`true` marks a placeholder at that depth)
    fn collect(
        &self,
        segments: &[&str],
        params: &mut ParamVec,
        shape: &mut Shape,
        out: &mut Vec<Candidate>,
    ) {
        let Some((segment, remaining)) = segments.split_first() else {
            for &route in &self.routes {
                out.push(Candidate {
                    shape: shape.clone(),
                    route,
                    params: Params::from(params.clone()),
                });
            }
            return;
        };

        // First, static children
        for child in &self.children {
            if child.segment == *segment {
                shape.push(false);
                child.collect(remaining, params, shape, out);
                shape.pop();
            }
        }

        // Then every placeholder child that accepts the segment
        for param_child in &self.param_children {
            if let Some(placeholder) = &param_child.placeholder {
                if placeholder.accepts(segment) {
                    params.push((Arc::clone(placeholder.name_arc()), (*segment).to_string()));
                    shape.push(true);
                    param_child.collect(remaining, params, shape, out);
                    // Backtrack
                    shape.pop();
                    params.pop();
                }
            }
        }
    }
}

/// Static/placeholder flags per matched depth; static sorts first.
type Shape = SmallVec<[bool; 8]>;

struct Candidate {
    shape: Shape,
    route: usize,
    params: Params,
}

/// Radix tree-based router for O(k) route matching
///
/// See the module documentation for the precedence rules.
///
/// # Performance
///
/// - Insertion: O(k) where k is the number of pattern segments
/// - Lookup: O(k) for static routes; placeholders add branching only where
///   several placeholder children accept the same segment
/// - Memory: shared prefixes (e.g. `/api/v1/`) are stored once
#[derive(Debug, Clone, Default)]
pub struct RadixRouter {
    /// Root node of the radix tree
    root: RadixNode,
    /// Compiled routes, indexed by registration order
    routes: Vec<CompiledRoute>,
    names: NameIndex,
}

impl RadixRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router from routes, failing on the first invalid one.
    pub fn from_routes<I>(routes: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Route>,
    {
        let mut router = Self::new();
        for route in routes {
            router.add_route(route)?;
        }
        Ok(router)
    }
}

impl Router for RadixRouter {
    fn add_route(&mut self, route: Route) -> Result<Arc<Route>, RouteError> {
        let compiled = CompiledRoute::compile(route)?;
        let idx = self.routes.len();
        self.names.claim(&compiled.route, idx)?;
        self.root.insert(compiled.pattern.segments(), idx);
        let route = Arc::clone(&compiled.route);
        self.routes.push(compiled);
        info!(
            route = %route.identifier(),
            methods = %route.methods(),
            path = %route.path(),
            routes_count = self.routes.len(),
            algorithm = "radix_tree",
            "Route registered"
        );
        Ok(route)
    }

    fn match_request<Q>(&self, request: &Q) -> RouteResult
    where
        Q: RouteRequest + ?Sized,
    {
        let (method, path) = (request.method(), request.path());
        debug!(method = %method, path = %path, algorithm = "radix_tree", "Route match attempt");
        let started = Instant::now();

        let decoded = split_request_path(path);
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();

        let mut found = Vec::new();
        self.root
            .collect(&segments, &mut ParamVec::new(), &mut Shape::new(), &mut found);
        found.sort_by(|a, b| a.shape.cmp(&b.shape).then(a.route.cmp(&b.route)));

        let candidates = found
            .into_iter()
            .map(|c| (&self.routes[c.route], c.params));
        resolve("radix_tree", method, path, started, candidates)
    }

    fn generate_uri(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<String, UriError> {
        let idx = self.names.get(name).ok_or_else(|| UriError::UnknownRoute {
            name: name.to_string(),
        })?;
        self.routes[idx].generate(substitutions)
    }

    fn routes(&self) -> Vec<Arc<Route>> {
        self.routes.iter().map(|c| Arc::clone(&c.route)).collect()
    }

    fn algorithm(&self) -> &'static str {
        "radix_tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Methods;
    use crate::route::Handler;

    fn create_route(method: &str, path: &str, handler: &str) -> Route {
        Route::new(path, Handler::named(handler), Methods::only([method]).unwrap()).unwrap()
    }

    fn router(routes: Vec<Route>) -> RadixRouter {
        RadixRouter::from_routes(routes).unwrap()
    }

    fn handler_of(result: &RouteResult) -> Option<&str> {
        result.matched_handler().and_then(Handler::name)
    }

    #[test]
    fn test_radix_router_simple_route() {
        let router = router(vec![create_route("GET", "/health", "health_check")]);

        let result = router.match_route("GET", "/health");
        assert!(result.is_success());
        assert_eq!(handler_of(&result), Some("health_check"));
        assert!(result.matched_params().is_empty());
    }

    #[test]
    fn test_radix_router_with_parameter() {
        let router = router(vec![create_route("GET", "/users/{id}", "get_user")]);

        let result = router.match_route("GET", "/users/123");
        assert_eq!(handler_of(&result), Some("get_user"));
        assert_eq!(result.matched_params().get("id"), Some("123"));
    }

    #[test]
    fn test_radix_router_multiple_parameters() {
        let router = router(vec![create_route(
            "GET",
            "/users/{user_id}/posts/{post_id}",
            "get_post",
        )]);

        let result = router.match_route("GET", "/users/123/posts/456");
        assert_eq!(handler_of(&result), Some("get_post"));
        assert_eq!(result.matched_params().get("user_id"), Some("123"));
        assert_eq!(result.matched_params().get("post_id"), Some("456"));
    }

    #[test]
    fn test_radix_router_method_filtering() {
        let router = router(vec![
            create_route("GET", "/items", "get_items"),
            create_route("POST", "/items", "create_item"),
        ]);

        assert_eq!(handler_of(&router.match_route("GET", "/items")), Some("get_items"));
        assert_eq!(
            handler_of(&router.match_route("POST", "/items")),
            Some("create_item")
        );

        let put_result = router.match_route("PUT", "/items");
        assert!(put_result.is_method_failure());
        assert_eq!(
            put_result.allowed_methods(),
            &[http::Method::GET, http::Method::POST]
        );
    }

    #[test]
    fn test_radix_router_no_match() {
        let router = router(vec![create_route("GET", "/users/{id}", "get_user")]);

        let result = router.match_route("GET", "/posts/123");
        assert!(result.is_failure());
        assert!(!result.is_method_failure());
        assert!(router.match_route("POST", "/users/123").is_method_failure());
    }

    #[test]
    fn test_radix_router_complex_paths() {
        let router = router(vec![
            create_route("GET", "/users", "list_users"),
            create_route("GET", "/users/{id}", "get_user"),
            create_route("GET", "/users/{id}/posts", "get_user_posts"),
        ]);

        assert_eq!(handler_of(&router.match_route("GET", "/users")), Some("list_users"));
        assert_eq!(handler_of(&router.match_route("GET", "/users/123")), Some("get_user"));
        assert_eq!(
            handler_of(&router.match_route("GET", "/users/123/posts")),
            Some("get_user_posts")
        );
    }

    #[test]
    fn test_radix_router_different_param_names_same_position() {
        // Routes with different parameter names at the same position must not
        // share a param node, or the wrong name leaks into the params.
        let router = router(vec![
            create_route("GET", "/users/{user_id}/posts", "get_user_posts"),
            create_route("GET", "/users/{id}/comments", "get_user_comments"),
        ]);

        let result1 = router.match_route("GET", "/users/123/posts");
        assert_eq!(handler_of(&result1), Some("get_user_posts"));
        assert_eq!(result1.matched_params().get("user_id"), Some("123"));
        assert!(result1.matched_params().get("id").is_none());

        let result2 = router.match_route("GET", "/users/456/comments");
        assert_eq!(handler_of(&result2), Some("get_user_comments"));
        assert_eq!(result2.matched_params().get("id"), Some("456"));
        assert!(result2.matched_params().get("user_id").is_none());
    }

    #[test]
    fn test_radix_router_static_beats_placeholder() {
        let router = router(vec![
            create_route("GET", "/users/{id}", "get_user"),
            create_route("GET", "/users/new", "new_user"),
        ]);

        let result = router.match_route("GET", "/users/new");
        assert_eq!(handler_of(&result), Some("new_user"));
        assert!(result.matched_params().is_empty());
    }

    #[test]
    fn test_radix_router_backtracks_out_of_static_branch() {
        let router = router(vec![
            create_route("GET", "/users/new/comments", "new_comments"),
            create_route("GET", "/users/{id}/posts", "user_posts"),
        ]);

        let result = router.match_route("GET", "/users/new/posts");
        assert_eq!(handler_of(&result), Some("user_posts"));
        assert_eq!(result.matched_params().get("id"), Some("new"));
    }

    #[test]
    fn test_radix_router_constraints_split_nodes() {
        let router = router(vec![
            create_route("GET", r"/items/{id:\d+}", "by_id"),
            create_route("GET", "/items/{slug}", "by_slug"),
        ]);

        assert_eq!(handler_of(&router.match_route("GET", "/items/42")), Some("by_id"));
        let result = router.match_route("GET", "/items/blue-hat");
        assert_eq!(handler_of(&result), Some("by_slug"));
        assert_eq!(result.matched_params().get("slug"), Some("blue-hat"));
    }

    #[test]
    fn test_radix_router_optional_segments() {
        let router = router(vec![create_route(
            "GET",
            "/archive/{year?}/{month?}",
            "archive",
        )]);

        for path in ["/archive", "/archive/2024", "/archive/2024/05"] {
            assert_eq!(handler_of(&router.match_route("GET", path)), Some("archive"));
        }
        let result = router.match_route("GET", "/archive/2024");
        assert_eq!(result.matched_params().get("year"), Some("2024"));
        assert!(!result.matched_params().contains("month"));
        assert!(router.match_route("GET", "/archive/2024/05/01").is_failure());
    }

    #[test]
    fn test_radix_router_trailing_slash() {
        let router = router(vec![create_route("GET", "/health", "health_check")]);
        assert!(router.match_route("GET", "/health/").is_success());
    }
}
