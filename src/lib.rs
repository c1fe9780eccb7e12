//! # brrtroute
//!
//! **brrtroute** is a routing contract for HTTP dispatch: one [`Router`] trait,
//! interchangeable matching engines behind it, method-aware match results and
//! named-route URI generation.
//!
//! ## Overview
//!
//! A router answers one question per request: which registered route handles
//! this method and path? The answer is always a [`RouteResult`] value, never
//! an error:
//!
//! - a match, carrying the route name, the opaque [`Handler`] reference and
//!   the extracted path params;
//! - a method mismatch, carrying the union of methods the path does accept
//!   (what a `405` needs for its `Allow` header);
//! - a plain miss.
//!
//! Errors are reserved for misconfiguration ([`RouteError`], at construction
//! and registration) and for reverse generation ([`UriError`]).
//!
//! ## Architecture
//!
//! - **[`method`]** - HTTP method sets, including the "any method" marker
//! - **[`route`]** - routes, handler references and the path pattern grammar
//! - **[`result`]** - the immutable match outcome
//! - **[`router`]** - the [`Router`] trait, the linear and radix engines, the
//!   registration front-end and the hot-swappable shared router
//! - **[`dispatcher`]** - a synchronous boundary that turns match results into
//!   responses (404/405, implicit HEAD/OPTIONS, panic recovery)
//! - **[`config`]** - route tables from YAML/TOML/JSON and runtime settings
//!   from the environment
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - the `brrtroute` binary
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Dispatcher
//!     participant Router
//!     participant Registry
//!     participant Handler
//!
//!     Client->>Dispatcher: HandlerRequest
//!     Dispatcher->>Router: match_request(&req)
//!     Router-->>Dispatcher: RouteResult
//!     alt matched
//!         Dispatcher->>Registry: resolve(handler name)
//!         Registry-->>Dispatcher: Endpoint
//!         Dispatcher->>Handler: call(&req)
//!         Handler-->>Dispatcher: HandlerResponse
//!     else method mismatch
//!         Dispatcher-->>Client: 405 + Allow
//!     else miss
//!         Dispatcher-->>Client: fallback (404)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtroute::{Handler, LinearRouter, Methods, Route, Router};
//!
//! let mut router = LinearRouter::new();
//! router.add_route(
//!     Route::new("/", Handler::named("home"), Methods::only(["GET"])?)?.with_name("home"),
//! )?;
//!
//! assert_eq!(router.match_route("GET", "/").matched_route_name(), Some("home"));
//!
//! let post = router.match_route("POST", "/");
//! assert!(post.is_method_failure());
//! assert_eq!(post.allowed_methods(), &[http::Method::GET]);
//!
//! assert!(!router.match_route("GET", "/missing").is_method_failure());
//! # Ok::<(), brrtroute::RouteError>(())
//! ```
//!
//! ## Concurrency
//!
//! Routes are registered at startup through `&mut self`; matching takes
//! `&self` and touches no shared mutable state, so a built router can be
//! read from any number of threads. Rebuild-and-swap at runtime goes through
//! [`SharedRouter`].

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod method;
pub mod result;
pub mod route;
pub mod router;

pub use config::{RouteTable, RuntimeConfig};
pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, Registry};
pub use error::{RouteError, UriError};
pub use method::Methods;
pub use result::{Params, RouteFailure, RouteResult, RouteSuccess};
pub use route::{Endpoint, Handler, Route};
pub use router::{
    LinearRouter, RadixRouter, RouteCollector, RouteRequest, Router, SharedRouter,
};
