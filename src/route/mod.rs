//! # Route Module
//!
//! A [`Route`] describes one routable path pattern: the pattern itself, an
//! opaque [`Handler`] reference, the accepted [`Methods`](crate::method::Methods),
//! an optional name for reverse URI generation, and free-form options that
//! only routing engines interpret.
//!
//! ```rust
//! use brrtroute::method::Methods;
//! use brrtroute::route::{Handler, Route};
//!
//! let route = Route::new("/pets/{id:\\d+}", Handler::named("get_pet"), Methods::only(["GET"])?)?
//!     .with_name("pet");
//! assert_eq!(route.identifier(), "pet");
//! assert!(route.allows_method("get"));
//! # Ok::<(), brrtroute::RouteError>(())
//! ```

mod core;
mod handler;
pub mod pattern;

pub use self::core::{Route, RouteOptions, IDENTIFIER_SEPARATOR};
pub use handler::{Endpoint, Handler};
pub use pattern::PathPattern;
