//! # CLI Module
//!
//! Command-line access to route tables, mostly for checking a table before
//! shipping it.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List routes in registration order:
//!
//! ```bash
//! brrtroute --table routes.yaml routes
//! ```
//!
//! ### `match`
//!
//! Match a request and print the outcome as JSON (`matched`,
//! `method_not_allowed` with the `Allow` value, or `not_found`):
//!
//! ```bash
//! brrtroute --table routes.yaml match GET /pets/42
//! ```
//!
//! ### `uri`
//!
//! Generate a URI for a named route:
//!
//! ```bash
//! brrtroute --table routes.yaml uri pet id=42
//! ```
//!
//! `--engine radix|linear` (or `BRRT_ROUTER_ENGINE`) selects the engine.
//! Engines differ only in precedence for overlapping patterns, so comparing
//! `match` output across both is a quick ambiguity check.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, EngineArg};
