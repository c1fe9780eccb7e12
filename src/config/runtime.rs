//! # Runtime Configuration
//!
//! Environment variable-based configuration for the router and dispatcher.
//!
//! ## Environment Variables
//!
//! ### `BRRT_ROUTER_ENGINE`
//!
//! Routing engine used by the CLI and by [`Engine::from_env`]:
//! - `radix` (default): segment tree, static segments beat placeholders
//! - `linear`: registration-ordered scan, first registered wins
//!
//! ### `BRRT_IMPLICIT_HEAD`
//!
//! `true` (default) serves HEAD requests through GET routes when no route
//! declares HEAD for the path. The response body is dropped.
//!
//! ### `BRRT_IMPLICIT_OPTIONS`
//!
//! `true` (default) answers OPTIONS requests for known paths with `200` and
//! an `Allow` header instead of `405`.
//!
//! Unparseable values fall back to the defaults.
//!
//! ```bash
//! export BRRT_ROUTER_ENGINE=linear
//! export BRRT_IMPLICIT_OPTIONS=false
//! ```

use std::env;
use std::fmt;

/// Which bundled routing engine to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Engine {
    #[default]
    Radix,
    Linear,
}

impl Engine {
    /// Parse an engine name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radix" | "radix_tree" | "tree" => Some(Engine::Radix),
            "linear" => Some(Engine::Linear),
            _ => None,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Radix => "radix",
            Engine::Linear => "linear",
        })
    }
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub engine: Engine,
    pub implicit_head: bool,
    pub implicit_options: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Radix,
            implicit_head: true,
            implicit_options: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        RuntimeConfig {
            engine: lookup("BRRT_ROUTER_ENGINE")
                .and_then(|v| Engine::parse(&v))
                .unwrap_or(defaults.engine),
            implicit_head: lookup("BRRT_IMPLICIT_HEAD")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.implicit_head),
            implicit_options: lookup("BRRT_IMPLICIT_OPTIONS")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.implicit_options),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
