//! Route tables loaded from files.
//!
//! ```yaml
//! routes:
//!   - path: /pets
//!     handler: list_pets
//!     methods: GET
//!   - path: /pets/{id}
//!     handler: pet
//!     methods: [GET, PUT]
//!     name: pet
//!     options:
//!       constraints: { id: "\\d+" }
//! ```
//!
//! The same layout works in TOML (`[[routes]]`) and JSON. The format is
//! picked by file extension.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RouteError;
use crate::method::Methods;
use crate::route::{Handler, Route, RouteOptions};
use crate::router::{RouteCollector, Router};

/// Method list of an entry: `GET:POST` / `*` shorthand or a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MethodSpec {
    Shorthand(String),
    List(Vec<String>),
}

impl MethodSpec {
    pub fn to_methods(&self) -> Result<Methods, RouteError> {
        match self {
            MethodSpec::Shorthand(s) => Methods::parse_shorthand(s),
            MethodSpec::List(list) => Methods::only(list),
        }
    }
}

/// One route in a table file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub path: String,
    /// Named handler reference, resolved by the dispatcher's registry
    pub handler: String,
    /// Absent means any method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<MethodSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "RouteOptions::is_empty")]
    pub options: RouteOptions,
}

impl RouteEntry {
    pub fn to_route(&self) -> Result<Route, RouteError> {
        let methods = match &self.methods {
            Some(spec) => spec.to_methods()?,
            None => Methods::Any,
        };
        let mut route = Route::new(&self.path, Handler::named(&self.handler), methods)?;
        if let Some(name) = &self.name {
            route = route.with_name(name.as_str());
        }
        route.set_options(self.options.clone());
        Ok(route)
    }
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Toml,
    Json,
}

impl TableFormat {
    /// Pick the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(TableFormat::Yaml),
            "toml" => Some(TableFormat::Toml),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

/// A list of route entries, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    /// Read and parse a table file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let Some(format) = TableFormat::from_path(path) else {
            bail!(
                "Unsupported route table format: {} (expected .yaml, .yml, .toml or .json)",
                path.display()
            );
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table: {}", path.display()))?;
        Self::parse(&contents, format)
            .with_context(|| format!("Failed to parse route table: {}", path.display()))
    }

    pub fn parse(contents: &str, format: TableFormat) -> anyhow::Result<Self> {
        let table = match format {
            TableFormat::Yaml => serde_yaml::from_str(contents)?,
            TableFormat::Toml => toml::from_str(contents)?,
            TableFormat::Json => serde_json::from_str(contents)?,
        };
        Ok(table)
    }

    /// Build every route, failing on the first invalid entry.
    pub fn to_routes(&self) -> Result<Vec<Route>, RouteError> {
        self.routes.iter().map(RouteEntry::to_route).collect()
    }

    /// Register every entry through `collector`, returning how many were added.
    pub fn register_into<R: Router>(&self, collector: &mut RouteCollector<R>) -> anyhow::Result<usize> {
        for (idx, entry) in self.routes.iter().enumerate() {
            entry
                .to_route()
                .and_then(|route| collector.add(route))
                .with_context(|| format!("Invalid route #{} ({})", idx + 1, entry.path))?;
        }
        Ok(self.routes.len())
    }

    /// Register every entry into a fresh engine.
    pub fn build<R: Router + Default>(&self) -> anyhow::Result<R> {
        let mut collector = RouteCollector::new(R::default());
        self.register_into(&mut collector)?;
        Ok(collector.into_router())
    }
}
