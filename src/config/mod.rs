//! Configuration: route tables read from files and runtime settings read
//! from the environment.

mod route_table;
mod runtime;

pub use route_table::{MethodSpec, RouteEntry, RouteTable, TableFormat};
pub use runtime::{Engine, RuntimeConfig};
