use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Engine, RouteTable};
use crate::logging::{init_logging, LogConfig, LogFormat};
use crate::method::allow_header;
use crate::result::RouteResult;
use crate::router::{LinearRouter, RadixRouter, Router};

/// Command-line interface for brrtroute
///
/// Loads a route table file and inspects it through one of the routing
/// engines.
#[derive(Parser, Debug)]
#[command(name = "brrtroute")]
#[command(about = "Inspect, match and reverse route tables", long_about = None)]
pub struct Cli {
    /// Route table file (.yaml, .yml, .toml or .json)
    #[arg(short, long, global = true, default_value = "routes.yaml")]
    pub table: PathBuf,

    /// Routing engine
    #[arg(
        long,
        value_enum,
        global = true,
        ignore_case = true,
        env = "BRRT_ROUTER_ENGINE",
        default_value_t = EngineArg::Radix
    )]
    pub engine: EngineArg,

    /// Log level for diagnostics on stderr
    #[arg(long, global = true, env = "BRRT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List registered routes in registration order
    Routes,
    /// Match a request and print the result as JSON
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /pets/42
        path: String,
    },
    /// Generate a URI for a named route
    Uri {
        /// Route name
        name: String,
        /// Substitutions as key=value pairs
        #[arg(value_parser = parse_substitution)]
        params: Vec<(String, String)>,
    },
}

/// Engine selection on the command line.
///
/// Accepts the same names as [`Engine::parse`], so `BRRT_ROUTER_ENGINE`
/// means the same thing to the binary and to [`RuntimeConfig`](crate::config::RuntimeConfig).
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    #[value(alias = "radix_tree", alias = "tree")]
    Radix,
    Linear,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Radix => Engine::Radix,
            EngineArg::Linear => Engine::Linear,
        }
    }
}

fn parse_substitution(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got `{s}`")),
    }
}

/// Parse arguments, set up logging and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig {
        log_level: cli.log_level.clone(),
        format: LogFormat::Pretty,
        ..LogConfig::from_env()
    };
    init_logging(&log_config)?;

    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli` against its route table, writing command output to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let table = RouteTable::load(&cli.table)?;
    match Engine::from(cli.engine) {
        Engine::Radix => run_with(&table.build::<RadixRouter>()?, &cli.command, out),
        Engine::Linear => run_with(&table.build::<LinearRouter>()?, &cli.command, out),
    }
}

fn run_with<R: Router>(router: &R, command: &Commands, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Routes => {
            for route in router.routes() {
                writeln!(
                    out,
                    "{:<12} {:<32} {:<24} {}",
                    route.methods(),
                    route.path(),
                    route.handler(),
                    route.name().unwrap_or("-")
                )?;
            }
        }
        Commands::Match { method, path } => {
            let result = router.match_route(method, path);
            let rendered = serde_json::to_string_pretty(&describe(&result))?;
            writeln!(out, "{rendered}")?;
        }
        Commands::Uri { name, params } => {
            let substitutions: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let uri = router
                .generate_uri(name, &substitutions)
                .with_context(|| format!("Failed to generate URI for `{name}`"))?;
            writeln!(out, "{uri}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn describe(result: &RouteResult) -> Value {
    if result.is_success() {
        let params: serde_json::Map<String, Value> = result
            .matched_params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        json!({
            "outcome": "matched",
            "route": result.matched_route_name(),
            "handler": result.matched_handler().map(ToString::to_string),
            "params": params,
        })
    } else if result.is_method_failure() {
        json!({
            "outcome": "method_not_allowed",
            "allow": allow_header(result.allowed_methods()),
        })
    } else {
        json!({ "outcome": "not_found" })
    }
}

