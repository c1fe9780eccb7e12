//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands, EngineArg};
use crate::config::Engine;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE: &str = r#"
routes:
  - path: /users/{id}
    handler: get_user
    methods: GET
    name: user
  - path: /users/new
    handler: new_user
    methods: GET
"#;

fn table_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(TABLE.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from(["brrtroute", "--table", "r.toml", "match", "GET", "/a"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Match {
            method: "GET".into(),
            path: "/a".into()
        }
    );
    assert_eq!(cli.table.to_string_lossy(), "r.toml");
}

#[test]
fn test_uri_params_must_be_pairs() {
    let cli = Cli::try_parse_from(["brrtroute", "uri", "user", "id=1", "tab=a=b"]).unwrap();
    match cli.command {
        Commands::Uri { name, params } => {
            assert_eq!(name, "user");
            assert_eq!(
                params,
                [("id".to_string(), "1".to_string()), ("tab".to_string(), "a=b".to_string())]
            );
        }
        other => panic!("Expected Uri command, got {other:?}"),
    }
    assert!(Cli::try_parse_from(["brrtroute", "uri", "user", "id"]).is_err());
}

#[test]
fn test_engine_flag() {
    let cli = Cli::try_parse_from(["brrtroute", "--engine", "linear", "routes"]).unwrap();
    assert_eq!(cli.engine, EngineArg::Linear);
    assert!(Cli::try_parse_from(["brrtroute", "--engine", "fast", "routes"]).is_err());
}

#[test]
fn test_engine_flag_accepts_runtime_config_names() {
    for name in ["radix", "RADIX", "radix_tree", "Radix_Tree", "tree", "linear", "Linear"] {
        let cli = Cli::try_parse_from(["brrtroute", "--engine", name, "routes"])
            .unwrap_or_else(|e| panic!("`{name}` rejected: {e}"));
        assert_eq!(Some(Engine::from(cli.engine)), Engine::parse(name), "engine name `{name}`");
    }
}

#[test]
fn test_routes_output() {
    let file = table_file();
    let path = file.path().to_str().unwrap();
    let out = run(&["brrtroute", "--table", path, "routes"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("/users/{id}") && lines[0].contains("user"));
    assert!(lines[1].contains("new_user"));
}

#[test]
fn test_match_output_depends_on_engine() {
    let file = table_file();
    let path = file.path().to_str().unwrap();

    let radix = run(&["brrtroute", "-t", path, "--engine", "radix", "match", "GET", "/users/new"]).unwrap();
    let radix: serde_json::Value = serde_json::from_str(&radix).unwrap();
    assert_eq!(radix["outcome"], "matched");
    assert_eq!(radix["handler"], "new_user");

    let linear = run(&["brrtroute", "-t", path, "--engine", "linear", "match", "GET", "/users/new"]).unwrap();
    let linear: serde_json::Value = serde_json::from_str(&linear).unwrap();
    assert_eq!(linear["route"], "user");
    assert_eq!(linear["params"]["id"], "new");

    let miss = run(&["brrtroute", "-t", path, "match", "POST", "/users/1"]).unwrap();
    let miss: serde_json::Value = serde_json::from_str(&miss).unwrap();
    assert_eq!(miss["outcome"], "method_not_allowed");
    assert_eq!(miss["allow"], "GET");
}

#[test]
fn test_uri_output() {
    let file = table_file();
    let path = file.path().to_str().unwrap();
    let out = run(&["brrtroute", "-t", path, "uri", "user", "id=a b"]).unwrap();
    assert_eq!(out.trim(), "/users/a%20b");

    let err = run(&["brrtroute", "-t", path, "uri", "nobody"]).unwrap_err();
    assert!(err.to_string().contains("nobody"));
}

#[test]
fn test_missing_table_is_an_error() {
    let err = run(&["brrtroute", "-t", "/definitely/not/here.yaml", "routes"]).unwrap_err();
    assert!(err.to_string().contains("Failed to read route table"));
}
