//! Route tables loaded from disk and fed through the dispatcher.

use brrtroute::{
    config::{Engine, RuntimeConfig},
    Dispatcher, HandlerRequest, HandlerResponse, LinearRouter, RadixRouter, Registry, RouteTable,
    Router,
};
use http::Method;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const YAML: &str = r#"
routes:
  - path: /health
    handler: health
  - path: /pets/{id}
    handler: get_pet
    methods: [GET]
    name: pet
    options:
      constraints: { id: "\\d+" }
  - path: /pets/mine
    handler: my_pets
    methods: GET
"#;

const TOML: &str = r#"
[[routes]]
path = "/health"
handler = "health"

[[routes]]
path = "/pets/{id}"
handler = "get_pet"
methods = ["GET"]
name = "pet"

[routes.options.constraints]
id = "\\d+"

[[routes]]
path = "/pets/mine"
handler = "my_pets"
methods = "GET"
"#;

fn write_table(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn assert_pet_table<R: Router>(router: &R) {
    assert_eq!(router.routes().len(), 3);
    assert!(router.match_route("BREW", "/health").is_success());
    assert_eq!(
        router.match_route("GET", "/pets/3").matched_route_name(),
        Some("pet")
    );
    // The constraint keeps /pets/mine away from the parameterised route.
    assert_eq!(
        router.match_route("GET", "/pets/mine").matched_route_name(),
        Some("/pets/mine^GET")
    );
    assert_eq!(router.generate_uri("pet", &[("id", "8")]).unwrap(), "/pets/8");
}

#[test]
fn test_yaml_table_builds_both_engines() {
    let file = write_table(".yaml", YAML);
    let table = RouteTable::load(file.path()).unwrap();
    assert_pet_table(&table.build::<RadixRouter>().unwrap());
    assert_pet_table(&table.build::<LinearRouter>().unwrap());
}

#[test]
fn test_toml_and_yaml_agree() {
    let yaml = RouteTable::load(write_table(".yml", YAML).path()).unwrap();
    let toml = RouteTable::load(write_table(".toml", TOML).path()).unwrap();
    assert_eq!(yaml, toml);
}

#[test]
fn test_json_table() {
    let file = write_table(
        ".json",
        r#"{"routes":[{"path":"/","handler":"home","methods":"GET:HEAD","name":"home"}]}"#,
    );
    let router = RouteTable::load(file.path())
        .unwrap()
        .build::<RadixRouter>()
        .unwrap();
    assert!(router.match_route("HEAD", "/").is_success());
    assert_eq!(
        router.match_route("POST", "/").allowed_methods(),
        &[Method::GET, Method::HEAD]
    );
}

#[test]
fn test_invalid_entry_names_its_position() {
    let file = write_table(
        ".yaml",
        "routes:\n  - path: /ok\n    handler: ok\n  - path: no-slash\n    handler: bad\n",
    );
    let err = RouteTable::load(file.path())
        .unwrap()
        .build::<LinearRouter>()
        .unwrap_err();
    assert!(format!("{err:#}").contains("Invalid route #2 (no-slash)"));
}

#[test]
fn test_unknown_fields_are_rejected() {
    let file = write_table(".yaml", "routes:\n  - path: /a\n    handler: a\n    verb: GET\n");
    let err = RouteTable::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse route table"));
}

#[test]
fn test_unsupported_extension() {
    let file = write_table(".ini", YAML);
    let err = RouteTable::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Unsupported route table format"));
}

#[test]
fn test_table_served_through_dispatcher() {
    let file = write_table(".yaml", YAML);
    let router = RouteTable::load(file.path())
        .unwrap()
        .build::<RadixRouter>()
        .unwrap();
    let registry = Registry::new()
        .with("health", |_: &HandlerRequest| {
            HandlerResponse::json(200, json!({ "status": "ok" }))
        })
        .with("get_pet", |req: &HandlerRequest| {
            HandlerResponse::json(200, json!({ "id": req.path_param("id") }))
        });
    let config = RuntimeConfig::from_lookup(|key| match key {
        "BRRT_ROUTER_ENGINE" => Some("radix".to_string()),
        "BRRT_IMPLICIT_OPTIONS" => Some("false".to_string()),
        _ => None,
    });
    assert_eq!(config.engine, Engine::Radix);

    let dispatcher = Dispatcher::new(router, registry).with_runtime_config(&config);

    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/5"));
    assert_eq!(resp.body, json!({ "id": "5" }));

    let resp = dispatcher.dispatch(HandlerRequest::new(Method::OPTIONS, "/pets/5"));
    assert_eq!(resp.status, 405);

    // Registered in the table but not in the registry.
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/mine"));
    assert_eq!(resp.status, 500);
}
