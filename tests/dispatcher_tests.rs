//! Tests for the dispatch boundary
//!
//! # Test Coverage
//!
//! - 404 fallback and fallback override
//! - 405 with an `Allow` header built from the router's method union
//! - implicit HEAD and OPTIONS, and turning them off
//! - named handler resolution through the registry
//! - unregistered handlers and panicking handlers answered with 500
//! - routing table replacement while the dispatcher is live

use brrtroute::{
    dispatcher::HandlerRegistry, Dispatcher, Handler, HandlerRequest, HandlerResponse,
    LinearRouter, Methods, RadixRouter, Registry, Route, RouteCollector,
};
use http::Method;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn get_pet(req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::json(200, json!({ "id": req.path_param("id"), "name": "Rex" }))
}

fn pets_router() -> RadixRouter {
    let mut routes = RouteCollector::new(RadixRouter::new());
    routes
        .add(
            Route::new("/pets/{id}", Handler::named("get_pet"), Methods::only(["GET"]).unwrap())
                .unwrap()
                .with_name("pet"),
        )
        .unwrap();
    routes
        .route(
            "/pets/{id}",
            Handler::named("delete_pet"),
            Methods::only(["DELETE"]).unwrap(),
        )
        .unwrap();
    routes
        .post(
            "/pets",
            Handler::direct(|req: &HandlerRequest| {
                HandlerResponse::json(201, req.body.clone().unwrap_or_default())
            }),
        )
        .unwrap();
    routes.into_router()
}

fn pets_dispatcher() -> Dispatcher<RadixRouter> {
    let registry = Registry::new()
        .with("get_pet", get_pet)
        .with("delete_pet", |_: &HandlerRequest| HandlerResponse::empty(204));
    Dispatcher::new(pets_router(), registry)
}

#[test]
fn test_named_handler_receives_params() {
    let dispatcher = pets_dispatcher();
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/12?verbose=1"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!({ "id": "12", "name": "Rex" }));

    let resp = dispatcher.dispatch(HandlerRequest::new(Method::DELETE, "/pets/12"));
    assert_eq!(resp.status, 204);
}

#[test]
fn test_direct_handler_receives_body() {
    let dispatcher = pets_dispatcher();
    let req = HandlerRequest::new(Method::POST, "/pets").with_body(json!({ "name": "Tom" }));
    let resp = dispatcher.dispatch(req);
    assert_eq!(resp.status, 201);
    assert_eq!(resp.body, json!({ "name": "Tom" }));
}

#[test]
fn test_route_result_is_attached() {
    let router = {
        let mut routes = RouteCollector::new(LinearRouter::new());
        routes
            .get(
                "/whoami/{user}",
                Handler::direct(|req: &HandlerRequest| {
                    let result = req.route_result().expect("route result attribute");
                    HandlerResponse::json(
                        200,
                        json!({
                            "route": result.matched_route_name(),
                            "user": result.matched_params().get("user"),
                        }),
                    )
                }),
            )
            .unwrap();
        routes.into_router()
    };
    let dispatcher = Dispatcher::new(router, ());
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/whoami/ann"));
    assert_eq!(
        resp.body,
        json!({ "route": "/whoami/{user}^GET", "user": "ann" })
    );
}

#[test]
fn test_unknown_path_is_404() {
    let dispatcher = pets_dispatcher();
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/owners"));
    assert_eq!(resp.status, 404);
    assert!(resp.get_header("Allow").is_none());
}

#[test]
fn test_fallback_override() {
    let dispatcher = pets_dispatcher().with_fallback(|req: &HandlerRequest| {
        HandlerResponse::json(418, json!({ "path": req.path }))
    });
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/teapot"));
    assert_eq!(resp.status, 418);
    assert_eq!(resp.body, json!({ "path": "/teapot" }));
}

#[test]
fn test_wrong_method_is_405_with_allow() {
    let dispatcher = pets_dispatcher();
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::PUT, "/pets/1"));
    assert_eq!(resp.status, 405);
    assert_eq!(resp.get_header("Allow"), Some("DELETE, GET"));
}

#[test]
fn test_implicit_head_and_options() {
    let dispatcher = pets_dispatcher();

    let head = dispatcher.dispatch(HandlerRequest::new(Method::HEAD, "/pets/5"));
    assert_eq!(head.status, 200);
    assert_eq!(head.body, serde_json::Value::Null);

    let options = dispatcher.dispatch(HandlerRequest::new(Method::OPTIONS, "/pets/5"));
    assert_eq!(options.status, 200);
    assert_eq!(options.get_header("Allow"), Some("DELETE, GET"));

    // No GET on /pets, so HEAD there is a plain 405.
    let head = dispatcher.dispatch(HandlerRequest::new(Method::HEAD, "/pets"));
    assert_eq!(head.status, 405);
    assert_eq!(head.get_header("Allow"), Some("POST"));
}

#[test]
fn test_implicit_methods_can_be_disabled() {
    let dispatcher = pets_dispatcher()
        .with_implicit_head(false)
        .with_implicit_options(false);

    let head = dispatcher.dispatch(HandlerRequest::new(Method::HEAD, "/pets/5"));
    assert_eq!(head.status, 405);
    let options = dispatcher.dispatch(HandlerRequest::new(Method::OPTIONS, "/pets/5"));
    assert_eq!(options.status, 405);
}

#[test]
fn test_unregistered_handler_is_500() {
    let dispatcher = Dispatcher::new(pets_router(), Registry::new());
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/1"));
    assert_eq!(resp.status, 500);
    assert_eq!(
        resp.body,
        json!({ "error": "Handler 'get_pet' is not registered" })
    );
}

#[test]
fn test_panicking_handler_is_500() {
    let registry = Registry::new()
        .with("get_pet", |_: &HandlerRequest| -> HandlerResponse {
            panic!("database on fire")
        })
        .with("delete_pet", |_: &HandlerRequest| HandlerResponse::empty(204));
    let dispatcher = Dispatcher::new(pets_router(), registry);

    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/1"));
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body, json!({ "error": "Handler panicked: database on fire" }));

    // The dispatcher keeps serving after a panic.
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::DELETE, "/pets/1"));
    assert_eq!(resp.status, 204);
}

#[test]
fn test_registry_resolves_by_name() {
    let registry = Registry::new().with("get_pet", get_pet);
    assert!(registry.resolve("get_pet").is_some());
    assert!(registry.resolve("missing").is_none());
    assert_eq!(registry.names(), ["get_pet"]);
}

#[test]
fn test_router_replaced_while_serving() {
    let dispatcher = Arc::new(pets_dispatcher());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for _ in 0..200 {
                    let status = dispatcher
                        .dispatch(HandlerRequest::new(Method::GET, "/pets/1"))
                        .status;
                    assert!(status == 200 || status == 404, "unexpected status {status}");
                }
            })
        })
        .collect();

    dispatcher.router().replace(RadixRouter::new());
    for reader in readers {
        reader.join().unwrap();
    }

    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/1"));
    assert_eq!(resp.status, 404);

    dispatcher.router().replace(pets_router());
    let resp = dispatcher.dispatch(HandlerRequest::new(Method::GET, "/pets/1"));
    assert_eq!(resp.status, 200);
}

#[test]
fn test_dispatch_from_http_request() {
    let dispatcher = pets_dispatcher();
    let req = http::Request::builder()
        .method(Method::GET)
        .uri("http://example.com/pets/77")
        .header("x-request-id", "abc")
        .body(())
        .unwrap();
    let req = HandlerRequest::from_http(&req, None);
    assert_eq!(req.get_header("X-Request-Id"), Some("abc"));

    let resp = dispatcher.dispatch(req);
    assert_eq!(resp.body["id"], "77");
}
