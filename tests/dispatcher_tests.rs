//! Full router -> dispatcher -> handler flow with coroutine handlers.

mod common;

use http::Method;
use serde_json::json;
use waypost::dispatcher::{Dispatcher, HeaderVec};
use waypost::echo::echo_handler;
use waypost::router::{RouteDecision, RouteMatch, Router};

fn match_route(router: &Router, method: Method, path: &str) -> RouteMatch {
    match router.route(method.clone(), path) {
        RouteDecision::Match(m) => m,
        other => panic!("expected match for {method} {path}, got {other:?}"),
    }
}

fn setup(method: Method, template: &str) -> (Router, Dispatcher, String) {
    common::init_runtime();
    let mut router = Router::new();
    let route = router
        .register(method, template)
        .expect("valid template")
        .expect("fresh route");
    (router, Dispatcher::new(), route.handler_name.clone())
}

#[test]
fn test_dispatch_binds_path_params() {
    let (router, mut dispatcher, name) = setup(Method::GET, "/items/{id:number}");
    unsafe {
        dispatcher.register_handler(&name, |req, res| {
            assert_eq!(req.path_param("id"), "42");
            // Absent names read as the empty string.
            assert_eq!(req.path_param("missing"), "");
            res.send(200, "ok");
        });
    }

    let m = match_route(&router, Method::GET, "/items/42");
    let reply = dispatcher
        .dispatch(m, None, HeaderVec::new())
        .expect("handler reply");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!("ok"));
}

#[test]
fn test_query_params_first_value_wins() {
    let (router, mut dispatcher, name) = setup(Method::GET, "/search");
    unsafe {
        dispatcher.register_handler(&name, |req, res| {
            assert_eq!(req.query_param("q"), "rust");
            assert_eq!(req.query_param("page"), "1");
            assert_eq!(req.query_param("absent"), "");
            res.send(200, "ok");
        });
    }

    let mut m = match_route(&router, Method::GET, "/search");
    m.query_params = waypost::server::parse_query_params("/search?q=rust&page=1&page=2");
    let reply = dispatcher
        .dispatch(m, None, HeaderVec::new())
        .expect("handler reply");
    assert_eq!(reply.status, 200);
}

#[test]
fn test_send_writes_status_and_body_verbatim() {
    let (router, mut dispatcher, name) = setup(Method::GET, "/tea");
    unsafe {
        dispatcher.register_handler(&name, |_req, res| {
            res.send(201, "created exactly this");
        });
    }

    let m = match_route(&router, Method::GET, "/tea");
    let reply = dispatcher
        .dispatch(m, None, HeaderVec::new())
        .expect("handler reply");
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body, json!("created exactly this"));
}

#[test]
fn test_send_json_round_trips_a_mapping() {
    let (router, mut dispatcher, name) = setup(Method::GET, "/pets/{id}");
    unsafe {
        dispatcher.register_handler(&name, |req, res| {
            let payload = json!({ "id": req.path_param("id"), "species": "cat" });
            res.send_json(200, &payload).expect("serializable payload");
        });
    }

    let m = match_route(&router, Method::GET, "/pets/felix");
    let reply = dispatcher
        .dispatch(m, None, HeaderVec::new())
        .expect("handler reply");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!({ "id": "felix", "species": "cat" }));
}

#[test]
fn test_echo_handler_reports_bound_request() {
    let (router, mut dispatcher, name) = setup(Method::POST, "/users/{user_id}/posts/{post_id:number}");
    unsafe {
        dispatcher.register_handler(&name, echo_handler);
    }

    let m = match_route(&router, Method::POST, "/users/ada/posts/7");
    let reply = dispatcher
        .dispatch(m, Some(json!({"title": "hi"})), HeaderVec::new())
        .expect("handler reply");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["method"], json!("POST"));
    assert_eq!(reply.body["path"], json!("/users/ada/posts/7"));
    assert_eq!(reply.body["params"]["user_id"], json!("ada"));
    assert_eq!(reply.body["params"]["post_id"], json!("7"));
    assert_eq!(reply.body["body"]["title"], json!("hi"));
}

#[test]
fn test_dispatch_without_registered_handler_is_none() {
    common::init_runtime();
    let mut router = Router::new();
    router
        .register(Method::GET, "/orphan")
        .expect("valid template");
    let dispatcher = Dispatcher::new();

    let m = match_route(&router, Method::GET, "/orphan");
    assert!(dispatcher.dispatch(m, None, HeaderVec::new()).is_none());
}

// May coroutines don't play well with catch_unwind in the test harness;
// the recovery path is exercised end-to-end in server_tests instead.
#[test]
#[ignore]
fn test_panicking_handler_returns_500() {
    let (router, mut dispatcher, name) = setup(Method::GET, "/boom");
    unsafe {
        dispatcher.register_handler(&name, |_req, _res| {
            panic!("handler exploded");
        });
    }

    let m = match_route(&router, Method::GET, "/boom");
    let reply = dispatcher
        .dispatch(m, None, HeaderVec::new())
        .expect("panic reply");
    assert_eq!(reply.status, 500);

    // The worker loop survives the panic.
    let m = match_route(&router, Method::GET, "/boom");
    assert!(dispatcher.dispatch(m, None, HeaderVec::new()).is_some());
}
