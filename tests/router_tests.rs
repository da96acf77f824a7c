//! Route table behavior: registration, duplicate rejection, and the
//! match/404/405 decision.

use http::Method;
use waypost::router::{compile, PatternError, RouteDecision, Router};

fn registered(router: &mut Router, method: Method, template: &str) -> bool {
    router
        .register(method, template)
        .expect("valid template")
        .is_some()
}

#[test]
fn test_register_twice_rejects_second() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/pets/{id:number}"));
    assert!(!registered(&mut router, Method::GET, "/pets/{id:number}"));
    assert_eq!(router.len(), 1);
}

#[test]
fn test_two_methods_on_same_template_are_independent() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/pets"));
    assert!(registered(&mut router, Method::POST, "/pets"));

    for method in [Method::GET, Method::POST] {
        match router.route(method.clone(), "/pets") {
            RouteDecision::Match(m) => assert_eq!(m.route.method, method),
            other => panic!("expected match for {method}, got {other:?}"),
        }
    }
}

#[test]
fn test_decision_matrix_for_typed_capture() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/items/{id:number}"));

    match router.route(Method::GET, "/items/42") {
        RouteDecision::Match(m) => {
            assert_eq!(m.path, "/items/42");
            assert_eq!(m.path_params.len(), 1);
            assert_eq!(m.path_params[0].0.as_ref(), "id");
            assert_eq!(m.path_params[0].1, "42");
        }
        other => panic!("expected match, got {other:?}"),
    }
    // "abc" fails the number class, so the path itself never matches.
    assert!(matches!(
        router.route(Method::GET, "/items/abc"),
        RouteDecision::NotFound
    ));
    assert!(matches!(
        router.route(Method::POST, "/items/42"),
        RouteDecision::MethodNotAllowed
    ));
}

#[test]
fn test_string_capture_rejects_punctuation() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/files/{name:string}"));

    assert!(matches!(
        router.route(Method::GET, "/files/report_2"),
        RouteDecision::Match(_)
    ));
    for path in ["/files/report.txt", "/files/a/b", "/files/a-b"] {
        assert!(
            matches!(router.route(Method::GET, path), RouteDecision::NotFound),
            "{path} should not match the string class"
        );
    }
}

#[test]
fn test_compiling_same_template_twice_is_deterministic() {
    let a = compile("/users/{user_id}/posts/{post_id:number}").expect("compile");
    let b = compile("/users/{user_id}/posts/{post_id:number}").expect("compile");
    assert_eq!(a.canonical(), b.canonical());
    for path in [
        "/users/ada/posts/7",
        "/users/ada/posts/x",
        "/users/ada/posts",
    ] {
        assert_eq!(a.captures(path), b.captures(path));
    }
}

#[test]
fn test_method_comparison_is_case_sensitive() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/pets"));

    let lowercase = Method::from_bytes(b"get").expect("extension method");
    assert!(matches!(
        router.route(lowercase, "/pets"),
        RouteDecision::MethodNotAllowed
    ));
}

#[test]
fn test_malformed_templates_are_rejected_loudly() {
    let mut router = Router::new();
    for (template, want) in [
        ("/a/{", "UnbalancedBrace"),
        ("/a/{}", "EmptyCaptureName"),
        ("/a/{x:uuid}", "UnknownCaptureKind"),
        ("/a/{x}/{x}", "DuplicateCaptureName"),
    ] {
        let err = router
            .register(Method::GET, template)
            .expect_err("malformed template must fail");
        let matches_variant = match want {
            "UnbalancedBrace" => matches!(err, PatternError::UnbalancedBrace { .. }),
            "EmptyCaptureName" => matches!(err, PatternError::EmptyCaptureName { .. }),
            "UnknownCaptureKind" => matches!(err, PatternError::UnknownCaptureKind { .. }),
            "DuplicateCaptureName" => matches!(err, PatternError::DuplicateCaptureName { .. }),
            _ => unreachable!(),
        };
        assert!(matches_variant, "{template} raised {err}");
    }
    assert!(router.is_empty());
}

#[test]
fn test_anchoring_rejects_prefix_and_suffix_paths() {
    let mut router = Router::new();
    assert!(registered(&mut router, Method::GET, "/pets/{id:number}"));

    for path in ["/pets/42/toys", "/v1/pets/42", "/pets/"] {
        assert!(
            matches!(router.route(Method::GET, path), RouteDecision::NotFound),
            "{path} should not match an anchored pattern"
        );
    }
}
