use hearth::http::response::{DEFAULT_CONTENT_TYPE, Response};
use hearth::http::status::{StatusCode, UnknownStatusCode};

#[test]
fn test_response_new_with_registered_code() {
    let response = Response::new(200, "Hello, World!", "text/plain").unwrap();

    assert_eq!(response.status(), StatusCode::Ok);
    assert_eq!(response.content(), b"Hello, World!");
}

#[test]
fn test_response_new_unknown_code_fails() {
    let result = Response::new(299, "nope", DEFAULT_CONTENT_TYPE);

    assert_eq!(result.unwrap_err(), UnknownStatusCode(299));
}

#[test]
fn test_response_seeded_headers_in_order() {
    let response = Response::new(404, "missing", "text/plain").unwrap();

    let headers: Vec<_> = response.headers().iter().collect();
    assert_eq!(
        headers,
        vec![("Content-Type", "text/plain"), ("Content-Length", "7")]
    );
}

#[test]
fn test_response_content_length_counts_bytes() {
    let response = Response::ok("héllo", "text/plain");

    assert_eq!(response.header("Content-Length"), Some("6"));
}

#[test]
fn test_response_empty_content() {
    let response = Response::with_status(StatusCode::NoContent, Vec::new(), DEFAULT_CONTENT_TYPE);

    assert!(response.content().is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_add_header_appends_and_replaces() {
    let mut response = Response::ok("{}", "application/json");
    response
        .add_header("Cache-Control", "no-cache")
        .add_header("X-Frame-Options", "DENY")
        .add_header("Cache-Control", "no-store");

    let names: Vec<_> = response.headers().iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["Content-Type", "Content-Length", "Cache-Control", "X-Frame-Options"]
    );
    assert_eq!(response.header("Cache-Control"), Some("no-store"));
}

#[test]
fn test_add_header_replaces_content_type() {
    let mut response = Response::ok("body", DEFAULT_CONTENT_TYPE);
    response.add_header("Content-Type", "text/plain");

    assert_eq!(response.header("Content-Type"), Some("text/plain"));
}

#[test]
fn test_add_header_cannot_override_content_length() {
    let mut response = Response::ok("test", DEFAULT_CONTENT_TYPE);
    response.add_header("Content-Length", "999");
    response.add_header("content-length", "999");

    assert_eq!(response.header("Content-Length"), Some("4"));
    assert_eq!(response.headers().len(), 2);
}

#[test]
fn test_response_helpers() {
    let cases = [
        (Response::bad_request("bad"), StatusCode::BadRequest),
        (Response::not_found("/x"), StatusCode::NotFound),
        (Response::method_not_allowed("GET"), StatusCode::MethodNotAllowed),
        (Response::internal_error("oops"), StatusCode::InternalServerError),
        (Response::not_implemented("later"), StatusCode::NotImplemented),
    ];

    for (response, status) in cases {
        assert_eq!(response.status(), status);
        assert_eq!(response.header("Content-Type"), Some(DEFAULT_CONTENT_TYPE));
    }
}

#[test]
fn test_not_found_names_target() {
    let response = Response::not_found("/missing.html");

    assert_eq!(response.content(), b"Failed to find /missing.html");
}

#[test]
fn test_method_not_allowed_sets_allow() {
    let response = Response::method_not_allowed("GET, POST");

    assert_eq!(response.header("Allow"), Some("GET, POST"));
}
