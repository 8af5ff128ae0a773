use hearth::http::status::{StatusCode, UnknownStatusCode, reason_phrase};

#[test]
fn test_required_codes_registered() {
    assert_eq!(reason_phrase(200), Ok("OK"));
    assert_eq!(reason_phrase(400), Ok("Bad Request"));
    assert_eq!(reason_phrase(404), Ok("Not Found"));
    assert_eq!(reason_phrase(405), Ok("Method Not Allowed"));
    assert_eq!(reason_phrase(500), Ok("Internal Server Error"));
    assert_eq!(reason_phrase(501), Ok("Not Implemented"));
}

#[test]
fn test_unknown_code_rejected() {
    assert_eq!(reason_phrase(418), Err(UnknownStatusCode(418)));
    assert_eq!(reason_phrase(0), Err(UnknownStatusCode(0)));
    assert_eq!(StatusCode::try_from(999), Err(UnknownStatusCode(999)));
}

#[test]
fn test_try_from_matches_as_u16() {
    for status in StatusCode::ALL {
        assert_eq!(StatusCode::try_from(status.as_u16()), Ok(status));
        assert_eq!(reason_phrase(status.as_u16()), Ok(status.reason_phrase()));
    }
}

#[test]
fn test_unknown_status_message() {
    assert_eq!(UnknownStatusCode(299).to_string(), "unknown status code: 299");
}
