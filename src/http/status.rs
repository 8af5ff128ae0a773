//! Status registry.
//!
//! Static mapping from numeric status code to reason phrase. The table is
//! compiled in, so concurrent lookups need no synchronization.

use thiserror::Error;

/// Returned when a numeric code has no entry in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown status code: {0}")]
pub struct UnknownStatusCode(pub u16);

/// HTTP status codes known to the server.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created successfully
/// - `NoContent` (204): Successful request with no content
/// - `BadRequest` (400): Malformed request
/// - `NotFound` (404): Resource not found
/// - `MethodNotAllowed` (405): Method not supported by the resource
/// - `InternalServerError` (500): Server error
/// - `NotImplemented` (501): Method or content type not supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Every registered status, in ascending numeric order.
    pub const ALL: [StatusCode; 8] = [
        StatusCode::Ok,
        StatusCode::Created,
        StatusCode::NoContent,
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::InternalServerError,
        StatusCode::NotImplemented,
    ];

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::status::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::status::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = UnknownStatusCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        StatusCode::ALL
            .into_iter()
            .find(|status| status.as_u16() == code)
            .ok_or(UnknownStatusCode(code))
    }
}

/// Looks up the reason phrase for a numeric code.
pub fn reason_phrase(code: u16) -> Result<&'static str, UnknownStatusCode> {
    StatusCode::try_from(code).map(|status| status.reason_phrase())
}
