use crate::http::headers::Headers;
use crate::http::status::{StatusCode, UnknownStatusCode};

/// Content type used when a handler does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

const CONTENT_LENGTH: &str = "Content-Length";

/// Represents a complete HTTP response ready to be sent to a client.
///
/// `Content-Type` and `Content-Length` are seeded at construction, in that
/// order. The content cannot change afterwards, so `Content-Length` always
/// matches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    content: Vec<u8>,
}

impl Response {
    /// Creates a response for a numeric status code.
    ///
    /// Fails if `code` is not in the status registry.
    pub fn new(
        code: u16,
        content: impl Into<Vec<u8>>,
        content_type: &str,
    ) -> Result<Self, UnknownStatusCode> {
        let status = StatusCode::try_from(code)?;
        Ok(Self::with_status(status, content, content_type))
    }

    /// Creates a response for an already-validated status.
    pub fn with_status(status: StatusCode, content: impl Into<Vec<u8>>, content_type: &str) -> Self {
        let content = content.into();

        let mut headers = Headers::new();
        headers.insert("Content-Type", content_type);
        headers.insert(CONTENT_LENGTH, content.len().to_string());

        Self {
            status,
            headers,
            content,
        }
    }

    /// Adds or replaces a header.
    ///
    /// `Content-Length` belongs to the response itself; attempts to set it
    /// are ignored.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();

        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            tracing::warn!(header = %name, "Ignoring attempt to override Content-Length");
            return self;
        }

        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Creates a 200 OK response with the given body and content type.
    pub fn ok(content: impl Into<Vec<u8>>, content_type: &str) -> Self {
        Self::with_status(StatusCode::Ok, content, content_type)
    }

    /// Creates a 400 Bad Request response carrying `message`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(
            StatusCode::BadRequest,
            message.into(),
            DEFAULT_CONTENT_TYPE,
        )
    }

    /// Creates a 404 Not Found response naming the missing target.
    pub fn not_found(target: &str) -> Self {
        Self::with_status(
            StatusCode::NotFound,
            format!("Failed to find {}", target),
            DEFAULT_CONTENT_TYPE,
        )
    }

    /// Creates a 405 Method Not Allowed response with an `Allow` header.
    pub fn method_not_allowed(allow: &str) -> Self {
        let mut response = Self::with_status(
            StatusCode::MethodNotAllowed,
            "Method not allowed.",
            DEFAULT_CONTENT_TYPE,
        );
        response.add_header("Allow", allow);
        response
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_status(
            StatusCode::InternalServerError,
            message.into(),
            DEFAULT_CONTENT_TYPE,
        )
    }

    /// Creates a 501 Not Implemented response.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::with_status(
            StatusCode::NotImplemented,
            message.into(),
            DEFAULT_CONTENT_TYPE,
        )
    }
}
