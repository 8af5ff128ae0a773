use thiserror::Error;

use crate::http::headers::Headers;
use crate::http::request::{Method, Request};

/// Reasons a framed message cannot become a [`Request`].
///
/// Each one is answered with 400 Bad Request, using the `Display` text as
/// the response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("unknown method: {0:?}")]
    UnknownMethod(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),
    #[error("missing blank line after headers")]
    MissingHeaderTerminator,
}

/// Parses one complete client message.
///
/// `buf` is expected to hold the whole message as delimited by the framer.
/// Lines end in `\n` or `\r\n`. Everything after the first blank line is
/// the body.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;
    let mut lines = text.lines();

    // Request line
    let request_line = lines
        .next()
        .ok_or_else(|| ParseError::MalformedRequestLine(String::new()))?;
    let (method, target, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = Headers::new();
    let mut terminated = false;

    for line in lines.by_ref() {
        if line.is_empty() {
            terminated = true;
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;

        headers.insert(name, value.trim());
    }

    if !terminated {
        return Err(ParseError::MissingHeaderTerminator);
    }

    // Body
    let body = lines.fold(String::new(), |mut body, line| {
        body.push_str(line);
        body.push('\n');
        body
    });

    Ok(Request::from_parts(
        method,
        target.to_string(),
        version.to_string(),
        headers,
        body,
    ))
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let parts: Vec<&str> = line.trim().split(' ').collect();

    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    let method =
        Method::parse(method).ok_or_else(|| ParseError::UnknownMethod(method.to_string()))?;

    Ok((method, target, version))
}
