//! File extension to content type mapping.

/// Known extensions, lowercase and without the leading dot.
const TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
];

/// Returns the content type for a file extension.
///
/// The extension may be given with or without its leading dot and is
/// matched case-insensitively.
///
/// ```
/// # use hearth::http::mime::content_type_for;
/// assert_eq!(content_type_for("html"), Some("text/html"));
/// assert_eq!(content_type_for(".PNG"), Some("image/png"));
/// assert_eq!(content_type_for("exe"), None);
/// ```
pub fn content_type_for(extension: &str) -> Option<&'static str> {
    let extension = extension.strip_prefix('.').unwrap_or(extension);

    TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, content_type)| *content_type)
}
