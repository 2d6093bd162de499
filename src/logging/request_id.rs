//! Request correlation IDs

use axum::http::HeaderMap;
use uuid::Uuid;

/// Request and response header carrying the correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound ID accepted verbatim.
const MAX_INBOUND_LEN: usize = 128;

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use symcheck::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert_eq!(request_id.len(), 36);
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Correlation ID for an incoming request.
///
/// A caller-supplied `x-request-id` is kept when it is at most 128 characters
/// of `[A-Za-z0-9_-]`, so a gateway's ID shows up in our logs unchanged.
/// Anything else is replaced by a fresh UUID.
pub fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| is_safe_id(id))
        .map(str::to_string)
        .unwrap_or_else(generate_request_id)
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_INBOUND_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
