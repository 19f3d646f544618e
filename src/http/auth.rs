//! HTTP Basic authentication module
//!
//! Parses `Authorization: Basic <base64>` headers and checks the decoded
//! credentials against the configured pair. Every parsing failure — missing
//! header, wrong scheme, malformed base64, missing colon, non-UTF-8 payload —
//! is treated as an authentication failure, not a server error.

use base64::Engine;

/// Decode a Basic authorization header into `(username, password)`.
///
/// Returns `None` for anything that is not a well-formed Basic credential.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let payload = header.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Check an optional Authorization header against the expected credentials.
pub fn check_basic_auth(header: Option<&str>, username: &str, password: &str) -> bool {
    header
        .and_then(parse_basic_credentials)
        .is_some_and(|(user, pass)| user == username && pass == password)
}
