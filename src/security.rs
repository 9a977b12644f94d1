use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Header carrying the admin API key.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison to prevent timing attacks on the
/// admin key.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check the admin API key on a request. Missing or non-ASCII header
/// values fail closed.
pub fn verify_admin_key(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| constant_time_compare(value, expected))
        .unwrap_or(false)
}
