//! Standard request headers and header merging.

use crate::auth::AccessToken;

/// SDK identification sent with every request.
pub const SDK_IDENTIFIER: &str = concat!("sumup-rust/v", env!("CARGO_PKG_VERSION"));

/// Headers sent with every API request.
pub fn standard_headers() -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
        ("X-SDK".to_string(), SDK_IDENTIFIER.to_string()),
        ("User-Agent".to_string(), SDK_IDENTIFIER.to_string()),
    ]
}

/// `Authorization` header carrying the bearer token.
pub fn auth_header(token: &AccessToken) -> (String, String) {
    ("Authorization".to_string(), token.bearer())
}

/// Merges request headers with the configured custom headers.
///
/// Names compare case-insensitively. A later header replaces an earlier one
/// with the same name, and custom headers come last, so they win.
pub fn merge_headers(
    request: &[(String, String)],
    custom: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(request.len() + custom.len());

    for (name, value) in request.iter().chain(custom) {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }

    merged
}
