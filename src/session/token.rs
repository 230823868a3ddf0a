use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

use crate::time::current_timestamp_millis;

/// The only claim we read from a bearer token.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: f64,
}

/// Reports whether `token` still has an `exp` claim in the future.
///
/// The token must have the `header.payload.signature` shape, with a base64
/// JSON payload. The signature is not checked, the server does that. Any
/// malformed input is treated as an expired token.
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, current_timestamp_millis())
}

pub fn is_token_valid_at(token: &str, now_millis: i64) -> bool {
    match decode_expiry(token) {
        Some(exp) => (now_millis as f64) < exp * 1000.0,
        None => false,
    }
}

/// Returns the `exp` claim of the token, in seconds since epoch.
pub fn decode_expiry(token: &str) -> Option<f64> {
    if token.is_empty() {
        return None;
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = segments[1].trim_end_matches('=');
    if payload.is_empty() {
        return None;
    }
    let data = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;

    let claims: Claims = serde_json::from_slice(&data).ok()?;
    if !claims.exp.is_finite() {
        return None;
    }
    Some(claims.exp)
}
