//! Bearer token extraction.
//!
//! The token is read from `Authorization: Bearer <token>`. The scheme is
//! matched case-insensitively, so `BEARER <token>` is accepted too.

use hola::Error;
use http::{HeaderMap, header::AUTHORIZATION};

const SCHEME: &str = "bearer";

/// The bearer token of a request.
///
/// Fails with [`Error::TokenMissing`] when the header is absent, not valid
/// text, uses another scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::TokenMissing)?;

    let (scheme, token) = value.split_once(' ').ok_or(Error::TokenMissing)?;
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(Error::TokenMissing);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::TokenMissing);
    }
    Ok(token)
}
