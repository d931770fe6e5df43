//! Rendering authentication failures as HTTP responses.

use axum::body::Body;
use hola::{Error, ErrorKind};
use http::{
    HeaderValue, Response, StatusCode,
    header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
};

/// HTTP status for an authentication failure.
///
/// | Kind | Status |
/// |---|---|
/// | `RequestMalformed`, `IssuerMissing`, `MalformedScopes` | 400 |
/// | `StorageFailure` | 500 |
/// | `IdentityNotFound`, `TokenInvalid`, `ScopesUnauthorized` | 401 |
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::RequestMalformed | ErrorKind::IssuerMissing | ErrorKind::MalformedScopes => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::IdentityNotFound | ErrorKind::TokenInvalid | ErrorKind::ScopesUnauthorized => {
            StatusCode::UNAUTHORIZED
        }
    }
}

/// Plain text response carrying the error message and a trailing newline.
pub fn error_response(err: &Error) -> Response<Body> {
    let mut response = Response::new(Body::from(format!("{err}\n")));
    *response.status_mut() = status_for(err.kind());
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}
