//! Authentication error types.
//!
//! [`Error`] is the single failure type of token validation. Each variant maps
//! to one [`ErrorKind`], which is what transports branch on when rendering a
//! response. The specific reason a verified token was rejected is kept in
//! [`InvalidToken`] so callers can tell a bad signature apart from an expired
//! token without matching on strings.

use thiserror::Error;

/// Boxed error returned by identity storage implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No token, or a token that cannot be decoded.
    RequestMalformed,
    /// The token carries no issuer claim.
    IssuerMissing,
    /// The identity store failed.
    StorageFailure,
    /// No identity is registered for the issuer.
    IdentityNotFound,
    /// Signature or standard claim verification failed.
    TokenInvalid,
    /// The scopes claim has the wrong shape.
    MalformedScopes,
    /// At least one requested scope is not granted.
    ScopesUnauthorized,
}

/// Authentication and authorization errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The request did not carry a bearer token.
    #[error("no token present in request")]
    TokenMissing,

    /// The token could not be decoded.
    #[error("token is malformed: {0}")]
    TokenMalformed(#[source] jsonwebtoken::errors::Error),

    /// The `iss` claim is absent or empty.
    #[error("ISS claim is missing")]
    IssuerMissing,

    /// The identity store returned an error.
    #[error("error fetching identity from storage: {0}")]
    StorageFailure(#[source] BoxError),

    /// The identity store has no identity for the issuer.
    #[error("identity cannot be located for ISS claim {0:?}")]
    IdentityNotFound(String),

    /// The token failed verification.
    #[error("token is invalid: {0}")]
    TokenInvalid(#[from] InvalidToken),

    /// The scopes claim, or one of its entries, is not of the expected type.
    #[error("scopes in unexpected format {0}")]
    MalformedScopes(serde_json::Value),

    /// Requested scopes the identity has not been granted, in request order.
    #[error("scopes not supported {0:?}")]
    ScopesUnauthorized(Vec<String>),
}

impl Error {
    /// The discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TokenMissing | Error::TokenMalformed(_) => ErrorKind::RequestMalformed,
            Error::IssuerMissing => ErrorKind::IssuerMissing,
            Error::StorageFailure(_) => ErrorKind::StorageFailure,
            Error::IdentityNotFound(_) => ErrorKind::IdentityNotFound,
            Error::TokenInvalid(_) => ErrorKind::TokenInvalid,
            Error::MalformedScopes(_) => ErrorKind::MalformedScopes,
            Error::ScopesUnauthorized(_) => ErrorKind::ScopesUnauthorized,
        }
    }

    /// The verification failure, if this is a [`Error::TokenInvalid`].
    pub fn invalid_token(&self) -> Option<&InvalidToken> {
        match self {
            Error::TokenInvalid(cause) => Some(cause),
            _ => None,
        }
    }

    /// Whether the token was rejected because its signature did not verify.
    pub fn is_signature_invalid(&self) -> bool {
        matches!(self.invalid_token(), Some(InvalidToken::Signature))
    }
}

/// Reasons a decodable token fails verification.
#[derive(Debug, Error)]
pub enum InvalidToken {
    /// Signature verification failed.
    #[error("signature is invalid")]
    Signature,

    /// The `exp` claim is in the past.
    #[error("token has expired")]
    Expired,

    /// The `nbf` claim is in the future.
    #[error("token is not valid yet")]
    NotYetValid,

    /// The `sub` claim is absent or does not match the required subject.
    #[error("subject does not match")]
    Subject,

    /// The `aud` claim is absent or does not match the required audience.
    #[error("audience does not match")]
    Audience,

    /// The token's algorithm is not the identity's signing method.
    #[error("algorithm does not match the identity's signing method")]
    Algorithm,

    /// A claim required for verification is absent.
    #[error("missing required claim: {0}")]
    MissingClaim(String),

    /// The identity's key material could not be used.
    #[error("identity key is unusable: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),

    /// Any other verification failure.
    #[error("{0}")]
    Other(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for InvalidToken {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => InvalidToken::Signature,
            ErrorKind::ExpiredSignature => InvalidToken::Expired,
            ErrorKind::ImmatureSignature => InvalidToken::NotYetValid,
            ErrorKind::InvalidSubject => InvalidToken::Subject,
            ErrorKind::InvalidAudience => InvalidToken::Audience,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => InvalidToken::Subject,
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => InvalidToken::Audience,
            ErrorKind::InvalidAlgorithm => InvalidToken::Algorithm,
            ErrorKind::MissingRequiredClaim(claim) => InvalidToken::MissingClaim(claim.clone()),
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidAlgorithmName => InvalidToken::Key(err),
            _ => InvalidToken::Other(err),
        }
    }
}
