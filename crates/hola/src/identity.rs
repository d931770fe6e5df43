//! Registered identities and the storage contract used to look them up.

use crate::error::BoxError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use std::sync::Arc;

/// A registered principal, keyed by the issuer claim of the tokens it signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Unique key within the store; matched against the `iss` claim.
    pub key: String,
    /// HMAC secret, or PEM encoded key material for asymmetric methods.
    pub secret: Vec<u8>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Signing method tokens for this identity must use.
    pub algorithm: Algorithm,
}

impl Identity {
    pub fn new(key: impl Into<String>, secret: impl Into<Vec<u8>>, algorithm: Algorithm) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            scopes: Vec::new(),
            algorithm,
        }
    }

    /// Replace the granted scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Key used to verify tokens signed by this identity.
    ///
    /// HMAC methods use the secret bytes directly; asymmetric methods expect
    /// the secret to hold a PEM encoded public key.
    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        match self.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Ok(DecodingKey::from_secret(&self.secret))
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(&self.secret),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(&self.secret),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(&self.secret),
        }
    }

    /// Key used to sign tokens as this identity.
    ///
    /// Asymmetric methods expect the secret to hold a PEM encoded private key.
    pub fn encoding_key(&self) -> Result<EncodingKey, jsonwebtoken::errors::Error> {
        encoding_key(self.algorithm, &self.secret)
    }
}

pub(crate) fn encoding_key(
    algorithm: Algorithm,
    secret: &[u8],
) -> Result<EncodingKey, jsonwebtoken::errors::Error> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(EncodingKey::from_secret(secret))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => EncodingKey::from_rsa_pem(secret),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(secret),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(secret),
    }
}

/// Lookup of identities by key.
///
/// `Ok(None)` means no such identity; `Err` is reserved for storage
/// failures. Implementations are called concurrently from every request.
pub trait Fetcher: Send + Sync {
    /// Fetch the identity registered under `key`.
    fn fetch(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Identity>, BoxError>> + Send;
}

impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    fn fetch(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Identity>, BoxError>> + Send {
        (**self).fetch(key)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Identity>, BoxError>> + Send {
        (**self).fetch(key)
    }
}

/// Adapter that lets a plain function act as a [`Fetcher`].
///
/// ```
/// use hola::{Algorithm, FetcherFn, Identity};
///
/// let fetcher = FetcherFn::new(|key| {
///     Ok(Some(Identity::new(key, "secret", Algorithm::HS256)))
/// });
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FetcherFn<F>(pub F);

impl<F> FetcherFn<F>
where
    F: Fn(&str) -> Result<Option<Identity>, BoxError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Fetcher for FetcherFn<F>
where
    F: Fn(&str) -> Result<Option<Identity>, BoxError> + Send + Sync,
{
    async fn fetch(&self, key: &str) -> Result<Option<Identity>, BoxError> {
        (self.0)(key)
    }
}
