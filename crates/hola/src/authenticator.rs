//! Token validation against registered identities.
//!
//! ```rust,ignore
//! use hola::{Authenticator, AuthenticatorConfig};
//!
//! let authenticator = Authenticator::new(store, AuthenticatorConfig {
//!     audience: Some("api.example.com".into()),
//!     ..Default::default()
//! });
//!
//! let scopes = authenticator.validate(token).await?;
//! ```

use crate::{
    claims::Claims,
    clock::{Clock, SystemClock},
    error::{Error, InvalidToken},
    identity::{Fetcher, Identity},
    scope,
};
use jsonwebtoken::{DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{sync::Arc, time::Duration};

/// Default name of the claim carrying requested scopes.
pub const DEFAULT_SCOPES_CLAIM: &str = "scopes";

/// Validation settings for an [`Authenticator`].
#[derive(Clone, Debug)]
pub struct AuthenticatorConfig {
    /// Tolerance applied to the `exp` claim.
    pub expiration_leeway: Duration,
    /// Tolerance applied to the `nbf` claim.
    pub not_before_leeway: Duration,
    /// Required `sub` claim. Unchecked when `None`.
    pub subject: Option<String>,
    /// Required `aud` claim. Unchecked when `None`.
    pub audience: Option<String>,
    /// Name of the claim carrying requested scopes.
    pub scopes_claim: String,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            expiration_leeway: Duration::from_secs(1),
            not_before_leeway: Duration::from_secs(1),
            subject: None,
            audience: None,
            scopes_claim: DEFAULT_SCOPES_CLAIM.into(),
        }
    }
}

struct AuthenticatorInner<F> {
    fetcher: F,
    config: AuthenticatorConfig,
    clock: Arc<dyn Clock>,
}

/// Validates tokens and authorizes the scopes they request.
///
/// Holds no per-request state; clones share the same fetcher and settings.
pub struct Authenticator<F> {
    inner: Arc<AuthenticatorInner<F>>,
}

impl<F> Clone for Authenticator<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<F: Fetcher> Authenticator<F> {
    pub fn new(fetcher: F, config: AuthenticatorConfig) -> Self {
        Self::with_clock(fetcher, config, SystemClock)
    }

    /// Build an authenticator that checks token times against `clock`.
    pub fn with_clock(fetcher: F, config: AuthenticatorConfig, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Arc::new(AuthenticatorInner {
                fetcher,
                config,
                clock: Arc::new(clock),
            }),
        }
    }

    pub fn config(&self) -> &AuthenticatorConfig {
        &self.inner.config
    }

    /// Validate `token` and return the scopes it is authorized for.
    ///
    /// Steps, stopping at the first failure:
    /// 1. Decode the claims and read the issuer
    /// 2. Fetch the issuer's identity
    /// 3. Verify the signature with the identity's key and method, then the
    ///    time, subject and audience claims
    /// 4. Authorize the requested scopes against the identity's grants
    ///
    /// A token without the scopes claim is valid and authorizes nothing. A
    /// single ungranted scope fails the whole token.
    #[tracing::instrument(skip_all)]
    pub async fn validate(&self, token: &str) -> Result<Vec<String>, Error> {
        let result = self.authenticate(token).await;
        match &result {
            Ok(scopes) => tracing::trace!(?scopes, "token validated"),
            Err(Error::StorageFailure(err)) => {
                tracing::warn!(error = %err, "identity storage failed")
            }
            Err(err) => tracing::debug!(error = %err, "token rejected"),
        }
        result
    }

    async fn authenticate(&self, token: &str) -> Result<Vec<String>, Error> {
        let unverified = peek_claims(token)?;
        let issuer = unverified
            .get("iss")
            .and_then(Value::as_str)
            .filter(|iss| !iss.is_empty())
            .ok_or(Error::IssuerMissing)?;

        let identity = self
            .inner
            .fetcher
            .fetch(issuer)
            .await
            .map_err(Error::StorageFailure)?
            .ok_or_else(|| Error::IdentityNotFound(issuer.to_string()))?;

        let claims = self.verify(token, &identity)?;

        let Some(requested) = claims.custom(&self.inner.config.scopes_claim) else {
            return Ok(Vec::new());
        };
        let Value::Array(requested) = requested else {
            return Err(Error::MalformedScopes(requested.clone()));
        };

        let authorization = scope::authorize(requested, &identity.scopes)?;
        if !authorization.is_complete() {
            return Err(Error::ScopesUnauthorized(authorization.unauthorized));
        }

        Ok(authorization.authorized)
    }

    /// Check the signature and registered claims of `token`.
    fn verify(&self, token: &str, identity: &Identity) -> Result<Claims, InvalidToken> {
        let config = &self.inner.config;
        let key = identity.decoding_key().map_err(InvalidToken::Key)?;

        let mut validation = Validation::new(identity.algorithm);
        validation.required_spec_claims.clear();
        // exp and nbf are checked below with separate leeways.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.sub = config.subject.clone();
        if config.subject.is_some() {
            validation.required_spec_claims.insert("sub".into());
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".into());
            }
            None => validation.validate_aud = false,
        }

        let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation)?.claims;

        let now = self.inner.clock.now().timestamp();
        if let Some(exp) = claims.exp
            && now > exp.saturating_add(seconds(config.expiration_leeway))
        {
            return Err(InvalidToken::Expired);
        }
        if let Some(nbf) = claims.nbf
            && nbf > now.saturating_add(seconds(config.not_before_leeway))
        {
            return Err(InvalidToken::NotYetValid);
        }

        Ok(claims)
    }
}

/// Decode the claims without verifying the signature or typing them.
///
/// Only used to find out which identity to verify against, so nothing but
/// `iss` is interpreted here.
fn peek_claims(token: &str) -> Result<Map<String, Value>, Error> {
    let header = jsonwebtoken::decode_header(token).map_err(Error::TokenMalformed)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;

    jsonwebtoken::decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(Error::TokenMalformed)
}

fn seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
