//! Token issuing.
//!
//! A [`Signer`] produces tokens in the claim shape the
//! [`Authenticator`](crate::Authenticator) consumes: set the claim key to the
//! authenticator's scopes claim and sign a list of scopes to request them.

use crate::{
    claims::Claims,
    clock::{Clock, IdGenerator, SystemClock, UuidV4},
    identity::encoding_key,
};
use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

/// Default name of the claim carrying the signed payload.
pub const DEFAULT_DATA_CLAIM: &str = "data";

/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Errors from token signing.
#[derive(Error, Debug)]
pub enum SignError {
    /// The secret is not usable with the signing method.
    #[error("invalid signing key: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),
    /// The payload could not be serialized.
    #[error("payload is not serializable: {0}")]
    Payload(#[from] serde_json::Error),
    /// The ttl does not fit in a timestamp.
    #[error("ttl out of range: {0:?}")]
    Ttl(Duration),
    /// Encoding or signing the token failed.
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Settings for a [`Signer`].
#[derive(Clone, Debug)]
pub struct SignerConfig {
    /// Signing method.
    pub algorithm: Algorithm,
    /// Claim the payload is stored under.
    pub claim_key: String,
    /// Lifetime of issued tokens.
    pub ttl: Duration,
    /// Fixed `sub` claim.
    pub subject: Option<String>,
    /// Fixed `iss` claim.
    pub issuer: Option<String>,
}

impl SignerConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            claim_key: DEFAULT_DATA_CLAIM.into(),
            ttl: DEFAULT_TTL,
            subject: None,
            issuer: None,
        }
    }
}

/// Issues signed tokens.
#[derive(Clone)]
pub struct Signer {
    config: SignerConfig,
    key: EncodingKey,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Signer {
    /// Build a signer for `secret`, which is the HMAC secret or a PEM encoded
    /// private key depending on the configured algorithm.
    pub fn new(config: SignerConfig, secret: &[u8]) -> Result<Self, SignError> {
        let key = encoding_key(config.algorithm, secret).map_err(SignError::Key)?;
        Ok(Self {
            config,
            key,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV4),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// The claims [`Signer::sign`] would issue for `payload` right now.
    pub fn claims<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Claims, SignError> {
        let now = self.clock.now();
        let ttl = TimeDelta::from_std(self.config.ttl).map_err(|_| SignError::Ttl(self.config.ttl))?;
        let exp = now
            .checked_add_signed(ttl)
            .ok_or(SignError::Ttl(self.config.ttl))?;

        let mut claims = Claims {
            iss: self.config.issuer.clone(),
            sub: self.config.subject.clone(),
            iat: Some(now.timestamp()),
            exp: Some(exp.timestamp()),
            jti: Some(self.ids.generate()),
            ..Default::default()
        };
        claims
            .custom
            .insert(self.config.claim_key.clone(), serde_json::to_value(payload)?);
        Ok(claims)
    }

    /// Sign `payload` into a token stored under the configured claim key.
    pub fn sign<P: Serialize + ?Sized>(&self, payload: &P) -> Result<String, SignError> {
        self.sign_claims(&self.claims(payload)?)
    }

    /// Sign a prepared claim set as is.
    pub fn sign_claims(&self, claims: &Claims) -> Result<String, SignError> {
        jsonwebtoken::encode(&Header::new(self.config.algorithm), claims, &self.key)
            .map_err(SignError::Sign)
    }
}
