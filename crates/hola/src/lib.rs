//! # hola
//!
//! Stateless authentication of signed bearer tokens and authorization of the
//! scopes they request.
//!
//! - [`Authenticator`] looks up the token issuer's [`Identity`] through a
//!   [`Fetcher`], verifies the token with the identity's secret and signing
//!   method, and returns the requested scopes once every one of them is
//!   granted to the identity.
//! - [`Signer`] issues tokens in the same claim shape.
//!
//! Cryptography is delegated to [`jsonwebtoken`]; identities are
//! [`Algorithm`](jsonwebtoken::Algorithm)-tagged secrets.
//!
//! ```rust,ignore
//! use hola::{Authenticator, AuthenticatorConfig, FetcherFn, Identity, Signer, SignerConfig};
//! use jsonwebtoken::Algorithm;
//!
//! let identity = Identity::new("some-issuer-key", "this is super secret", Algorithm::HS256)
//!     .with_scopes(["resource.action", "other.action"]);
//! let authenticator = Authenticator::new(
//!     FetcherFn::new(move |_| Ok(Some(identity.clone()))),
//!     AuthenticatorConfig::default(),
//! );
//!
//! let signer = Signer::new(
//!     SignerConfig {
//!         claim_key: "scopes".into(),
//!         issuer: Some("some-issuer-key".into()),
//!         ..SignerConfig::new(Algorithm::HS256)
//!     },
//!     b"this is super secret",
//! )?;
//!
//! let token = signer.sign(&["resource.action"])?;
//! assert_eq!(authenticator.validate(&token).await?, vec!["resource.action"]);
//! ```

pub mod authenticator;
pub mod claims;
pub mod clock;
pub mod error;
pub mod identity;
pub mod scope;
pub mod signer;

pub use authenticator::{Authenticator, AuthenticatorConfig, DEFAULT_SCOPES_CLAIM};
pub use claims::{Audience, Claims};
pub use clock::{Clock, FixedClock, IdGenerator, SystemClock, UuidV4};
pub use error::{BoxError, Error, ErrorKind, InvalidToken, Result};
pub use identity::{Fetcher, FetcherFn, Identity};
pub use jsonwebtoken::Algorithm;
pub use signer::{DEFAULT_DATA_CLAIM, DEFAULT_TTL, SignError, Signer, SignerConfig};
