//! Token signing for the CLI.

use super::App;
use crate::error::Error;
use hola::{Claims, DEFAULT_SCOPES_CLAIM, Signer, SignerConfig};
use std::time::Duration;

/// Sign a token for `app.key` requesting `app.scopes`.
pub fn token(app: &App) -> Result<String, Error> {
    let signer = signer(app)?;
    let claims = claims(&signer, app)?;
    Ok(signer.sign_claims(&claims)?)
}

fn signer(app: &App) -> Result<Signer, Error> {
    Ok(Signer::new(
        SignerConfig {
            claim_key: DEFAULT_SCOPES_CLAIM.into(),
            issuer: Some(app.key.clone()),
            ttl: Duration::from_secs(app.ttl),
            ..SignerConfig::new(app.algorithm)
        },
        app.secret.as_bytes(),
    )?)
}

/// The scopes claim is left out when no scopes are requested.
fn claims(signer: &Signer, app: &App) -> Result<Claims, Error> {
    let mut claims = signer.claims(&app.scopes)?;
    if app.scopes.is_empty() {
        claims.custom.remove(DEFAULT_SCOPES_CLAIM);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use hola::{Algorithm, Authenticator, AuthenticatorConfig, BoxError, FetcherFn, Identity};

    fn app(args: &[&str]) -> App {
        App::try_parse_from(["hola-cli", "some-issuer-key", "this is super secret"].iter().chain(args))
            .unwrap()
    }

    #[test]
    fn no_scopes_omits_the_claim() {
        let app = app(&[]);
        let claims = claims(&signer(&app).unwrap(), &app).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("some-issuer-key"));
        assert!(claims.jti.is_some());
        assert_eq!(claims.custom(DEFAULT_SCOPES_CLAIM), None);
    }

    #[test]
    fn scopes_are_requested_in_order() {
        let app = app(&["resource.action", "other.action"]);
        let claims = claims(&signer(&app).unwrap(), &app).unwrap();
        assert_eq!(
            claims.custom(DEFAULT_SCOPES_CLAIM),
            Some(&serde_json::json!(["resource.action", "other.action"]))
        );
    }

    #[tokio::test]
    async fn signed_token_is_accepted() {
        let token = token(&app(&["resource.action"])).unwrap();

        let identity = Identity::new("some-issuer-key", "this is super secret", Algorithm::HS256)
            .with_scopes(["resource.action", "other.action"]);
        let authenticator = Authenticator::new(
            FetcherFn::new(move |iss: &str| -> Result<Option<Identity>, BoxError> {
                assert_eq!(iss, "some-issuer-key");
                Ok(Some(identity.clone()))
            }),
            AuthenticatorConfig::default(),
        );
        assert_eq!(authenticator.validate(&token).await.unwrap(), ["resource.action"]);
    }
}
