//! End-to-end tests of the auth middleware in front of an axum router.

use axum::{Router, body::Body, routing::get};
use hola::{
    Algorithm, Authenticator, AuthenticatorConfig, BoxError, FetcherFn, Identity, Signer,
    SignerConfig,
};
use hola_axum::auth::{AuthLayer, Scopes};
use http::{Request, StatusCode, header::AUTHORIZATION};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const SECRET: &str = "this is super secret";
const ISSUER: &str = "some-issuer-key";

/// What the wrapped handler saw: `None` if it was never called.
type Recorder = Arc<Mutex<Option<Option<Scopes>>>>;

fn app<F>(fetch: F) -> (Router, Recorder)
where
    F: Fn(&str) -> Result<Option<Identity>, BoxError> + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let seen = recorder.clone();
    let authenticator = Authenticator::new(FetcherFn::new(fetch), AuthenticatorConfig::default());

    let router = Router::new()
        .route(
            "/some/auth",
            get(move |scopes: Option<Scopes>| {
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = Some(scopes);
                    "called\n"
                }
            }),
        )
        .layer(AuthLayer::new(authenticator));

    (router, recorder)
}

fn identity(secret: &str, scopes: &[&str]) -> Identity {
    Identity::new(ISSUER, secret, Algorithm::HS256).with_scopes(scopes.iter().copied())
}

/// Store holding a single identity, asserting the lookup key.
fn store(
    identity: Identity,
) -> impl Fn(&str) -> Result<Option<Identity>, BoxError> + Send + Sync + 'static {
    move |iss: &str| -> Result<Option<Identity>, BoxError> {
        assert_eq!(iss, ISSUER);
        Ok(Some(identity.clone()))
    }
}

fn token(claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request() -> http::request::Builder {
    Request::builder().uri("/some/auth")
}

fn bearer(token: &str) -> Request<Body> {
    request()
        .header(AUTHORIZATION, format!("BEARER {token}"))
        .body(Body::from("some body"))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn seen(recorder: &Recorder) -> Option<Option<Scopes>> {
    recorder.lock().unwrap().clone()
}

#[tokio::test]
async fn missing_token() {
    let (router, recorder) = app(|_| panic!("storage must not be queried"));

    let (status, body) = send(router, request().body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "no token present in request\n");
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn missing_issuer_claim() {
    let (router, recorder) = app(|_| panic!("storage must not be queried"));

    let (status, body) = send(router, bearer(&token(json!({ "aud": "test.audience.com" })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "ISS claim is missing\n");
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn empty_issuer_claim() {
    let (router, _) = app(|_| panic!("storage must not be queried"));

    let (status, body) = send(router, bearer(&token(json!({ "iss": "" })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "ISS claim is missing\n");
}

#[tokio::test]
async fn garbled_token() {
    let (router, _) = app(|_| panic!("storage must not be queried"));

    let (status, body) = send(router, bearer("garbage")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("token is malformed"), "{body}");
    assert!(body.ends_with('\n'));
}

#[tokio::test]
async fn storage_failure() {
    let (router, recorder) = app(|iss| {
        assert_eq!(iss, ISSUER);
        Err("something went wrong in storage".into())
    });

    let claims = json!({ "aud": "test.audience.com", "iss": ISSUER });
    let (status, body) = send(router, bearer(&token(claims))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        "error fetching identity from storage: something went wrong in storage\n"
    );
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn identity_not_found() {
    let (router, _) = app(|iss| {
        assert_eq!(iss, ISSUER);
        Ok(None)
    });

    let (status, body) = send(router, bearer(&token(json!({ "iss": ISSUER })))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        "identity cannot be located for ISS claim \"some-issuer-key\"\n"
    );
}

#[tokio::test]
async fn signature_invalid() {
    let (router, recorder) = app(store(identity("wrong", &[])));

    let (status, body) = send(router, bearer(&token(json!({ "iss": ISSUER })))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "token is invalid: signature is invalid\n");
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn valid_token_without_scopes() {
    let (router, recorder) = app(store(identity(SECRET, &[])));

    let claims = json!({ "aud": "test.audience.com", "iss": ISSUER });
    let (status, body) = send(router, bearer(&token(claims))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "called\n");
    // Handler ran, and no scopes were attached.
    assert_eq!(seen(&recorder), Some(None));
}

#[tokio::test]
async fn empty_scope_list_attaches_nothing() {
    let (router, recorder) = app(store(identity(SECRET, &["resource.action"])));

    let (status, _) = send(router, bearer(&token(json!({ "iss": ISSUER, "scopes": [] })))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen(&recorder), Some(None));
}

#[tokio::test]
async fn scopes_in_unexpected_format() {
    let (router, recorder) = app(store(identity(SECRET, &[])));

    let (status, body) = send(router, bearer(&token(json!({ "iss": ISSUER, "scopes": 12345 })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "scopes in unexpected format 12345\n");
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn unexpected_scope_type() {
    let (router, _) = app(store(identity(SECRET, &["resource.action", "other.action"])));

    let (status, body) = send(router, bearer(&token(json!({ "iss": ISSUER, "scopes": [5] })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "scopes in unexpected format 5\n");
}

#[tokio::test]
async fn unauthorized_scopes() {
    let (router, recorder) = app(store(identity(SECRET, &[])));

    let claims = json!({ "iss": ISSUER, "scopes": ["resource.action"] });
    let (status, body) = send(router, bearer(&token(claims))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "scopes not supported [\"resource.action\"]\n");
    assert_eq!(seen(&recorder), None);
}

#[tokio::test]
async fn unauthorized_scopes_listed_in_request_order() {
    let (router, _) = app(store(identity(SECRET, &["other.action"])));

    let claims = json!({ "iss": ISSUER, "scopes": ["z.write", "other.action", "a.read"] });
    let (status, body) = send(router, bearer(&token(claims))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "scopes not supported [\"z.write\", \"a.read\"]\n");
}

#[tokio::test]
async fn authorized_scopes() {
    let (router, recorder) = app(store(identity(SECRET, &["resource.action", "other.action"])));

    let claims = json!({ "aud": "test.audience.com", "iss": ISSUER, "scopes": ["resource.action"] });
    let (status, body) = send(router, bearer(&token(claims))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "called\n");
    assert_eq!(
        seen(&recorder),
        Some(Some(Scopes::new(vec!["resource.action".into()])))
    );
}

#[tokio::test]
async fn signed_token_round_trip() {
    let (router, recorder) = app(store(identity(SECRET, &["resource.action", "other.action"])));

    let signer = Signer::new(
        SignerConfig {
            claim_key: "scopes".into(),
            issuer: Some(ISSUER.into()),
            ..SignerConfig::new(Algorithm::HS256)
        },
        SECRET.as_bytes(),
    )
    .unwrap();
    let token = signer.sign(&["other.action", "resource.action"]).unwrap();

    let (status, _) = send(router, bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let scopes = seen(&recorder).flatten().unwrap();
    assert_eq!(scopes.as_slice(), ["other.action", "resource.action"]);
}
