//! Authentication middleware.
//!
//! Provides a tower middleware that validates the bearer token of every
//! request with a [`hola::Authenticator`]. Each request goes through the same
//! single pass:
//!
//! 1. Extract the bearer token; answer 400 when there is none
//! 2. Validate it; answer with the status for the error kind when it fails
//! 3. Attach the authorized [`Scopes`] to the request extensions, unless the
//!    token authorized no scopes
//! 4. Call the wrapped service
//!
//! Failures are answered with the error message as a plain text body. See
//! [`status_for`] for the status of each error kind.
//!
//! # Example
//!
//! ```rust,ignore
//! use hola_axum::auth::{AuthLayer, Scopes};
//!
//! let app = axum::Router::new()
//!     .route("/api/auth", axum::routing::get(|scopes: Option<Scopes>| async move {
//!         format!("{scopes:?}")
//!     }))
//!     .layer(AuthLayer::new(authenticator));
//! ```

mod bearer;
mod error;
mod scopes;

pub use bearer::bearer_token;
pub use error::{error_response, status_for};
pub use scopes::Scopes;

use futures::future::BoxFuture;
use hola::{Authenticator, Fetcher};
use http::{Request, Response};
use std::task::{Context, Poll};

/// Tower [`Layer`](tower::Layer) that applies [`AuthService`].
pub struct AuthLayer<F> {
    authenticator: Authenticator<F>,
}

impl<F> AuthLayer<F> {
    pub fn new(authenticator: Authenticator<F>) -> Self {
        Self { authenticator }
    }
}

impl<F> Clone for AuthLayer<F> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<F, S> tower::Layer<S> for AuthLayer<F> {
    type Service = AuthService<F, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            authenticator: self.authenticator.clone(),
            inner,
        }
    }
}

/// Tower service that authenticates requests before forwarding them.
pub struct AuthService<F, S> {
    authenticator: Authenticator<F>,
    inner: S,
}

impl<F, S: Clone> Clone for AuthService<F, S> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<F, S, B> tower::Service<Request<B>> for AuthService<F, S>
where
    F: Fetcher + 'static,
    S: tower::Service<Request<B>, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let mut inner = self.inner.clone();
        // swap to ensure poll_ready state is preserved
        std::mem::swap(&mut self.inner, &mut inner);

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let result = match bearer_token(&parts.headers) {
                Ok(token) => authenticator.validate(token).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(scopes) => {
                    let mut req = Request::from_parts(parts, body);
                    if !scopes.is_empty() {
                        req.extensions_mut().insert(Scopes::new(scopes));
                    }
                    inner.call(req).await
                }
                Err(err) => {
                    let response = error_response(&err);
                    tracing::debug!(
                        method = %parts.method,
                        path = parts.uri.path(),
                        status = %response.status(),
                        error = %err,
                        "request rejected"
                    );
                    Ok(response)
                }
            }
        })
    }
}
