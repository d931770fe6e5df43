//! # hola-axum
//!
//! Bearer token authentication for [axum](https://docs.rs/axum) services,
//! backed by a [`hola::Authenticator`].
//!
//! ## Auth Middleware
//!
//! [`AuthLayer`](auth::AuthLayer) reads `Authorization: Bearer <token>`,
//! validates the token, and either answers with an error status or forwards
//! the request with the authorized [`Scopes`](auth::Scopes) attached.
//!
//! ```rust,ignore
//! use hola::{Authenticator, AuthenticatorConfig};
//! use hola_axum::auth::{AuthLayer, Scopes};
//!
//! async fn handler(scopes: Option<Scopes>) -> String {
//!     match scopes {
//!         Some(scopes) => format!("scopes {:?}", scopes.as_slice()),
//!         None => String::new(),
//!     }
//! }
//!
//! let authenticator = Authenticator::new(store, AuthenticatorConfig::default());
//! let app = axum::Router::new()
//!     .route("/api/auth", axum::routing::get(handler))
//!     .layer(AuthLayer::new(authenticator));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4040").await?;
//! axum::serve(listener, app).await?;
//! ```

pub use axum;

pub mod auth;
