//! Authorized scopes as a request extension.
//!
//! The [`Scopes`] type is the extension key. It is only present when the
//! token requested at least one scope, so handlers tell "no scopes asserted"
//! apart from a scoped request by probing for it.

use axum::extract::OptionalFromRequestParts;
use http::{Extensions, request::Parts};
use std::{convert::Infallible, ops::Deref};

/// Scopes authorized for the current request, in request order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scopes(Vec<String>);

impl Scopes {
    pub fn new(scopes: Vec<String>) -> Self {
        Self(scopes)
    }

    /// The scopes attached to a request, if any.
    pub fn from_extensions(extensions: &Extensions) -> Option<&Scopes> {
        extensions.get::<Scopes>()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s == scope)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Scopes {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<S> OptionalFromRequestParts<S> for Scopes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(Scopes::from_extensions(&parts.extensions).cloned())
    }
}
