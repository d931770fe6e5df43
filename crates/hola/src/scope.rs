//! Scope authorization.

use crate::error::Error;
use serde_json::Value;

/// Requested scopes split by whether the identity grants them.
///
/// Both lists keep the order in which the scopes were requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Authorization {
    pub authorized: Vec<String>,
    pub unauthorized: Vec<String>,
}

impl Authorization {
    /// Whether every requested scope was granted.
    pub fn is_complete(&self) -> bool {
        self.unauthorized.is_empty()
    }
}

/// Partition `requested` into granted and ungranted scopes.
///
/// Fails with [`Error::MalformedScopes`] carrying the first entry that is not
/// a string, before any entry is classified.
pub fn authorize(requested: &[Value], granted: &[String]) -> Result<Authorization, Error> {
    let requested = requested
        .iter()
        .map(|value| {
            value
                .as_str()
                .ok_or_else(|| Error::MalformedScopes(value.clone()))
        })
        .collect::<Result<Vec<&str>, Error>>()?;

    let mut granted: Vec<&str> = granted.iter().map(String::as_str).collect();
    granted.sort_unstable();

    let (authorized, unauthorized) = requested
        .into_iter()
        .partition::<Vec<&str>, _>(|scope| granted.binary_search(scope).is_ok());

    Ok(Authorization {
        authorized: authorized.into_iter().map(String::from).collect(),
        unauthorized: unauthorized.into_iter().map(String::from).collect(),
    })
}
