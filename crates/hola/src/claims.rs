//! Token claim set shared by the issuing and validating sides.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Claims carried by a token.
///
/// Registered claims are typed; everything else, including the scopes or
/// custom data claim, lands in [`Claims::custom`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, the key of the identity that signed the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration time (seconds since epoch).
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
    /// Not before (seconds since epoch).
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub nbf: Option<i64>,
    /// Issued at (seconds since epoch).
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,
    /// Unique token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Non-registered claims.
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl Claims {
    /// The issuer, treating an empty string as absent.
    pub fn issuer(&self) -> Option<&str> {
        self.iss.as_deref().filter(|iss| !iss.is_empty())
    }

    /// A custom claim by name.
    pub fn custom(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }
}

/// A NumericDate, which may carry a fractional part. Truncated to whole
/// seconds toward the past.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(seconds) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(seconds.floor() as i64))
}

/// The `aud` claim, which may be a single string or a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(s) => s == audience,
            Audience::Multiple(v) => v.iter().any(|s| s == audience),
        }
    }
}
