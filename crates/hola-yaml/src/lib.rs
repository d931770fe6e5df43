//! Identity store backed by a YAML identity list.
//!
//! The file is a sequence of identities, read once at startup:
//!
//! ```yaml
//! - key: some-issuer-key
//!   secret: this is super secret
//!   signing_method: HS256
//!   scopes:
//!     - resource.action
//!     - other.action
//! ```

use hola::{Algorithm, BoxError, Fetcher, Identity};
use serde::Deserialize;
use std::{collections::HashMap, io::Read, path::Path};
use thiserror::Error;

/// Errors from loading an identity list.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid identity list: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two identities share a key.
    #[error("duplicate identity key: {0}")]
    DuplicateKey(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    key: String,
    secret: String,
    #[serde(default)]
    scopes: Vec<String>,
    signing_method: Algorithm,
}

impl From<Record> for Identity {
    fn from(record: Record) -> Self {
        Identity::new(record.key, record.secret, record.signing_method).with_scopes(record.scopes)
    }
}

/// Read-only identities keyed by issuer.
#[derive(Clone, Debug, Default)]
pub struct YamlStore {
    identities: HashMap<String, Identity>,
}

impl YamlStore {
    pub fn from_str(yaml: &str) -> Result<Self, Error> {
        let records: Vec<Record> = serde_yaml::from_str(yaml)?;
        Self::from_records(records)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let records: Vec<Record> = serde_yaml::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn from_records(records: Vec<Record>) -> Result<Self, Error> {
        let mut identities = HashMap::with_capacity(records.len());
        for record in records {
            if identities.contains_key(&record.key) {
                return Err(Error::DuplicateKey(record.key));
            }
            identities.insert(record.key.clone(), Identity::from(record));
        }
        tracing::debug!(count = identities.len(), "loaded identities");
        Ok(Self { identities })
    }

    pub fn get(&self, key: &str) -> Option<&Identity> {
        self.identities.get(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.identities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl Fetcher for YamlStore {
    async fn fetch(&self, key: &str) -> Result<Option<Identity>, BoxError> {
        Ok(self.get(key).cloned())
    }
}
