//! Credential records: the `(hash, salt)` pair a caller persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CryptError;
use crate::salt::Salt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    algorithm: String,
    hash: String,
    salt: Salt,
    created: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(algorithm: &str, hash: String, salt: Salt) -> Self {
        Self {
            algorithm: algorithm.to_owned(),
            hash,
            salt,
            created: Utc::now(),
        }
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn to_json(&self) -> Result<String, CryptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, CryptError> {
        Ok(serde_json::from_str(data)?)
    }
}
