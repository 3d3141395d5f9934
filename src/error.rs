use thiserror::Error;

/// Failures while producing or parsing a salt.
#[derive(Debug, Error)]
pub enum SaltError {
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("salt must not be empty")]
    Empty,

    #[error("salt length {len} exceeds the maximum of {max}")]
    TooLong { len: usize, max: usize },

    #[error("invalid salt character {0:?}")]
    InvalidCharacter(char),
}

/// Failures of the digest primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("{algorithm} failed: {reason}")]
    PrimitiveFailure {
        algorithm: &'static str,
        reason: String,
    },
}

impl HashError {
    pub(crate) fn primitive(algorithm: &'static str, reason: impl Into<String>) -> Self {
        HashError::PrimitiveFailure {
            algorithm,
            reason: reason.into(),
        }
    }
}

/// Errors from the record-level operations (enrollment, record files).
#[derive(Debug, Error)]
pub enum CryptError {
    #[error(transparent)]
    Salt(#[from] SaltError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("record was hashed with '{found}' but the hasher uses '{expected}'")]
    AlgorithmMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("malformed credential record: {0}")]
    Record(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
