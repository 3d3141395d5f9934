//! Digest primitives behind the [`Digest`] trait.
//!
//! Provides the legacy DES `crypt(3)` hash for compatibility and an Argon2id
//! primitive for new records.

pub mod des;
pub mod kdf;

pub use des::{UNIX_CRYPT_MAX_PLAINTEXT, UNIX_CRYPT_SALT_LEN, UnixCrypt};
pub use kdf::{
    ARGON2_MAX_SALT_LEN, ARGON2_MIN_SALT_LEN, ARGON2_PREFIX, ARGON2_SALT_LEN, Argon2Digest, KdfParams,
};

use crate::error::HashError;

/// A salted one-way function `digest(plaintext, salt) -> hash`.
pub trait Digest: Send + Sync {
    /// Stable identifier stored alongside credential records.
    fn name(&self) -> &'static str;

    /// Salt length the primitive expects.
    fn salt_len(&self) -> usize;

    /// Number of plaintext bytes that contribute to the hash, if bounded.
    fn max_plaintext_len(&self) -> Option<usize> {
        None
    }

    fn digest(&self, plaintext: &str, salt: &str) -> Result<String, HashError>;
}

impl<D: Digest + ?Sized> Digest for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn salt_len(&self) -> usize {
        (**self).salt_len()
    }

    fn max_plaintext_len(&self) -> Option<usize> {
        (**self).max_plaintext_len()
    }

    fn digest(&self, plaintext: &str, salt: &str) -> Result<String, HashError> {
        (**self).digest(plaintext, salt)
    }
}
