//! Hashing and verification of credentials over a [`Digest`].

use crate::digest::{Digest, UnixCrypt};
use crate::error::{CryptError, HashError};
use crate::record::CredentialRecord;
use crate::salt::{RandomSource, SaltGenerator};

/// Hashes plaintexts and checks them against stored `(hash, salt)` pairs.
#[derive(Debug, Default, Clone)]
pub struct CredentialHasher<D = UnixCrypt> {
    digest: D,
}

impl<D: Digest> CredentialHasher<D> {
    pub fn new(digest: D) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &D {
        &self.digest
    }

    pub fn algorithm(&self) -> &'static str {
        self.digest.name()
    }

    /// Runs the digest primitive and returns its output verbatim.
    ///
    /// Empty plaintexts are hashed like any other; rejecting them is a
    /// caller policy.
    pub fn hash(&self, plaintext: &str, salt: &str) -> Result<String, HashError> {
        self.digest.digest(plaintext, salt)
    }

    /// Returns `true` iff `plaintext` under `salt` reproduces `expected_hash`.
    ///
    /// A failure to recompute the hash (for example a malformed salt) is a
    /// non-match. Use [`try_verify`](Self::try_verify) to observe the error.
    pub fn verify(&self, plaintext: &str, expected_hash: &str, salt: &str) -> bool {
        self.try_verify(plaintext, expected_hash, salt).unwrap_or(false)
    }

    /// Like [`verify`](Self::verify) but propagates primitive failures.
    pub fn try_verify(
        &self,
        plaintext: &str,
        expected_hash: &str,
        salt: &str,
    ) -> Result<bool, HashError> {
        let actual = self.hash(plaintext, salt)?;
        Ok(constant_time_eq(actual.as_bytes(), expected_hash.as_bytes()))
    }

    /// Generates a salt of `salt_len` characters, hashes `plaintext` with it
    /// and returns the resulting record.
    pub fn enroll<R: RandomSource>(
        &self,
        generator: &SaltGenerator<R>,
        plaintext: &str,
        salt_len: usize,
    ) -> Result<CredentialRecord, CryptError> {
        let salt = generator.generate_salt(salt_len)?;
        let hash = self.hash(plaintext, &salt)?;
        Ok(CredentialRecord::new(self.algorithm(), hash, salt))
    }

    /// Verifies `plaintext` against a stored record.
    ///
    /// # Errors
    ///
    /// [`CryptError::AlgorithmMismatch`] when the record was produced by a
    /// different primitive, and [`CryptError::Hash`] when recomputation fails.
    pub fn verify_record(
        &self,
        plaintext: &str,
        record: &CredentialRecord,
    ) -> Result<bool, CryptError> {
        if record.algorithm() != self.algorithm() {
            return Err(CryptError::AlgorithmMismatch {
                expected: self.algorithm(),
                found: record.algorithm().to_owned(),
            });
        }
        Ok(self.try_verify(plaintext, record.hash(), record.salt())?)
    }
}

// Content-independent timing; only the length check returns early.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
