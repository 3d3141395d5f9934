//! Seventh Edition DES `crypt(3)`.
//!
//! Weak by modern standards: 12-bit salt, 25 rounds, and only the first
//! eight plaintext bytes count. Kept so existing hashes keep verifying.

use pwhash::unix_crypt;

use super::Digest;
use crate::error::HashError;

/// Salt characters consumed by the primitive. Longer salts are accepted and
/// the remainder ignored.
pub const UNIX_CRYPT_SALT_LEN: usize = 2;
/// Plaintext bytes beyond this are silently dropped by the primitive.
pub const UNIX_CRYPT_MAX_PLAINTEXT: usize = 8;

#[derive(Debug, Default, Clone, Copy)]
pub struct UnixCrypt;

impl Digest for UnixCrypt {
    fn name(&self) -> &'static str {
        "des-crypt"
    }

    fn salt_len(&self) -> usize {
        UNIX_CRYPT_SALT_LEN
    }

    fn max_plaintext_len(&self) -> Option<usize> {
        Some(UNIX_CRYPT_MAX_PLAINTEXT)
    }

    fn digest(&self, plaintext: &str, salt: &str) -> Result<String, HashError> {
        unix_crypt::hash_with(salt, plaintext)
            .map_err(|e| HashError::primitive(self.name(), format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answers() {
        assert_eq!(UnixCrypt.digest("password", "xO").unwrap(), "xOAFZqRz5RduI");
        assert_eq!(UnixCrypt.digest("test", "aZ").unwrap(), "aZGJuE6EXrjEE");
    }

    #[test]
    fn output_embeds_salt_prefix() {
        let hash = UnixCrypt.digest("hunter2", "Q9").unwrap();
        assert_eq!(hash.len(), 13);
        assert!(hash.starts_with("Q9"));
    }

    #[test]
    fn plaintext_truncated_after_eight_bytes() {
        let short = UnixCrypt.digest("password", "xO").unwrap();
        let long = UnixCrypt.digest("password123", "xO").unwrap();
        assert_eq!(short, long);

        let seven = UnixCrypt.digest("passwor", "xO").unwrap();
        assert_ne!(seven, short);
    }

    #[test]
    fn only_first_two_salt_chars_count() {
        let a = UnixCrypt.digest("hunter2", "abCDEFGH").unwrap();
        let b = UnixCrypt.digest("hunter2", "abXYZ012").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_salts_fail() {
        for salt in ["", "Z", "!!"] {
            let err = UnixCrypt.digest("test", salt).unwrap_err();
            assert!(matches!(
                err,
                HashError::PrimitiveFailure {
                    algorithm: "des-crypt",
                    ..
                }
            ));
        }
    }
}
