//! Random salt generation.
//!
//! Salts are drawn from the 64-symbol crypt alphabet `./0-9A-Za-z`.

use std::fmt;
use std::ops::Deref;

use getrandom::fill;
use serde::{Deserialize, Serialize};

use crate::error::SaltError;

/// The crypt salt alphabet, in character-class order.
pub const SALT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Longest salt the generator or [`Salt::parse`] accepts.
pub const MAX_SALT_LEN: usize = 64;

/// Returns `true` if `c` belongs to [`SALT_ALPHABET`].
pub fn is_salt_char(c: char) -> bool {
    c == '.' || c == '/' || c.is_ascii_alphanumeric()
}

/// Source of random bytes for salt generation.
///
/// Implementations must be safe to share between threads.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SaltError>;
}

/// The operating system CSPRNG. Holds no state and is never reseeded by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SaltError> {
        fill(buf).map_err(|e| SaltError::RandomnessUnavailable(e.to_string()))
    }
}

/// A validated salt string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Salt(String);

impl Salt {
    /// Parses a caller-supplied salt, checking every character against the alphabet.
    pub fn parse(s: &str) -> Result<Self, SaltError> {
        check_len(s.len())?;
        if let Some(c) = s.chars().find(|c| !is_salt_char(*c)) {
            return Err(SaltError::InvalidCharacter(c));
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Salt {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Salt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Salt {
    type Error = SaltError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Salt> for String {
    fn from(salt: Salt) -> Self {
        salt.0
    }
}

fn check_len(len: usize) -> Result<(), SaltError> {
    if len == 0 {
        return Err(SaltError::Empty);
    }
    if len > MAX_SALT_LEN {
        return Err(SaltError::TooLong {
            len,
            max: MAX_SALT_LEN,
        });
    }
    Ok(())
}

/// Produces salts from a [`RandomSource`].
#[derive(Debug, Default, Clone)]
pub struct SaltGenerator<R = OsRandom> {
    source: R,
}

impl SaltGenerator<OsRandom> {
    pub fn new() -> Self {
        Self { source: OsRandom }
    }
}

impl<R: RandomSource> SaltGenerator<R> {
    pub fn with_source(source: R) -> Self {
        Self { source }
    }

    /// Generates a salt of exactly `length` characters.
    ///
    /// Each position takes the low six bits of one random byte. 256 is a
    /// multiple of 64, so every symbol is equally likely.
    ///
    /// # Errors
    ///
    /// [`SaltError::Empty`] for a zero length, [`SaltError::TooLong`] above
    /// [`MAX_SALT_LEN`] and [`SaltError::RandomnessUnavailable`] if the
    /// source fails.
    pub fn generate_salt(&self, length: usize) -> Result<Salt, SaltError> {
        check_len(length)?;

        let mut buf = vec![0u8; length];
        self.source.fill(&mut buf)?;

        let salt = buf
            .iter()
            .map(|b| SALT_ALPHABET[(b & 0x3f) as usize] as char)
            .collect();
        Ok(Salt(salt))
    }
}
