//! Runtime selection of the digest primitive and its parameters.

use std::fmt;
use std::str::FromStr;

use crate::digest::{
    ARGON2_PREFIX, ARGON2_SALT_LEN, Argon2Digest, Digest, KdfParams, UNIX_CRYPT_SALT_LEN,
    UnixCrypt,
};
use crate::error::HashError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Legacy DES `crypt(3)`.
    #[default]
    Des,
    /// Argon2id.
    Argon2,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Des => "des-crypt",
            Algorithm::Argon2 => "argon2id",
        }
    }

    /// Guesses the primitive that produced `hash` from its format.
    pub fn detect(hash: &str) -> Self {
        if hash.starts_with(ARGON2_PREFIX) {
            Algorithm::Argon2
        } else {
            Algorithm::Des
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "des" | "des-crypt" => Ok(Algorithm::Des),
            "argon2" | "argon2id" => Ok(Algorithm::Argon2),
            other => Err(format!(
                "unknown algorithm '{other}' (expected 'des' or 'argon2')"
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Config {
    algorithm: Algorithm,
    kdf: KdfParams,
    salt_len: Option<usize>,
}

impl Config {
    pub fn new(algorithm: Algorithm, kdf: KdfParams) -> Self {
        Self {
            algorithm,
            kdf,
            salt_len: None,
        }
    }

    /// Overrides the primitive's preferred salt length.
    pub fn with_salt_len(mut self, salt_len: Option<usize>) -> Self {
        self.salt_len = salt_len;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len.unwrap_or(match self.algorithm {
            Algorithm::Des => UNIX_CRYPT_SALT_LEN,
            Algorithm::Argon2 => ARGON2_SALT_LEN,
        })
    }

    pub fn digest(&self) -> Box<dyn Digest> {
        match self.algorithm {
            Algorithm::Des => Box::new(UnixCrypt),
            Algorithm::Argon2 => Box::new(Argon2Digest::new(self.kdf)),
        }
    }

    /// The configuration needed to recompute `hash`: its primitive, and for
    /// Argon2 the cost parameters embedded in it.
    ///
    /// # Errors
    ///
    /// An Argon2 hash whose PHC fields do not parse is a
    /// [`HashError::PrimitiveFailure`], never a silent fallback to the
    /// configured parameters.
    pub fn for_hash(&self, hash: &str) -> Result<Self, HashError> {
        let algorithm = Algorithm::detect(hash);
        let kdf = match algorithm {
            Algorithm::Argon2 => KdfParams::from_phc(hash)?,
            Algorithm::Des => self.kdf,
        };
        Ok(Self {
            algorithm,
            kdf,
            salt_len: self.salt_len,
        })
    }
}
