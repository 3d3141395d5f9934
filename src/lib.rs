//! Salted password hashing and verification.
//!
//! A [`SaltGenerator`] draws salts from the crypt alphabet, a
//! [`CredentialHasher`] turns `(plaintext, salt)` into a hash through a
//! pluggable [`Digest`] primitive and checks candidates against stored
//! `(hash, salt)` pairs. The library does no I/O of its own apart from the
//! optional [`RecordFile`].

mod config;
pub mod digest;
mod error;
mod hasher;
mod record;
mod salt;
mod storage;

pub use crate::config::{Algorithm, Config};
pub use crate::digest::{Argon2Digest, Digest, KdfParams, UnixCrypt};
pub use crate::error::{CryptError, HashError, SaltError};
pub use crate::hasher::CredentialHasher;
pub use crate::record::CredentialRecord;
pub use crate::salt::{
    MAX_SALT_LEN, OsRandom, RandomSource, SALT_ALPHABET, Salt, SaltGenerator, is_salt_char,
};
pub use crate::storage::RecordFile;
