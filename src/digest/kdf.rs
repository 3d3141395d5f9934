use argon2::password_hash::{self, Ident, Output, ParamsString, Salt as PhcSalt};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use zeroize::Zeroizing;

use super::Digest;
use crate::error::HashError;
use crate::salt::is_salt_char;

/// Length of the derived tag in bytes.
pub const TAG_LEN: usize = 32;
/// Salt length used for new Argon2 records.
pub const ARGON2_SALT_LEN: usize = 16;
/// Argon2 refuses salts shorter than this.
pub const ARGON2_MIN_SALT_LEN: usize = 8;
/// Longest salt a PHC string can carry.
pub const ARGON2_MAX_SALT_LEN: usize = 64;
/// Leading marker of every Argon2 hash string.
pub const ARGON2_PREFIX: &str = "$argon2id$";

const NAME: &str = "argon2id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // default memory cost
            mem_cost_kib: 64 * 1024, // 64 MiB
            // default number of iterations
            time_cost: 3,
            // default number of lanes
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, HashError> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<(), HashError> {
        if self.mem_cost_kib < 8 {
            return Err(HashError::primitive(NAME, "memory cost too low"));
        }
        if self.time_cost < 1 {
            return Err(HashError::primitive(NAME, "time cost must be >= 1"));
        }
        if self.parallelism < 1 {
            return Err(HashError::primitive(NAME, "parallelism must be >= 1"));
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return Err(HashError::primitive(
                NAME,
                "memory cost must be at least 8 * parallelism",
            ));
        }
        Ok(())
    }

    /// Recovers the parameters from a PHC hash string produced by
    /// [`Argon2Digest`].
    ///
    /// # Errors
    ///
    /// [`HashError::PrimitiveFailure`] when the string is not a well-formed
    /// Argon2id PHC hash or carries parameters Argon2 would reject.
    pub fn from_phc(hash: &str) -> Result<Self, HashError> {
        let phc = PasswordHash::new(hash)
            .map_err(|e| HashError::primitive(NAME, format!("malformed hash: {e}")))?;

        if phc.algorithm.as_str() != NAME {
            return Err(HashError::primitive(
                NAME,
                format!("unexpected algorithm '{}'", phc.algorithm),
            ));
        }
        if let Some(version) = phc.version {
            if version != Version::V0x13 as u32 {
                return Err(HashError::primitive(
                    NAME,
                    format!("unsupported version {version}"),
                ));
            }
        }

        let params = Params::try_from(&phc)
            .map_err(|e| HashError::primitive(NAME, format!("invalid parameters: {e}")))?;
        Self::new(params.m_cost(), params.t_cost(), params.p_cost())
    }

    fn to_argon2_params(self) -> Result<Params, HashError> {
        self.validate()?;
        Params::new(
            self.mem_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(TAG_LEN),
        )
        .map_err(|e| HashError::primitive(NAME, format!("invalid parameters: {e}")))
    }
}

/// Argon2id over the salt string bytes, rendered as a PHC string
/// `$argon2id$v=19$m=<m>,t=<t>,p=<p>$<salt>$<tag>`.
///
/// The salt is stored verbatim in the salt field; crypt-alphabet characters
/// are legal PHC salt characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Digest {
    params: KdfParams,
}

impl Argon2Digest {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    fn derive_tag(
        &self,
        params: Params,
        plaintext: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; TAG_LEN]>, HashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut tag = Zeroizing::new([0u8; TAG_LEN]);
        argon2
            .hash_password_into(plaintext.as_bytes(), salt, &mut tag[..])
            .map_err(|e| HashError::primitive(NAME, e.to_string()))?;

        Ok(tag)
    }
}

impl Digest for Argon2Digest {
    fn name(&self) -> &'static str {
        NAME
    }

    fn salt_len(&self) -> usize {
        ARGON2_SALT_LEN
    }

    fn digest(&self, plaintext: &str, salt: &str) -> Result<String, HashError> {
        if salt.len() < ARGON2_MIN_SALT_LEN {
            return Err(HashError::primitive(
                NAME,
                format!("salt must be at least {ARGON2_MIN_SALT_LEN} characters"),
            ));
        }
        if salt.len() > ARGON2_MAX_SALT_LEN {
            return Err(HashError::primitive(
                NAME,
                format!("salt must be at most {ARGON2_MAX_SALT_LEN} characters"),
            ));
        }
        if let Some(c) = salt.chars().find(|c| !is_salt_char(*c)) {
            return Err(HashError::primitive(
                NAME,
                format!("invalid salt character {c:?}"),
            ));
        }

        let params = self.params.to_argon2_params()?;
        let tag = self.derive_tag(params.clone(), plaintext, salt.as_bytes())?;

        let phc_err = |e: password_hash::Error| HashError::primitive(NAME, e.to_string());

        let mut fields = ParamsString::new();
        fields.add_decimal("m", params.m_cost()).map_err(phc_err)?;
        fields.add_decimal("t", params.t_cost()).map_err(phc_err)?;
        fields.add_decimal("p", params.p_cost()).map_err(phc_err)?;

        let phc = PasswordHash {
            algorithm: Ident::new(NAME).map_err(phc_err)?,
            version: Some(Version::V0x13 as u32),
            params: fields,
            salt: Some(PhcSalt::from_b64(salt).map_err(phc_err)?),
            hash: Some(Output::new(&tag[..]).map_err(phc_err)?),
        };

        Ok(phc.to_string())
    }
}
