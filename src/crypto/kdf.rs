//! Password-based key derivation.
//!
//! Two memory-hard KDFs are supported and the choice travels with every
//! envelope, so a vault written with one algorithm (or with older cost
//! settings) can always be opened again:
//!
//! - **scrypt** (default): `n` is the CPU/memory cost, `r` the block size,
//!   `p` the parallelism.
//! - **Argon2id**: `n` is the memory cost in KiB, `r` the iteration count,
//!   `p` the number of lanes.
//!
//! A fresh random salt is drawn for every set of params, which means every
//! save derives a brand-new key.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::keys::DerivedKey;
use crate::errors::{Result, TodoVaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

// scrypt bounds. The upper limits stop a doctored envelope from asking
// for gigabytes of memory before the tag is ever checked.
const MIN_SCRYPT_N: u64 = 1 << 10;
const MAX_SCRYPT_N: u64 = 1 << 20;
const MAX_SCRYPT_R: u32 = 32;
const MAX_SCRYPT_P: u32 = 16;
const MAX_SCRYPT_MEMORY: u64 = 1 << 30;

// Argon2id bounds.
const MIN_ARGON2_MEMORY_KIB: u64 = 8_192;
const MAX_ARGON2_MEMORY_KIB: u64 = 1_048_576;
const MAX_ARGON2_ITERATIONS: u32 = 64;
const MAX_ARGON2_PARALLELISM: u32 = 16;

/// Which key-derivation function produced (or will produce) a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    Scrypt,
    Argon2id,
}

impl KdfAlgorithm {
    /// The identifier written into the envelope's `kdf.name` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scrypt => "scrypt",
            Self::Argon2id => "argon2id",
        }
    }
}

impl fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Algorithm and cost used when sealing new envelopes.
///
/// This is the salt-less half of [`KdfParams`]; it comes from `Settings`
/// (or the defaults) and is turned into concrete params by
/// [`generate_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfSettings {
    pub algorithm: KdfAlgorithm,
    pub n: u64,
    pub r: u32,
    pub p: u32,
}

impl KdfSettings {
    /// scrypt with N = 2^15, r = 8, p = 1 (32 MiB, interactive logins).
    pub const fn scrypt() -> Self {
        Self {
            algorithm: KdfAlgorithm::Scrypt,
            n: 1 << 15,
            r: 8,
            p: 1,
        }
    }

    /// Argon2id with 64 MiB, 3 iterations, 4 lanes.
    pub const fn argon2id() -> Self {
        Self {
            algorithm: KdfAlgorithm::Argon2id,
            n: 65_536,
            r: 3,
            p: 4,
        }
    }

    /// Check the cost parameters against the supported range.
    pub fn validate(&self) -> Result<()> {
        match self.algorithm {
            KdfAlgorithm::Scrypt => validate_scrypt(self.n, self.r, self.p),
            KdfAlgorithm::Argon2id => validate_argon2(self.n, self.r, self.p),
        }
    }
}

impl Default for KdfSettings {
    fn default() -> Self {
        Self::scrypt()
    }
}

/// Everything needed to re-derive a key: algorithm, cost and salt.
///
/// Serialized as the envelope's `kdf` object, with the salt hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub name: KdfAlgorithm,
    pub n: u64,
    pub r: u32,
    pub p: u32,
    #[serde(with = "hex")]
    pub salt: Vec<u8>,
}

impl KdfParams {
    /// The cost half of these params.
    pub fn settings(&self) -> KdfSettings {
        KdfSettings {
            algorithm: self.name,
            n: self.n,
            r: self.r,
            p: self.p,
        }
    }

    /// Reject params that are out of range or carry a short salt.
    pub fn validate(&self) -> Result<()> {
        if self.salt.len() < SALT_LEN {
            return Err(TodoVaultError::KeyDerivationFailed(format!(
                "salt must be at least {SALT_LEN} bytes (got {})",
                self.salt.len()
            )));
        }
        self.settings().validate()
    }
}

/// Build fresh params for `settings` with a newly generated salt.
pub fn generate_params(settings: &KdfSettings) -> Result<KdfParams> {
    settings.validate()?;
    Ok(KdfParams {
        name: settings.algorithm,
        n: settings.n,
        r: settings.r,
        p: settings.p,
        salt: generate_salt().to_vec(),
    })
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Derive a 32-byte key from `password` using the algorithm, cost and
/// salt recorded in `params`.
///
/// The same password + params always produce the same key.
pub fn derive_key(password: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut key = DerivedKey::zeroed();
    match params.name {
        KdfAlgorithm::Scrypt => {
            let log_n = u8::try_from(params.n.trailing_zeros()).map_err(|_| {
                TodoVaultError::KeyDerivationFailed("scrypt N out of range".into())
            })?;
            let scrypt_params = scrypt::Params::new(log_n, params.r, params.p, KEY_LEN)
                .map_err(|e| {
                    TodoVaultError::KeyDerivationFailed(format!("invalid scrypt params: {e}"))
                })?;
            scrypt::scrypt(password, &params.salt, &scrypt_params, key.as_mut_bytes()).map_err(
                |e| TodoVaultError::KeyDerivationFailed(format!("scrypt failed: {e}")),
            )?;
        }
        KdfAlgorithm::Argon2id => {
            let memory_kib = u32::try_from(params.n).map_err(|_| {
                TodoVaultError::KeyDerivationFailed("Argon2 memory cost out of range".into())
            })?;
            let argon2_params = Params::new(memory_kib, params.r, params.p, Some(KEY_LEN))
                .map_err(|e| {
                    TodoVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
                })?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
                .hash_password_into(password, &params.salt, key.as_mut_bytes())
                .map_err(|e| {
                    TodoVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
                })?;
        }
    }

    Ok(key)
}

fn validate_scrypt(n: u64, r: u32, p: u32) -> Result<()> {
    if !n.is_power_of_two() || !(MIN_SCRYPT_N..=MAX_SCRYPT_N).contains(&n) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "scrypt N must be a power of two between {MIN_SCRYPT_N} and {MAX_SCRYPT_N} (got {n})"
        )));
    }
    if !(1..=MAX_SCRYPT_R).contains(&r) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "scrypt r must be between 1 and {MAX_SCRYPT_R} (got {r})"
        )));
    }
    if !(1..=MAX_SCRYPT_P).contains(&p) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "scrypt p must be between 1 and {MAX_SCRYPT_P} (got {p})"
        )));
    }
    if n.trailing_zeros() >= r * 16 {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "scrypt N={n} is too large for r={r}"
        )));
    }
    if 128 * n * u64::from(r) > MAX_SCRYPT_MEMORY {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "scrypt N={n}, r={r} needs more than {MAX_SCRYPT_MEMORY} bytes of memory"
        )));
    }
    Ok(())
}

fn validate_argon2(memory_kib: u64, iterations: u32, parallelism: u32) -> Result<()> {
    if !(MIN_ARGON2_MEMORY_KIB..=MAX_ARGON2_MEMORY_KIB).contains(&memory_kib) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "Argon2 memory must be between {MIN_ARGON2_MEMORY_KIB} and {MAX_ARGON2_MEMORY_KIB} KiB (got {memory_kib})"
        )));
    }
    if !(1..=MAX_ARGON2_ITERATIONS).contains(&iterations) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "Argon2 iterations must be between 1 and {MAX_ARGON2_ITERATIONS} (got {iterations})"
        )));
    }
    if !(1..=MAX_ARGON2_PARALLELISM).contains(&parallelism) {
        return Err(TodoVaultError::KeyDerivationFailed(format!(
            "Argon2 parallelism must be between 1 and {MAX_ARGON2_PARALLELISM} (got {parallelism})"
        )));
    }
    Ok(())
}
