//! AES-256-GCM authenticated encryption under a password.
//!
//! `encrypt` draws fresh KDF params (and therefore a fresh key) plus a
//! random 12-byte nonce for every call, so a nonce is never reused under
//! the same key.  The caller gets back everything needed to decrypt
//! again except the password itself.
//!
//! No associated data is used.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_params, KdfParams, KdfSettings};
use crate::errors::{Result, TodoVaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Output of [`encrypt`]: the params the key was derived with, the nonce,
/// and the ciphertext with its 16-byte tag appended.
#[derive(Debug, Clone)]
pub struct Sealed {
    pub kdf: KdfParams,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a key freshly derived from `password`.
pub fn encrypt(password: &[u8], plaintext: &[u8], settings: &KdfSettings) -> Result<Sealed> {
    let kdf = generate_params(settings)?;
    let key = derive_key(password, &kdf)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| TodoVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;
    drop(key);

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| TodoVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Sealed {
        kdf,
        nonce: nonce.to_vec(),
        ciphertext,
    })
}

/// Decrypt `ciphertext` with a key derived from `password` and `kdf`.
///
/// A wrong password and a tampered nonce, salt or ciphertext all produce
/// the same `AuthenticationFailed` error.
pub fn decrypt(
    password: &[u8],
    kdf: &KdfParams,
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN {
        return Err(TodoVaultError::AuthenticationFailed);
    }

    let key = derive_key(password, kdf)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| TodoVaultError::AuthenticationFailed)?;
    drop(key);

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| TodoVaultError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}
