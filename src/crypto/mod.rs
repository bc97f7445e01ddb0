//! Cryptographic primitives for todovault.
//!
//! This module provides:
//! - scrypt / Argon2id password-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption under a password (`encryption`)
//! - The zeroize-on-drop key wrapper (`keys`)
//!
//! Nothing in here touches the filesystem or knows about tasks.

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, KdfSettings, ...};
pub use encryption::{decrypt, encrypt, Sealed, NONCE_LEN};
pub use kdf::{derive_key, generate_params, generate_salt, KdfAlgorithm, KdfParams, KdfSettings};
pub use keys::DerivedKey;
