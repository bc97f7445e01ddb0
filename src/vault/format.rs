//! On-disk envelope format and atomic file replacement.
//!
//! A `.todo` file is a pretty-printed JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "kdf": { "name": "scrypt", "n": 32768, "r": 8, "p": 1, "salt": "<hex>" },
//!   "nonce": "<hex>",
//!   "data": "<hex ciphertext || 16-byte tag>"
//! }
//! ```
//!
//! - **version**: format version (currently `1`).
//! - **kdf**: algorithm, cost and salt the key was derived with.
//! - **nonce**: 12-byte AES-GCM nonce.
//! - **data**: the encrypted task payload.
//!
//! Envelopes are never patched.  Every save writes a complete new file
//! next to the old one and renames it into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::crypto::{KdfParams, Sealed};
use crate::errors::{Result, TodoVaultError};

/// Current envelope format version.
pub const CURRENT_VERSION: u32 = 1;

/// File extension of vault files.
pub const VAULT_EXTENSION: &str = "todo";

/// The versioned record stored in a vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub kdf: KdfParams,
    #[serde(with = "hex")]
    pub nonce: Vec<u8>,
    #[serde(with = "hex")]
    pub data: Vec<u8>,
}

impl Envelope {
    /// Wrap the output of `crypto::encrypt` in a current-version envelope.
    pub fn from_sealed(sealed: Sealed) -> Self {
        Self {
            version: CURRENT_VERSION,
            kdf: sealed.kdf,
            nonce: sealed.nonce,
            data: sealed.ciphertext,
        }
    }

    /// Parse and sanity-check an envelope.
    ///
    /// Anything structurally wrong (bad JSON or hex, unknown version or
    /// KDF, cost parameters out of range) is `CorruptData`.  Whether the
    /// salt, nonce and ciphertext are genuine is only decided later by
    /// the authentication tag.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| TodoVaultError::CorruptData(format!("envelope: {e}")))?;

        if envelope.version != CURRENT_VERSION {
            return Err(TodoVaultError::CorruptData(format!(
                "unsupported envelope version {}, expected {CURRENT_VERSION}",
                envelope.version
            )));
        }

        envelope
            .kdf
            .validate()
            .map_err(|e| TodoVaultError::CorruptData(format!("kdf params: {e}")))?;

        Ok(envelope)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| TodoVaultError::SerializationError(format!("envelope: {e}")))
    }
}

/// Read and parse the envelope at `path`.
pub fn read_envelope(path: &Path) -> Result<Envelope> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TodoVaultError::VaultNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), size = bytes.len(), "read vault envelope");
    Envelope::from_json(&bytes)
}

/// Write an envelope to `path` **atomically**.
///
/// 1. Serialize the envelope.
/// 2. Write it to a temp file in the same directory and fsync it.
/// 3. Rename the temp file over the target path.
///
/// Readers see either the previous file or the new one, never a mix.
pub fn write_envelope(path: &Path, envelope: &Envelope) -> Result<()> {
    stage_envelope(path, envelope)?.commit()
}

/// Write an envelope to a temp file next to `path` without replacing
/// anything yet.
///
/// The returned handle deletes the temp file when dropped, so an error
/// (or any other early exit) between staging and [`StagedEnvelope::commit`]
/// leaves the directory exactly as it was.
pub fn stage_envelope(path: &Path, envelope: &Envelope) -> Result<StagedEnvelope> {
    let bytes = envelope.to_json()?;

    // Same directory as the target so the rename stays on one filesystem.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".vault-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;

    debug!(
        target_path = %path.display(),
        temp_path = %file.path().display(),
        size = bytes.len(),
        "staged vault envelope"
    );

    Ok(StagedEnvelope {
        file,
        target: path.to_path_buf(),
    })
}

/// A fully written envelope waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedEnvelope {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedEnvelope {
    /// Path of the temp file holding the new envelope.
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically rename the staged file over the target.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.file.persist(&target).map_err(|e| e.error)?;
        sync_parent_dir(&target)?;
        debug!(path = %target.display(), "replaced vault envelope");
        Ok(())
    }
}

/// Make the rename itself durable.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfAlgorithm;
    use tempfile::TempDir;

    fn sample_envelope() -> Envelope {
        Envelope {
            version: CURRENT_VERSION,
            kdf: KdfParams {
                name: KdfAlgorithm::Scrypt,
                n: 32_768,
                r: 8,
                p: 1,
                salt: vec![0x11; 16],
            },
            nonce: vec![0x22; 12],
            data: vec![0x33; 20],
        }
    }

    #[test]
    fn envelope_json_layout() {
        let json: serde_json::Value =
            serde_json::from_slice(&sample_envelope().to_json().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["kdf"]["name"], "scrypt");
        assert_eq!(json["kdf"]["n"], 32_768);
        assert_eq!(json["kdf"]["r"], 8);
        assert_eq!(json["kdf"]["p"], 1);
        assert_eq!(json["kdf"]["salt"], "11".repeat(16));
        assert_eq!(json["nonce"], "22".repeat(12));
        assert_eq!(json["data"], "33".repeat(20));
    }

    #[test]
    fn write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.todo");
        write_envelope(&path, &sample_envelope()).unwrap();
        assert_eq!(read_envelope(&path).unwrap(), sample_envelope());
    }

    #[test]
    fn read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_envelope(&dir.path().join("nope.todo"));
        assert!(matches!(result, Err(TodoVaultError::VaultNotFound(_))));
    }

    #[test]
    fn read_maps_only_not_found_to_vault_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_envelope(&dir.path().join("gone").join("v.todo"));
        assert!(matches!(result, Err(TodoVaultError::VaultNotFound(_))));

        // A directory in place of the file is an IO error, not a missing vault.
        let result = read_envelope(dir.path());
        assert!(matches!(result, Err(TodoVaultError::Io(_))));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut envelope = sample_envelope();
        envelope.version = 2;
        let bytes = envelope.to_json().unwrap();
        assert!(matches!(
            Envelope::from_json(&bytes),
            Err(TodoVaultError::CorruptData(_))
        ));
    }

    #[test]
    fn rejects_bad_hex_and_garbage() {
        let bad_hex = br#"{"version":1,"kdf":{"name":"scrypt","n":32768,"r":8,"p":1,"salt":"zz"},"nonce":"00","data":"00"}"#;
        assert!(matches!(
            Envelope::from_json(bad_hex),
            Err(TodoVaultError::CorruptData(_))
        ));
        assert!(matches!(
            Envelope::from_json(b"\x00\x01garbage"),
            Err(TodoVaultError::CorruptData(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_kdf_cost() {
        let mut envelope = sample_envelope();
        envelope.kdf.n = 1 << 40;
        let bytes = envelope.to_json().unwrap();
        assert!(matches!(
            Envelope::from_json(&bytes),
            Err(TodoVaultError::CorruptData(_))
        ));
    }

    #[test]
    fn dropped_stage_leaves_no_trace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.todo");

        let staged = stage_envelope(&path, &sample_envelope()).unwrap();
        let temp = staged.temp_path().to_path_buf();
        assert!(temp.exists());
        drop(staged);

        assert!(!temp.exists());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
