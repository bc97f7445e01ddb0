//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` ties one named vault file to the crypto layer: it turns a
//! `Vault` into an encrypted envelope on save and back on load.  It never
//! keeps the password, the key, or the decrypted vault around between
//! calls.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{self, KdfSettings};
use crate::errors::{Result, TodoVaultError};

use super::format::{self, Envelope, VAULT_EXTENSION};
use super::task::Vault;

/// Name used when the user does not pick a vault.
pub const DEFAULT_VAULT_NAME: &str = "vault";

/// Handle to a single vault file: `<dir>/<name>.todo`.
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Path to the `.todo` file on disk.
    path: PathBuf,

    /// Vault name (file stem).
    name: String,

    /// KDF algorithm and cost used for new envelopes.
    kdf: KdfSettings,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Handle for vault `name` inside `dir`, using the default KDF settings.
    ///
    /// Nothing is read or written yet.
    pub fn new(dir: &Path, name: &str) -> Result<Self> {
        Self::with_kdf(dir, name, KdfSettings::default())
    }

    /// Like [`VaultStore::new`] but with explicit KDF settings for saves.
    ///
    /// Loading always uses whatever params the envelope carries.
    pub fn with_kdf(dir: &Path, name: &str, kdf: KdfSettings) -> Result<Self> {
        validate_vault_name(name)?;
        kdf.validate()?;
        Ok(Self {
            path: vault_path(dir, name),
            name: name.to_string(),
            kdf,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Returns `true` if the vault file is present.  No decryption.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create a new, empty vault.
    ///
    /// Fails with `VaultAlreadyExists` if the file is already there; use
    /// [`VaultStore::initialize_overwriting`] to replace it on purpose.
    pub fn initialize(&self, password: &[u8]) -> Result<Vault> {
        if self.exists() {
            return Err(TodoVaultError::VaultAlreadyExists(self.path.clone()));
        }
        self.write_empty(password)
    }

    /// Create a new, empty vault, replacing any existing one.
    pub fn initialize_overwriting(&self, password: &[u8]) -> Result<Vault> {
        self.write_empty(password)
    }

    fn write_empty(&self, password: &[u8]) -> Result<Vault> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let vault = Vault::empty();
        self.seal(password, &vault)?.commit()?;
        debug!(vault = %self.name, "initialized vault");
        Ok(vault)
    }

    /// Decrypt and parse the vault.
    ///
    /// - `VaultNotFound` if the file is missing.
    /// - `AuthenticationFailed` for a wrong password or tampered data.
    /// - `CorruptData` if the envelope or the decrypted payload is malformed.
    pub fn load(&self, password: &[u8]) -> Result<Vault> {
        let envelope = format::read_envelope(&self.path)?;

        debug!(
            vault = %self.name,
            kdf = %envelope.kdf.name,
            "decrypting vault"
        );
        let plaintext =
            crypto::decrypt(password, &envelope.kdf, &envelope.nonce, &envelope.data)?;

        let vault = Vault::from_json(&plaintext)?;
        debug!(vault = %self.name, tasks = vault.len(), "loaded vault");
        Ok(vault)
    }

    /// Encrypt `vault` under a freshly derived key and atomically replace
    /// the file.
    ///
    /// A new salt is drawn on every call, even when nothing changed.
    /// Only `initialize` creates a vault file; saving to a missing one is
    /// `VaultNotFound`.
    pub fn save(&self, password: &[u8], vault: &Vault) -> Result<()> {
        self.stage(password, vault)?.commit()?;
        debug!(vault = %self.name, tasks = vault.len(), "saved vault");
        Ok(())
    }

    /// Encrypt `vault` and write it next to the vault file without
    /// replacing it yet.  Dropping the result discards the new envelope.
    pub fn stage(&self, password: &[u8], vault: &Vault) -> Result<format::StagedEnvelope> {
        if !self.exists() {
            return Err(TodoVaultError::VaultNotFound(self.path.clone()));
        }
        self.seal(password, vault)
    }

    fn seal(&self, password: &[u8], vault: &Vault) -> Result<format::StagedEnvelope> {
        let plaintext = Zeroizing::new(vault.to_json()?);
        let sealed = crypto::encrypt(password, &plaintext, &self.kdf)?;
        format::stage_envelope(&self.path, &Envelope::from_sealed(sealed))
    }

    /// Re-encrypt the vault under a new password.
    ///
    /// The vault is fully decrypted with `old_password` first; if that
    /// fails for any reason the file is not touched.  The new envelope is
    /// then swapped in with the same atomic replace as [`VaultStore::save`].
    pub fn change_password(&self, old_password: &[u8], new_password: &[u8]) -> Result<Vault> {
        let vault = self.load(old_password)?;
        self.save(new_password, &vault)?;
        debug!(vault = %self.name, "changed vault password");
        Ok(vault)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the vault name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the KDF settings used for saves.
    pub fn kdf_settings(&self) -> &KdfSettings {
        &self.kdf
    }
}

// ----------------------------------------------------------------------
// Directory-level operations
// ----------------------------------------------------------------------

/// Build the path of vault `name` inside `dir`.
///
/// Example: `dir/work.todo`
pub fn vault_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{VAULT_EXTENSION}"))
}

/// Names of all vaults in `dir`, sorted.  No decryption is attempted.
///
/// A missing directory simply has no vaults.
pub fn list_vaults(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == VAULT_EXTENSION) {
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Delete vault `name` from `dir`.  Returns whether a file was removed.
///
/// Irreversible; any confirmation belongs to the caller.
pub fn delete_vault(dir: &Path, name: &str) -> Result<bool> {
    validate_vault_name(name)?;
    let path = vault_path(dir, name);

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path)?;
    debug!(vault = %name, path = %path.display(), "deleted vault");
    Ok(true)
}

/// Validate that a vault name is safe to use as a file stem.
///
/// Allowed: ASCII letters, digits, hyphens and underscores.  Must be
/// non-empty, at most 64 characters, and not start with a hyphen.
pub fn validate_vault_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TodoVaultError::InvalidVaultName(
            "vault name cannot be empty".into(),
        ));
    }

    if name.len() > 64 {
        return Err(TodoVaultError::InvalidVaultName(
            "vault name cannot exceed 64 characters".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TodoVaultError::InvalidVaultName(format!(
            "'{name}' may only contain ASCII letters, digits, hyphens, and underscores"
        )));
    }

    if name.starts_with('-') {
        return Err(TodoVaultError::InvalidVaultName(format!(
            "'{name}' cannot start with a hyphen"
        )));
    }

    Ok(())
}
