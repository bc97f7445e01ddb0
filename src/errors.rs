use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in todovault.
#[derive(Debug, Error)]
pub enum TodoVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong password and tampered ciphertext are deliberately the same error.
    #[error("Authentication failed: wrong password or corrupted vault")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault data is corrupt: {0}")]
    CorruptData(String),

    #[error("Invalid vault name: {0}")]
    InvalidVaultName(String),

    // --- Task errors ---
    #[error("Task #{0} not found")]
    TaskNotFound(u64),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for todovault results.
pub type Result<T> = std::result::Result<T, TodoVaultError>;
