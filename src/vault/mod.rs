//! Vault module: the encrypted task store.
//!
//! This module provides:
//! - `Task` and `Vault`, the in-memory task list (`task`)
//! - The JSON envelope format and atomic file replacement (`format`)
//! - `VaultStore` plus directory-level helpers (`store`)

pub mod format;
pub mod store;
pub mod task;

// Re-export the most commonly used items.
pub use format::{Envelope, StagedEnvelope, CURRENT_VERSION};
pub use store::{delete_vault, list_vaults, validate_vault_name, VaultStore, DEFAULT_VAULT_NAME};
pub use task::{Task, Vault};
