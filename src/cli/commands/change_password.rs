//! `todo change-password`: re-encrypt the vault under a new password.
//!
//! The vault is decrypted with the current password first; nothing is
//! written unless that succeeds.  The new envelope (fresh salt, fresh
//! key) then replaces the old file atomically.

use crate::cli::output;
use crate::cli::{existing_store, prompt_new_password, prompt_password, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `change-password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = existing_store(cli)?;

    output::info("Enter your current vault password.");
    let old_password = prompt_password("Current password")?;

    // Check the old password before asking for a new one.
    let vault = store.load(old_password.as_bytes())?;

    output::info("Choose your new vault password.");
    let new_password = prompt_new_password("New password", NEW_PASSWORD_ENV)?;

    store.save(new_password.as_bytes(), &vault)?;

    output::success(&format!(
        "Password changed for '{}' ({} task(s) re-encrypted)",
        store.name(),
        vault.len()
    ));
    Ok(())
}
