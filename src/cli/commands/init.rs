//! `todo init`: create a new, empty vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{context, prompt_new_password, Cli, PASSWORD_ENV};
use crate::errors::{Result, TodoVaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let store = context(cli)?.store;

    // 1. Refuse to clobber an existing vault unless asked to.
    if store.exists() {
        if !force {
            output::tip("Use `todo init --force` to overwrite it (all tasks are lost).");
            return Err(TodoVaultError::VaultAlreadyExists(store.path().to_path_buf()));
        }

        // Interactive overwrite still gets a last chance to back out.
        if std::env::var_os(PASSWORD_ENV).is_none() {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Overwrite vault '{}'? Its tasks cannot be recovered",
                    store.name()
                ))
                .default(false)
                .interact()
                .map_err(|e| TodoVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

            if !confirmed {
                output::info("Cancelled.");
                return Ok(());
            }
        }
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password("Set password", PASSWORD_ENV)?;

    // 3. Write the empty vault.
    if force {
        store.initialize_overwriting(password.as_bytes())?;
    } else {
        store.initialize(password.as_bytes())?;
    }

    output::success(&format!(
        "Initialized encrypted vault '{}' at {}",
        store.name(),
        store.path().display()
    ));
    output::tip("Run `todo add <TEXT>` to add a task.");

    Ok(())
}
