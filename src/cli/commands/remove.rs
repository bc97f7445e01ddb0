//! `todo remove`: delete a task.

use crate::cli::output;
use crate::cli::{existing_store, prompt_password, Cli};
use crate::errors::{Result, TodoVaultError};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, id: u64) -> Result<()> {
    let store = existing_store(cli)?;
    let password = prompt_password("Password")?;
    let mut vault = store.load(password.as_bytes())?;

    if !vault.remove_task(id) {
        return Err(TodoVaultError::TaskNotFound(id));
    }
    store.save(password.as_bytes(), &vault)?;

    output::success(&format!("Removed #{id}"));
    Ok(())
}
