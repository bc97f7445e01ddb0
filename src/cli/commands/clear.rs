//! `todo clear`: drop all completed tasks.

use crate::cli::output;
use crate::cli::{existing_store, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `clear` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = existing_store(cli)?;
    let password = prompt_password("Password")?;
    let mut vault = store.load(password.as_bytes())?;

    let count = vault.clear_completed();
    store.save(password.as_bytes(), &vault)?;

    output::success(&format!("Cleared {count} completed task(s)"));
    Ok(())
}
