//! `todo add`: append a task.

use crate::cli::output;
use crate::cli::{existing_store, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, text: &str) -> Result<()> {
    let store = existing_store(cli)?;
    let password = prompt_password("Password")?;
    let mut vault = store.load(password.as_bytes())?;

    let id = vault.add_task(text)?.id;
    store.save(password.as_bytes(), &vault)?;

    output::success(&format!("Added task #{id}"));
    Ok(())
}
