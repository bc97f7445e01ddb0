//! `todo done` / `todo undo`: set a task's completion flag.

use crate::cli::output;
use crate::cli::{existing_store, prompt_password, Cli};
use crate::errors::Result;

/// Execute `done` (`done = true`) or `undo` (`done = false`).
pub fn execute(cli: &Cli, id: u64, done: bool) -> Result<()> {
    let store = existing_store(cli)?;
    let password = prompt_password("Password")?;
    let mut vault = store.load(password.as_bytes())?;

    vault.set_done(id, done)?;
    store.save(password.as_bytes(), &vault)?;

    if done {
        output::success(&format!("Marked #{id} done"));
    } else {
        output::success(&format!("Marked #{id} not done"));
    }
    Ok(())
}
