//! `todo list`: display all tasks in a table.

use crate::cli::output;
use crate::cli::{existing_store, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = existing_store(cli)?;
    let password = prompt_password("Password")?;
    let vault = store.load(password.as_bytes())?;

    if !vault.is_empty() {
        output::info(&format!(
            "{}: {} task(s), {} open",
            store.name(),
            vault.len(),
            vault.pending_count()
        ));
    }

    output::print_tasks_table(vault.tasks());
    Ok(())
}
