//! `todo vaults list` / `todo vaults delete`: manage vault files.

use comfy_table::{ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{context, Cli};
use crate::errors::{Result, TodoVaultError};
use crate::vault::{self, validate_vault_name};

/// Execute `todo vaults list`.
pub fn execute_list(cli: &Cli) -> Result<()> {
    let ctx = context(cli)?;
    let names = vault::list_vaults(&ctx.vault_dir)?;

    if names.is_empty() {
        output::info(&format!("No vaults found in {}", ctx.vault_dir.display()));
        output::tip("Run `todo init` to create your first vault.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault", "Active"]);

    for name in &names {
        let active = if name == ctx.store.name() {
            style("*").green().bold().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![name.clone(), active]);
    }

    output::info(&format!("{} vault(s) found:", names.len()));
    println!("{table}");

    Ok(())
}

/// Execute `todo vaults delete <name>`.
pub fn execute_delete(cli: &Cli, name: &str, force: bool) -> Result<()> {
    validate_vault_name(name)?;
    let ctx = context(cli)?;

    let path = vault::store::vault_path(&ctx.vault_dir, name);
    if !path.exists() {
        return Err(TodoVaultError::VaultNotFound(path));
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete vault '{name}'? This cannot be undone"))
            .default(false)
            .interact()
            .map_err(|e| TodoVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !vault::delete_vault(&ctx.vault_dir, name)? {
        return Err(TodoVaultError::VaultNotFound(path));
    }

    output::success(&format!(
        "Deleted vault '{name}' ({} removed)",
        path.display()
    ));
    Ok(())
}
