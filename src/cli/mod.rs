//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, TodoVaultError};
use crate::vault::VaultStore;

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the vault password (scripts, CI).
pub const PASSWORD_ENV: &str = "TODOVAULT_PASSWORD";

/// Environment variable holding the new password for `change-password`.
pub const NEW_PASSWORD_ENV: &str = "TODOVAULT_NEW_PASSWORD";

/// todo: a password-protected, encrypted task list.
#[derive(Parser)]
#[command(name = "todo", about = "Encrypted todo list", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault to use (default: from config, else "vault")
    #[arg(short, long, global = true)]
    pub vault: Option<String>,

    /// Directory holding vault files
    #[arg(long, global = true, env = "TODOVAULT_DIR")]
    pub vault_dir: Option<PathBuf>,

    /// Path to todovault.toml
    #[arg(long, global = true, env = "TODOVAULT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init {
        /// Overwrite an existing vault (its tasks are lost)
        #[arg(long)]
        force: bool,
    },

    /// Add a task
    Add {
        /// Task text
        text: String,
    },

    /// List tasks
    List,

    /// Mark a task done
    Done {
        /// Task id
        id: u64,
    },

    /// Mark a task not done
    Undo {
        /// Task id
        id: u64,
    },

    /// Remove a task
    Remove {
        /// Task id
        id: u64,
    },

    /// Remove all completed tasks
    Clear,

    /// Change the vault password
    ChangePassword,

    /// Manage vaults (list, delete)
    Vaults {
        #[command(subcommand)]
        action: VaultsAction,
    },
}

/// Vaults subcommands.
#[derive(clap::Subcommand)]
pub enum VaultsAction {
    /// List all vaults in the vault directory
    List,

    /// Delete a vault
    Delete {
        /// Vault name to delete
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs to reach its vault.
pub struct Context {
    pub vault_dir: PathBuf,
    pub store: VaultStore,
}

/// Load settings and build the store for the selected vault.
pub fn context(cli: &Cli) -> Result<Context> {
    let settings = Settings::load_from(cli.config.as_deref())?;
    let vault_dir = settings.vault_dir(cli.vault_dir.as_deref())?;
    let name = cli.vault.as_deref().unwrap_or(&settings.default_vault);
    let store = VaultStore::with_kdf(&vault_dir, name, settings.kdf_settings()?)?;

    Ok(Context { vault_dir, store })
}

/// Build the store and make sure its file exists.
pub fn existing_store(cli: &Cli) -> Result<VaultStore> {
    let ctx = context(cli)?;
    if !ctx.store.exists() {
        output::tip("Run `todo init` to create a vault.");
        return Err(TodoVaultError::VaultNotFound(ctx.store.path().to_path_buf()));
    }
    Ok(ctx.store)
}

/// Get the vault password from `TODOVAULT_PASSWORD` or an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| TodoVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation.
///
/// `env_var` lets scripts supply the password instead.  Enforces a
/// minimum password length either way.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password(prompt: &str, env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(TodoVaultError::CommandFailed(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt(prompt)
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| TodoVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}
