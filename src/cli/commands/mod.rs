//! One module per subcommand.  Each exposes an `execute` function.

pub mod add;
pub mod change_password;
pub mod clear;
pub mod done;
pub mod init;
pub mod list;
pub mod remove;
pub mod vaults;
