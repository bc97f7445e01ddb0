use clap::Parser;
use todovault::cli::{commands, Cli, Commands, VaultsAction};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics only; silent unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(&cli, force),
        Commands::Add { ref text } => commands::add::execute(&cli, text),
        Commands::List => commands::list::execute(&cli),
        Commands::Done { id } => commands::done::execute(&cli, id, true),
        Commands::Undo { id } => commands::done::execute(&cli, id, false),
        Commands::Remove { id } => commands::remove::execute(&cli, id),
        Commands::Clear => commands::clear::execute(&cli),
        Commands::ChangePassword => commands::change_password::execute(&cli),
        Commands::Vaults { ref action } => match action {
            VaultsAction::List => commands::vaults::execute_list(&cli),
            VaultsAction::Delete { ref name, force } => {
                commands::vaults::execute_delete(&cli, name, *force)
            }
        },
    };

    if let Err(e) = result {
        todovault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
