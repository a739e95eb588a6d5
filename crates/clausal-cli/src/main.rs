//! Clausal CLI - extract clauses and definitions from contracts.

use clap::Parser;
use clausal_cli::commands;
use clausal_cli::{Cli, CliError, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error [{}]: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> clausal_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);
    let database = config.database_path(cli.database.as_deref())?;

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config, &database, &formatter).await?;
        }
        Command::List => commands::execute_list(&database, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &database, &formatter)?,
        Command::Config => commands::execute_config(&config, &database, &formatter)?,
    }

    Ok::<(), CliError>(())
}

/// Logs go to stderr so stdout stays parseable; RUST_LOG overrides `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
