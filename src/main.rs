//! Sitemender CLI entry point.

use clap::Parser;

use sitemender::cli::{commands, Cli, Commands};
use sitemender::infrastructure::logging::init_logging;
use sitemender::LoggingConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("failed to initialize logging: {err}");
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fix(args) => commands::fix(args, cli.config, cli.json).await,
        Commands::FixTypes(args) => commands::fix_types(args, cli.config, cli.json).await,
    };

    if let Err(err) = result {
        sitemender::cli::handle_error(err, cli.json);
    }
}
