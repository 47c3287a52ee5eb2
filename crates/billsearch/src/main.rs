mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { db } => commands::init::run(&db),
        Commands::Ingest { db, file } => commands::ingest::run(&db, &file, &config),
        Commands::Precompute { db } => commands::precompute::run(&db, &config),
        Commands::Search(args) => commands::search::run(args, config),
        Commands::Passages {
            db,
            bill,
            query,
            count,
        } => commands::passages::run(&db, bill, &query, count, config),
        Commands::Status { db } => commands::status::run(&db),
    }
}
