//! Herd CLI entry point
//!
//! Provisions, starts, stops and removes a fixed-size cluster of containers.

use clap::Parser;
use herd::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Commands::Init(args) => herd::cli::init::execute(global, args).await,
        Commands::Run(args) => herd::cli::run::execute(global, args).await,
        Commands::Start(args) => herd::cli::start::execute(global, args).await,
        Commands::Stop(args) => herd::cli::stop::execute(global, args).await,
        Commands::Rm(args) => herd::cli::rm::execute(global, args).await,
        Commands::Status(args) => herd::cli::status::execute(global, args).await,
        Commands::Cp(args) => herd::cli::cp::execute(global, args).await,
        Commands::Cmd(args) => herd::cli::cmd::execute(global, args).await,
    }
}
