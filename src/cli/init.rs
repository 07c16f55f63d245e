//! `herd init` command implementation

use crate::cli::GlobalArgs;
use crate::storage::config::{ClusterConfig, DEFAULT_HOST, DEFAULT_NAME, DEFAULT_NUMBER};
use clap::Args;

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Image every node is created from
    pub image: String,

    /// Container name prefix
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Host alias prefix
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Number of nodes
    #[arg(long, default_value_t = DEFAULT_NUMBER, value_parser = clap::value_parser!(u32).range(1..))]
    pub number: u32,
}

/// Execute the `init` command
pub async fn execute(global: &GlobalArgs, args: InitArgs) -> anyhow::Result<()> {
    let store = global.config_store();
    let config = ClusterConfig {
        name: args.name,
        host: args.host,
        image: args.image,
        number: args.number,
    };

    store.create(&config)?;
    println!(
        "Initialized {} node cluster in {}",
        config.number,
        store.path().display()
    );

    Ok(())
}
