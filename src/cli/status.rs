//! `herd status` command implementation

use crate::cli::GlobalArgs;
use crate::cluster::status;
use clap::Args;

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Verbose output: configuration and node addresses as JSON
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `status` command
pub async fn execute(global: &GlobalArgs, args: StatusArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();

    let report = status::collect(&driver, &config, args.verbose).await?;
    if args.verbose {
        println!("{}", report.to_json()?);
    } else {
        for line in report.terse_lines() {
            println!("{}", line);
        }
    }

    Ok(())
}
