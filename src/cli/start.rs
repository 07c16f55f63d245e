//! `herd start` command implementation

use crate::cli::{print_failure, print_progress, GlobalArgs};
use crate::cluster::lifecycle::Orchestrator;
use clap::Args;

/// Arguments for the `start` command
#[derive(Args)]
pub struct StartArgs {}

/// Execute the `start` command
pub async fn execute(global: &GlobalArgs, _args: StartArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();
    let orchestrator = Orchestrator::new(&driver, &config)?.on_node(print_progress);

    let report = orchestrator.start_all().await?;
    print_failure(&report);
    report.into_result()?;

    Ok(())
}
