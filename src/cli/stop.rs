//! `herd stop` command implementation

use crate::cli::{print_failure, print_progress, GlobalArgs};
use crate::cluster::lifecycle::Orchestrator;
use clap::Args;

/// Arguments for the `stop` command
#[derive(Args)]
pub struct StopArgs {}

/// Execute the `stop` command
pub async fn execute(global: &GlobalArgs, _args: StopArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();
    let orchestrator = Orchestrator::new(&driver, &config)?.on_node(print_progress);

    let report = orchestrator.stop_all().await?;
    print_failure(&report);
    report.into_result()?;

    Ok(())
}
