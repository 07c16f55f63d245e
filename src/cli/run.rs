//! `herd run` command implementation

use crate::cli::{print_failure, print_progress, GlobalArgs};
use crate::cluster::lifecycle::Orchestrator;
use clap::Args;

/// Arguments for the `run` command
#[derive(Args)]
pub struct RunArgs {}

/// Execute the `run` command
pub async fn execute(global: &GlobalArgs, _args: RunArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();
    let paths = global.paths();
    let orchestrator = Orchestrator::new(&driver, &config)?.on_node(print_progress);

    let report = orchestrator
        .create_all(&global.system_hosts(), paths.local_hosts())
        .await?;

    print_failure(&report);
    report.into_result()?;

    Ok(())
}
