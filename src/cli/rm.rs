//! `herd rm` command implementation

use crate::cli::{print_failure, print_progress, GlobalArgs};
use crate::cluster::lifecycle::Orchestrator;
use clap::Args;

/// Arguments for the `rm` command
#[derive(Args)]
pub struct RmArgs {}

/// Execute the `rm` command
pub async fn execute(global: &GlobalArgs, _args: RmArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();
    let paths = global.paths();
    let orchestrator = Orchestrator::new(&driver, &config)?.on_node(print_progress);

    let report = orchestrator
        .remove_all(&global.system_hosts(), paths.local_hosts())
        .await?;

    print_failure(&report);
    report.into_result()?;

    Ok(())
}
