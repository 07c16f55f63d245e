//! `herd cp` command implementation

use crate::cli::{print_failure, GlobalArgs};
use crate::cluster::lifecycle::{NodeEvent, Orchestrator};
use crate::runtime::command::render;
use crate::runtime::driver::CopyRequest;
use clap::Args;

/// Arguments for the `cp` command
#[derive(Args)]
pub struct CpArgs {
    /// Copy recursively
    #[arg(short = 'r')]
    pub recursive: bool,

    /// Source file or files
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Target file or directory on every node
    pub target: String,
}

/// Execute the `cp` command
pub async fn execute(global: &GlobalArgs, args: CpArgs) -> anyhow::Result<()> {
    let config = global.load_config()?;
    let driver = global.driver();
    let request = CopyRequest {
        sources: args.sources,
        target: args.target,
        recursive: args.recursive,
    };
    let orchestrator = Orchestrator::new(&driver, &config)?.on_node(|event| {
        if let NodeEvent::Starting { node, .. } = event {
            println!("{}", render("scp", &request.scp_args(&node.host_alias)));
        }
    });
    let report = orchestrator.copy_all(&request).await?;
    print_failure(&report);
    report.into_result()?;

    Ok(())
}
