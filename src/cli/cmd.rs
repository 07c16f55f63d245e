//! `herd cmd` command, reserved

use crate::cli::GlobalArgs;
use crate::HerdError;
use clap::Args;

/// Arguments for the `cmd` command
#[derive(Args)]
pub struct CmdArgs {}

/// Execute the `cmd` command
pub async fn execute(_global: &GlobalArgs, _args: CmdArgs) -> anyhow::Result<()> {
    Err(HerdError::Unimplemented("cmd".to_string()).into())
}
