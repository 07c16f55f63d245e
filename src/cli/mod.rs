//! CLI command definitions and handlers

pub mod cmd;
pub mod cp;
pub mod init;
pub mod rm;
pub mod run;
pub mod start;
pub mod status;
pub mod stop;

use crate::cluster::lifecycle::{NodeEvent, SequenceReport};
use crate::network::bridge::DEFAULT_BRIDGE;
use crate::network::hosts::HostsFile;
use crate::runtime::driver::{SystemDriver, DEFAULT_RUNTIME};
use crate::storage::config::{ClusterConfig, ConfigStore};
use crate::storage::paths::{HerdPaths, SYSTEM_HOSTS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Herd - manage a cluster of containers
#[derive(Parser)]
#[command(name = "herd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Cluster config file [default: ./cluster]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container runtime CLI to invoke
    #[arg(long, global = true, default_value = DEFAULT_RUNTIME)]
    pub runtime: String,

    /// Bridge interface whose address is handed to nodes as DNS server
    #[arg(long, global = true, default_value = DEFAULT_BRIDGE)]
    pub bridge: String,

    /// System hosts file holding the managed region
    #[arg(long, global = true, value_name = "PATH", default_value = SYSTEM_HOSTS)]
    pub hosts_file: PathBuf,
}

impl GlobalArgs {
    pub fn paths(&self) -> HerdPaths {
        let paths = HerdPaths::new().with_system_hosts(&self.hosts_file);
        match &self.config {
            Some(config) => paths.with_config(config),
            None => paths,
        }
    }

    pub fn driver(&self) -> SystemDriver {
        SystemDriver::new(&self.runtime, &self.bridge)
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(self.paths().config())
    }

    pub fn load_config(&self) -> crate::Result<ClusterConfig> {
        self.config_store().load()
    }

    pub fn system_hosts(&self) -> HostsFile {
        HostsFile::new(self.paths().system_hosts())
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Init the cluster
    Init(init::InitArgs),

    /// Run the cluster
    Run(run::RunArgs),

    /// Start the cluster
    Start(start::StartArgs),

    /// Stop the cluster
    Stop(stop::StopArgs),

    /// Remove the cluster
    Rm(rm::RmArgs),

    /// Get status of the cluster
    Status(status::StatusArgs),

    /// Copies files to all nodes
    Cp(cp::CpArgs),

    /// Execute command on all nodes
    Cmd(cmd::CmdArgs),
}

/// Print a progress line as soon as a node completes
pub(crate) fn print_progress(event: NodeEvent<'_>) {
    if let NodeEvent::Done {
        operation,
        node,
        created,
    } = event
    {
        match created {
            Some(created) => println!(
                "Created container {}, id = {}, ip = {}",
                node.container_name, created.id, created.address
            ),
            None => println!("{} container {}", operation.progress(), node.container_name),
        }
    }
}

/// On failure, tell which node failed and which nodes were never attempted
pub(crate) fn print_failure<T>(report: &SequenceReport<T>) {
    let Some(failure) = &report.failure else {
        return;
    };
    eprintln!(
        "Failed to {} container {}",
        report.operation, failure.node.container_name
    );
    if !report.skipped.is_empty() {
        let skipped: Vec<&str> = report
            .skipped
            .iter()
            .map(|n| n.container_name.as_str())
            .collect();
        eprintln!("Not attempted: {}", skipped.join(", "));
    }
}
