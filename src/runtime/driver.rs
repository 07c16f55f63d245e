//! Node operations backed by external tools

use crate::cluster::nodes::NodeIdentity;
use crate::network::bridge::{self, DEFAULT_BRIDGE};
use crate::runtime::command::{CommandOutput, CommandRunner};
use crate::runtime::state::{NodeState, Operation};
use crate::{HerdError, Result};
use tracing::warn;

/// Default container runtime CLI
pub const DEFAULT_RUNTIME: &str = "docker";

const IP_FORMAT: &str = "{{ .NetworkSettings.IPAddress }}";
const RUNNING_FORMAT: &str = "{{ .State.Running }}";

/// Files to copy onto every node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub sources: Vec<String>,
    pub target: String,
    pub recursive: bool,
}

impl CopyRequest {
    /// `scp` arguments copying the sources to `host`
    pub fn scp_args(&self, host: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(self.sources.len() + 2);
        if self.recursive {
            args.push("-r".to_string());
        }
        args.extend(self.sources.iter().cloned());
        args.push(format!("{}:{}", host, self.target));
        args
    }
}

/// Everything the orchestrator needs from the outside world.
///
/// Lifecycle operations are fallible and report a non-zero exit as
/// [`HerdError::CommandFailed`]. State queries never fail: anything the
/// runtime cannot inspect is [`NodeState::NoContainer`].
#[allow(async_fn_in_trait)]
pub trait NodeDriver {
    /// IPv4 address of the host on the container bridge
    async fn bridge_address(&self) -> Result<String>;

    /// Create and start a detached container for `node`, returning its id
    async fn create(&self, node: &NodeIdentity, image: &str, dns: &str) -> Result<String>;

    /// Address assigned to the node's container
    async fn address(&self, node: &NodeIdentity) -> Result<String>;

    async fn start(&self, node: &NodeIdentity) -> Result<()>;

    async fn stop(&self, node: &NodeIdentity) -> Result<()>;

    async fn remove(&self, node: &NodeIdentity) -> Result<()>;

    async fn state(&self, node: &NodeIdentity) -> NodeState;

    async fn copy_to(&self, node: &NodeIdentity, request: &CopyRequest) -> Result<()>;
}

/// Driver shelling out to a docker-compatible CLI, `ip` and `scp`
#[derive(Debug, Clone)]
pub struct SystemDriver {
    runner: CommandRunner,
    runtime: String,
    bridge: String,
}

impl SystemDriver {
    pub fn new(runtime: impl Into<String>, bridge: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(),
            runtime: runtime.into(),
            bridge: bridge.into(),
        }
    }

    async fn runtime_capture(&self, args: Vec<String>, quiet: bool) -> Result<CommandOutput> {
        self.runner.capture(&self.runtime, &args, quiet).await
    }

    async fn transition(&self, op: Operation, verb: &str, node: &NodeIdentity) -> Result<()> {
        let args = vec![verb.to_string(), node.container_name.clone()];
        let out = self.runtime_capture(args, false).await?;
        check(op, node, &out)
    }
}

impl Default for SystemDriver {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME, DEFAULT_BRIDGE)
    }
}

fn check(op: Operation, node: &NodeIdentity, out: &CommandOutput) -> Result<()> {
    if out.success() {
        Ok(())
    } else {
        Err(HerdError::CommandFailed {
            operation: op,
            node: node.container_name.clone(),
            code: out.code,
        })
    }
}

impl NodeDriver for SystemDriver {
    async fn bridge_address(&self) -> Result<String> {
        let out = self
            .runner
            .capture("ip", &bridge::ip_args(&self.bridge), false)
            .await?;
        if !out.success() {
            return Err(HerdError::HostAddress(format!(
                "ip exited with {:?} for interface {}",
                out.code, self.bridge
            )));
        }
        bridge::parse_inet_address(&out.stdout).ok_or_else(|| {
            HerdError::HostAddress(format!("no IPv4 address on interface {}", self.bridge))
        })
    }

    async fn create(&self, node: &NodeIdentity, image: &str, dns: &str) -> Result<String> {
        let args = vec![
            "run".to_string(),
            "-d".to_string(),
            "-h".to_string(),
            node.host_alias.clone(),
            format!("--dns={}", dns),
            "--name".to_string(),
            node.container_name.clone(),
            image.to_string(),
        ];
        let out = self.runtime_capture(args, false).await?;
        check(Operation::Create, node, &out)?;
        Ok(out.line().to_string())
    }

    async fn address(&self, node: &NodeIdentity) -> Result<String> {
        let args = vec![
            "inspect".to_string(),
            "--format".to_string(),
            IP_FORMAT.to_string(),
            node.container_name.clone(),
        ];
        let out = self.runtime_capture(args, false).await?;
        check(Operation::Inspect, node, &out)?;
        Ok(out.line().trim().to_string())
    }

    async fn start(&self, node: &NodeIdentity) -> Result<()> {
        self.transition(Operation::Start, "start", node).await
    }

    async fn stop(&self, node: &NodeIdentity) -> Result<()> {
        self.transition(Operation::Stop, "stop", node).await
    }

    async fn remove(&self, node: &NodeIdentity) -> Result<()> {
        self.transition(Operation::Remove, "rm", node).await
    }

    async fn state(&self, node: &NodeIdentity) -> NodeState {
        let args = vec![
            "inspect".to_string(),
            "--format".to_string(),
            RUNNING_FORMAT.to_string(),
            node.container_name.clone(),
        ];
        match self.runtime_capture(args, true).await {
            Ok(out) if out.success() => NodeState::from_running_flag(out.line()),
            Ok(_) => NodeState::NoContainer,
            Err(e) => {
                warn!(node = %node.container_name, error = %e, "inspection failed");
                NodeState::NoContainer
            }
        }
    }

    async fn copy_to(&self, node: &NodeIdentity, request: &CopyRequest) -> Result<()> {
        let args = request.scp_args(&node.host_alias);
        let code = self.runner.passthrough("scp", &args).await?;
        check(
            Operation::Copy,
            node,
            &CommandOutput {
                code,
                stdout: String::new(),
            },
        )
    }
}
