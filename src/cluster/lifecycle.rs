//! Cluster-wide lifecycle sequences
//!
//! Every sequence walks the nodes in ascending index order and stops at the
//! first node whose step fails. Nothing is rolled back: a failure part way
//! through `run` leaves the earlier containers in place. The returned
//! [`SequenceReport`] says which nodes completed, which one failed and which
//! were never attempted.

use crate::cluster::nodes::{derive_nodes, NodeIdentity};
use crate::network::hosts::{self, HostEntry, HostsFile};
use crate::runtime::driver::{CopyRequest, NodeDriver};
use crate::runtime::state::Operation;
use crate::storage::config::ClusterConfig;
use crate::{HerdError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Container created by `run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub address: String,
}

/// The node a sequence stopped at and why
#[derive(Debug)]
pub struct NodeFailure {
    pub node: NodeIdentity,
    pub error: HerdError,
}

/// Outcome of one operation applied across the cluster
#[derive(Debug)]
pub struct SequenceReport<T = ()> {
    pub operation: Operation,
    pub completed: Vec<(NodeIdentity, T)>,
    pub failure: Option<NodeFailure>,
    pub skipped: Vec<NodeIdentity>,
}

impl<T> SequenceReport<T> {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            completed: Vec::new(),
            failure: None,
            skipped: Vec::new(),
        }
    }

    fn record(&mut self, node: NodeIdentity, value: T) {
        debug!(node = %node.container_name, operation = %self.operation, "node done");
        self.completed.push((node, value));
    }

    fn abort(&mut self, node: NodeIdentity, error: HerdError, rest: &[NodeIdentity]) {
        warn!(node = %node.container_name, error = %error, "aborting sequence");
        self.failure = Some(NodeFailure { node, error });
        self.skipped = rest.to_vec();
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Completed nodes, or the error of the node that failed
    pub fn into_result(self) -> Result<Vec<(NodeIdentity, T)>> {
        match self.failure {
            Some(failure) => Err(failure.error),
            None => Ok(self.completed),
        }
    }
}

/// Per-node progress, emitted while a sequence runs
#[derive(Debug, Clone, Copy)]
pub enum NodeEvent<'e> {
    /// About to apply `operation` to `node`
    Starting {
        operation: Operation,
        node: &'e NodeIdentity,
    },
    /// `operation` succeeded on `node`; `created` is set for `run`
    Done {
        operation: Operation,
        node: &'e NodeIdentity,
        created: Option<&'e Created>,
    },
}

/// Drives every node of one cluster through a lifecycle step
pub struct Orchestrator<'a, D> {
    driver: &'a D,
    config: &'a ClusterConfig,
    nodes: Vec<NodeIdentity>,
    on_node: Option<Box<dyn Fn(NodeEvent<'_>) + 'a>>,
}

impl<'a, D: NodeDriver> Orchestrator<'a, D> {
    pub fn new(driver: &'a D, config: &'a ClusterConfig) -> Result<Self> {
        Ok(Self {
            driver,
            config,
            nodes: derive_nodes(config)?,
            on_node: None,
        })
    }

    /// Observe each node as the sequence reaches it
    pub fn on_node(mut self, observer: impl Fn(NodeEvent<'_>) + 'a) -> Self {
        self.on_node = Some(Box::new(observer));
        self
    }

    fn notify(&self, event: NodeEvent<'_>) {
        if let Some(observer) = &self.on_node {
            observer(event);
        }
    }

    fn starting(&self, operation: Operation, node: &NodeIdentity) {
        self.notify(NodeEvent::Starting { operation, node });
    }

    fn done(&self, operation: Operation, node: &NodeIdentity) {
        self.notify(NodeEvent::Done {
            operation,
            node,
            created: None,
        });
    }

    pub fn nodes(&self) -> &[NodeIdentity] {
        &self.nodes
    }

    /// Create and start every node, then publish the address table.
    ///
    /// The hosts files are written only when every node was created.
    pub async fn create_all(
        &self,
        system_hosts: &HostsFile,
        local_hosts: &Path,
    ) -> Result<SequenceReport<Created>> {
        let dns = self.driver.bridge_address().await?;
        info!(dns = %dns, nodes = self.nodes.len(), image = %self.config.image, "creating cluster");

        let mut report = SequenceReport::new(Operation::Create);
        for (i, node) in self.nodes.iter().enumerate() {
            self.starting(Operation::Create, node);
            match self.create_one(node, &dns).await {
                Ok(created) => {
                    self.notify(NodeEvent::Done {
                        operation: Operation::Create,
                        node,
                        created: Some(&created),
                    });
                    report.record(node.clone(), created);
                }
                Err(e) => {
                    report.abort(node.clone(), e, &self.nodes[i + 1..]);
                    return Ok(report);
                }
            }
        }

        let entries: Vec<HostEntry> = report
            .completed
            .iter()
            .map(|(node, created)| HostEntry::new(created.address.clone(), node.host_alias.clone()))
            .collect();
        system_hosts.write(&entries).await?;
        hosts::write_local(local_hosts, &entries)?;

        Ok(report)
    }

    async fn create_one(&self, node: &NodeIdentity, dns: &str) -> Result<Created> {
        let id = self.driver.create(node, &self.config.image, dns).await?;
        let address = self.driver.address(node).await?;
        Ok(Created { id, address })
    }

    pub async fn start_all(&self) -> Result<SequenceReport> {
        self.transition_all(Operation::Start).await
    }

    pub async fn stop_all(&self) -> Result<SequenceReport> {
        self.transition_all(Operation::Stop).await
    }

    /// Stop every node, then remove every node.
    ///
    /// If stopping fails the stop report is returned and nothing is removed.
    /// After a full removal the managed hosts region is emptied and the local
    /// table deleted.
    pub async fn remove_all(
        &self,
        system_hosts: &HostsFile,
        local_hosts: &Path,
    ) -> Result<SequenceReport> {
        let stopped = self.stop_all().await?;
        if !stopped.is_success() {
            return Ok(stopped);
        }

        let removed = self.transition_all(Operation::Remove).await?;
        if removed.is_success() {
            system_hosts.clear().await?;
            hosts::remove_local(local_hosts)?;
        }
        Ok(removed)
    }

    /// Copy files onto every node's host alias
    pub async fn copy_all(&self, request: &CopyRequest) -> Result<SequenceReport> {
        let mut report = SequenceReport::new(Operation::Copy);
        for (i, node) in self.nodes.iter().enumerate() {
            self.starting(Operation::Copy, node);
            match self.driver.copy_to(node, request).await {
                Ok(()) => {
                    self.done(Operation::Copy, node);
                    report.record(node.clone(), ());
                }
                Err(e) => {
                    report.abort(node.clone(), e, &self.nodes[i + 1..]);
                    break;
                }
            }
        }
        Ok(report)
    }

    async fn transition_all(&self, op: Operation) -> Result<SequenceReport> {
        let mut report = SequenceReport::new(op);
        for (i, node) in self.nodes.iter().enumerate() {
            self.starting(op, node);
            let outcome = match op {
                Operation::Start => self.driver.start(node).await,
                Operation::Stop => self.driver.stop(node).await,
                Operation::Remove => self.driver.remove(node).await,
                other => {
                    return Err(HerdError::InvalidArgument(format!(
                        "{} is not a lifecycle transition",
                        other
                    )))
                }
            };
            match outcome {
                Ok(()) => {
                    self.done(op, node);
                    report.record(node.clone(), ());
                }
                Err(e) => {
                    report.abort(node.clone(), e, &self.nodes[i + 1..]);
                    break;
                }
            }
        }
        Ok(report)
    }
}
