//! Per-node runtime status

use crate::cluster::nodes::{derive_nodes, NodeIdentity};
use crate::runtime::driver::NodeDriver;
use crate::runtime::state::NodeState;
use crate::storage::config::ClusterConfig;
use crate::Result;
use serde::Serialize;

/// Status of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
    pub name: String,
    pub host: String,
    pub status: NodeState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// Cluster configuration together with the live state of its nodes
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub configuration: ClusterConfig,
    pub cluster: Vec<NodeStatus>,
}

impl StatusReport {
    /// One `name : state` line per node
    pub fn terse_lines(&self) -> Vec<String> {
        self.cluster
            .iter()
            .map(|node| format!("{} : {}", node.name, node.status))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Live state of `node`; a failed inspection reads as no container
pub async fn query_node_state<D: NodeDriver>(driver: &D, node: &NodeIdentity) -> NodeState {
    driver.state(node).await
}

/// Query every node in index order, resolving addresses when `with_addresses`
/// is set and a container exists
pub async fn collect<D: NodeDriver>(
    driver: &D,
    config: &ClusterConfig,
    with_addresses: bool,
) -> Result<StatusReport> {
    let mut cluster = Vec::new();
    for node in derive_nodes(config)? {
        let status = query_node_state(driver, &node).await;
        let ip = if with_addresses && status.exists() {
            Some(driver.address(&node).await?)
        } else {
            None
        };
        cluster.push(NodeStatus {
            name: node.container_name,
            host: node.host_alias,
            status,
            ip,
        });
    }

    Ok(StatusReport {
        configuration: config.clone(),
        cluster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fake::FakeDriver;

    fn config() -> ClusterConfig {
        ClusterConfig {
            name: "node".to_string(),
            host: "host".to_string(),
            image: "demo".to_string(),
            number: 3,
        }
    }

    #[tokio::test]
    async fn test_missing_container_is_no_container() {
        let driver = FakeDriver::new();
        let node = NodeIdentity::new("node1", "host1");

        assert_eq!(query_node_state(&driver, &node).await, NodeState::NoContainer);
    }

    #[tokio::test]
    async fn test_terse_report() {
        let driver = FakeDriver::new();
        driver.create(&NodeIdentity::new("node1", "host1"), "demo", "172.17.0.1").await.unwrap();
        driver.create(&NodeIdentity::new("node2", "host2"), "demo", "172.17.0.1").await.unwrap();
        driver.stop(&NodeIdentity::new("node2", "host2")).await.unwrap();

        let report = collect(&driver, &config(), false).await.unwrap();

        assert_eq!(
            report.terse_lines(),
            vec!["node1 : running", "node2 : stopped", "node3 : no container"]
        );
        assert!(report.cluster.iter().all(|n| n.ip.is_none()));
    }

    #[tokio::test]
    async fn test_verbose_report_json() {
        let driver = FakeDriver::new();
        driver.create(&NodeIdentity::new("node1", "host1"), "demo", "172.17.0.1").await.unwrap();

        let report = collect(&driver, &config(), true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["configuration"]["image"], "demo");
        assert_eq!(value["configuration"]["number"], 3);
        assert_eq!(value["cluster"][0]["name"], "node1");
        assert_eq!(value["cluster"][0]["host"], "host1");
        assert_eq!(value["cluster"][0]["status"], "running");
        assert_eq!(value["cluster"][0]["ip"], "172.17.0.2");
        assert_eq!(value["cluster"][1]["status"], "no container");
        assert!(value["cluster"][1].get("ip").is_none());
    }
}
