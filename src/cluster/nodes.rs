//! Deterministic node naming

use crate::storage::config::ClusterConfig;
use crate::{HerdError, Result};
use serde::Serialize;

/// Name and host alias of one cluster member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeIdentity {
    /// Container name given to the runtime
    pub container_name: String,
    /// Hostname set inside the container and used for remote copies
    pub host_alias: String,
}

impl NodeIdentity {
    pub fn new(container_name: impl Into<String>, host_alias: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            host_alias: host_alias.into(),
        }
    }
}

/// Format `index` zero-padded to the width picked from `total`.
///
/// Totals below 10 use one digit, below 100 two, below 1000 three and below
/// 10000 four. Anything larger is left unpadded.
pub fn pad(index: u32, total: u32) -> Result<String> {
    if index > total {
        return Err(HerdError::InvalidArgument(format!(
            "index {} exceeds node count {}",
            index, total
        )));
    }

    let padded = match total {
        0..=9 => format!("{:01}", index),
        10..=99 => format!("{:02}", index),
        100..=999 => format!("{:03}", index),
        1000..=9999 => format!("{:04}", index),
        _ => index.to_string(),
    };
    Ok(padded)
}

/// Derive the ordered node list, indices `1..=number`
pub fn derive_nodes(config: &ClusterConfig) -> Result<Vec<NodeIdentity>> {
    (1..=config.number)
        .map(|i| {
            let suffix = pad(i, config.number)?;
            Ok(NodeIdentity {
                container_name: format!("{}{}", config.name, suffix),
                host_alias: format!("{}{}", config.host, suffix),
            })
        })
        .collect()
}
