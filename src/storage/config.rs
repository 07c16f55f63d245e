//! Cluster template persisted as JSON

use crate::{HerdError, Result};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default container name prefix
pub const DEFAULT_NAME: &str = "node";

/// Default host alias prefix
pub const DEFAULT_HOST: &str = "node";

/// Default node count
pub const DEFAULT_NUMBER: u32 = 4;

/// Cluster template stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Container name prefix
    pub name: String,
    /// Host alias prefix
    pub host: String,
    /// Image reference handed to the container runtime
    pub image: String,
    /// Number of nodes
    pub number: u32,
}

impl ClusterConfig {
    /// Check the invariants deserialization alone cannot express
    pub fn validate(&self) -> Result<()> {
        if self.number == 0 {
            return Err(HerdError::InvalidConfig(
                "number must be at least 1".to_string(),
            ));
        }
        if self.image.trim().is_empty() {
            return Err(HerdError::InvalidConfig("image must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Reads and creates the cluster config file
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a new config; never overwrites an existing file
    pub fn create(&self, config: &ClusterConfig) -> Result<()> {
        config.validate()?;
        let config_json = serde_json::to_string_pretty(config)?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(HerdError::ConfigExists(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(config_json.as_bytes())?;
        file.write_all(b"\n")?;

        debug!(path = %self.path.display(), "wrote cluster config");
        Ok(())
    }

    /// Load and validate the config
    pub fn load(&self) -> Result<ClusterConfig> {
        let config_json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HerdError::ConfigNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let config: ClusterConfig = serde_json::from_str(&config_json).map_err(|e| {
            match e.classify() {
                Category::Data => HerdError::InvalidConfig(e.to_string()),
                Category::Syntax | Category::Eof | Category::Io => HerdError::ConfigParse {
                    path: self.path.clone(),
                    source: e,
                },
            }
        })?;
        config.validate()?;
        Ok(config)
    }
}
