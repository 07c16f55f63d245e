//! Locations of the files herd reads and writes

use std::path::{Path, PathBuf};

/// Default config file name, resolved against the working directory
pub const CONFIG_FILE_NAME: &str = "cluster";

/// Name of the plain-text hosts table written after `run`
pub const LOCAL_HOSTS_NAME: &str = "hosts";

/// Default system hosts file
pub const SYSTEM_HOSTS: &str = "/etc/hosts";

/// Manages the paths herd touches for one cluster context
#[derive(Debug, Clone)]
pub struct HerdPaths {
    config: PathBuf,
    system_hosts: PathBuf,
    local_hosts: PathBuf,
}

impl HerdPaths {
    /// Create paths rooted at the working directory with the default hosts file
    pub fn new() -> Self {
        Self::with_root(".")
    }

    /// Create paths with config and local hosts table under a custom root
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config: root.join(CONFIG_FILE_NAME),
            system_hosts: PathBuf::from(SYSTEM_HOSTS),
            local_hosts: root.join(LOCAL_HOSTS_NAME),
        }
    }

    /// Override the config file location
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = config.into();
        self
    }

    /// Override the system hosts file location
    pub fn with_system_hosts(mut self, hosts: impl Into<PathBuf>) -> Self {
        self.system_hosts = hosts.into();
        self
    }

    /// Cluster config file
    pub fn config(&self) -> &Path {
        &self.config
    }

    /// System-wide hosts file holding the managed region
    pub fn system_hosts(&self) -> &Path {
        &self.system_hosts
    }

    /// Local `hosts` table
    pub fn local_hosts(&self) -> &Path {
        &self.local_hosts
    }
}

impl Default for HerdPaths {
    fn default() -> Self {
        Self::new()
    }
}
