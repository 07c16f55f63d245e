//! Node runtime state and the per-node operations that change it

use serde::Serialize;
use std::fmt;

/// Live state of one node as reported by the container runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeState {
    #[serde(rename = "no container")]
    NoContainer,
    #[serde(rename = "stopped")]
    Stopped,
    #[serde(rename = "running")]
    Running,
}

impl NodeState {
    /// Interpret the output of an inspection of `.State.Running`
    pub fn from_running_flag(flag: &str) -> Self {
        if flag.trim() == "true" {
            Self::Running
        } else {
            Self::Stopped
        }
    }

    /// Whether a container exists for the node
    pub fn exists(&self) -> bool {
        !matches!(self, Self::NoContainer)
    }

    /// Get status string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoContainer => "no container",
            Self::Stopped => "stopped",
            Self::Running => "running",
        }
    }

    /// State a node ends up in after `op` succeeds, `None` if `op` leaves it unchanged
    pub fn after(op: Operation) -> Option<NodeState> {
        match op {
            Operation::Create | Operation::Start => Some(Self::Running),
            Operation::Stop => Some(Self::Stopped),
            Operation::Remove => Some(Self::NoContainer),
            Operation::Inspect | Operation::Copy => None,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single external step applied to one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Start,
    Stop,
    Remove,
    Inspect,
    Copy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
            Self::Inspect => "inspect",
            Self::Copy => "copy files to",
        }
    }

    /// Progress verb printed once the step succeeded on a node
    pub fn progress(&self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Remove => "Removing",
            Self::Inspect => "Inspected",
            Self::Copy => "Copied to",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
