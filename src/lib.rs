//! Herd - provision and drive a fixed-size cluster of containers
//!
//! This crate derives node names and host aliases from a small JSON template
//! and walks every node through create, start, stop and remove by invoking an
//! external container runtime CLI.

pub mod cli;
pub mod cluster;
pub mod network;
pub mod runtime;
pub mod storage;

use runtime::state::Operation;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Herd operations
#[derive(Error, Debug)]
pub enum HerdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("No config file found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Could not read config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not {operation} container {node}{}", exit_suffix(.code))]
    CommandFailed {
        operation: Operation,
        node: String,
        code: Option<i32>,
    },

    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not get host ip address: {0}")]
    HostAddress(String),

    #[error("{0} not implemented yet")]
    Unimplemented(String),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit status {})", code),
        None => " (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, HerdError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "herd";
