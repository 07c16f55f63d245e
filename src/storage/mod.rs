//! On-disk state: the cluster template and the paths herd writes to

pub mod config;
pub mod paths;
