//! Node addressing, lifecycle orchestration and status reporting

pub mod lifecycle;
pub mod nodes;
pub mod status;
