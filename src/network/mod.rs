//! Host-side networking: bridge address lookup and the hosts table

pub mod bridge;
pub mod hosts;
