//! External processes: the command gateway and the node driver built on it

pub mod command;
pub mod driver;
#[cfg(test)]
pub(crate) mod fake;
pub mod state;
