//! In-memory driver for exercising orchestration without a container runtime

use crate::cluster::nodes::NodeIdentity;
use crate::runtime::driver::{CopyRequest, NodeDriver};
use crate::runtime::state::{NodeState, Operation};
use crate::{HerdError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Default)]
struct Inner {
    containers: BTreeMap<String, (NodeState, String)>,
    calls: Vec<(Operation, String)>,
    copies: Vec<(String, CopyRequest)>,
    fail: Option<(Operation, String)>,
    next_id: u32,
}

#[derive(Default)]
pub struct FakeDriver {
    inner: RefCell<Inner>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `op` on the named container exit non-zero
    pub fn fail_on(&self, op: Operation, container: &str) {
        self.inner.borrow_mut().fail = Some((op, container.to_string()));
    }

    pub fn container_count(&self) -> usize {
        self.inner.borrow().containers.len()
    }

    pub fn calls(&self) -> Vec<(Operation, String)> {
        self.inner.borrow().calls.clone()
    }

    pub fn copies(&self) -> Vec<(String, CopyRequest)> {
        self.inner.borrow().copies.clone()
    }

    fn step(&self, op: Operation, node: &NodeIdentity) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push((op, node.container_name.clone()));

        let failed = inner
            .fail
            .as_ref()
            .is_some_and(|(f_op, name)| *f_op == op && *name == node.container_name);
        let exists = inner.containers.contains_key(&node.container_name);
        let allowed = match op {
            Operation::Create => !exists,
            Operation::Copy => true,
            _ => exists,
        };
        if failed || !allowed {
            return Err(HerdError::CommandFailed {
                operation: op,
                node: node.container_name.clone(),
                code: Some(1),
            });
        }

        match (op, NodeState::after(op)) {
            (Operation::Create, Some(state)) => {
                inner.next_id += 1;
                let address = format!("172.17.0.{}", inner.next_id + 1);
                inner
                    .containers
                    .insert(node.container_name.clone(), (state, address));
            }
            (_, Some(NodeState::NoContainer)) => {
                inner.containers.remove(&node.container_name);
            }
            (_, Some(state)) => {
                if let Some(entry) = inner.containers.get_mut(&node.container_name) {
                    entry.0 = state;
                }
            }
            (_, None) => {}
        }
        Ok(())
    }
}

impl NodeDriver for FakeDriver {
    async fn bridge_address(&self) -> Result<String> {
        Ok("172.17.0.1".to_string())
    }

    async fn create(&self, node: &NodeIdentity, _image: &str, _dns: &str) -> Result<String> {
        self.step(Operation::Create, node)?;
        Ok(format!("id-{}", node.container_name))
    }

    async fn address(&self, node: &NodeIdentity) -> Result<String> {
        self.step(Operation::Inspect, node)?;
        let inner = self.inner.borrow();
        Ok(inner
            .containers
            .get(&node.container_name)
            .map(|(_, address)| address.clone())
            .unwrap_or_default())
    }

    async fn start(&self, node: &NodeIdentity) -> Result<()> {
        self.step(Operation::Start, node)
    }

    async fn stop(&self, node: &NodeIdentity) -> Result<()> {
        self.step(Operation::Stop, node)
    }

    async fn remove(&self, node: &NodeIdentity) -> Result<()> {
        self.step(Operation::Remove, node)
    }

    async fn state(&self, node: &NodeIdentity) -> NodeState {
        self.inner
            .borrow()
            .containers
            .get(&node.container_name)
            .map(|(state, _)| *state)
            .unwrap_or(NodeState::NoContainer)
    }

    async fn copy_to(&self, node: &NodeIdentity, request: &CopyRequest) -> Result<()> {
        self.step(Operation::Copy, node)?;
        self.inner
            .borrow_mut()
            .copies
            .push((node.host_alias.clone(), request.clone()));
        Ok(())
    }
}
