//! Static and dynamic resolution passes over the capability graph.

use crate::{
    adjust,
    cap::CapId,
    error::{CapError, Result},
    packetizer::{self, DrainReport},
    queue::PendingSet,
    state::CapabilityState,
    transport::Transport,
};

/// Owns the children and firmware queues of one session.
///
/// Both queues are empty between passes, except that the firmware queue of
/// a request-batched session keeps accumulating until it is drained.
#[derive(Debug, Default)]
pub struct Resolver {
    children: PendingSet,
    firmware: PendingSet,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn firmware(&self) -> &PendingSet {
        &self.firmware
    }

    pub fn discard(&mut self) {
        self.children.clear();
        self.firmware.clear();
    }

    /// Resolves every root in registry order, then everything reachable from
    /// them. Returns the visit order.
    pub fn static_pass(&mut self, state: &mut CapabilityState<'_>) -> Result<Vec<CapId>> {
        let mut visited = Vec::new();
        match self.run_static(state, &mut visited) {
            Ok(()) => {
                log::info!(
                    "static pass resolved {} caps, {} pending for firmware",
                    visited.len(),
                    self.firmware.len()
                );
                Ok(visited)
            }
            Err(e) => {
                log::error!("static pass aborted: {}", e);
                self.discard();
                Err(e)
            }
        }
    }

    fn run_static(&mut self, state: &mut CapabilityState<'_>, visited: &mut Vec<CapId>) -> Result<()> {
        self.children.clear();
        let roots: Vec<CapId> = state
            .registry()
            .descriptors()
            .filter(|desc| desc.is_root())
            .map(|desc| desc.id)
            .collect();
        for id in roots {
            self.visit_static(state, id, visited)?;
        }
        while let Some(id) = self.children.front() {
            self.visit_static(state, id, visited)?;
            self.children.pop_front();
        }
        Ok(())
    }

    fn visit_static(
        &mut self,
        state: &mut CapabilityState<'_>,
        id: CapId,
        visited: &mut Vec<CapId>,
    ) -> Result<()> {
        let Some(desc) = state.descriptor(id) else {
            return Ok(());
        };
        if let Some(rule) = desc.adjust {
            adjust::run(state, id, rule, None)?;
        }
        for child in &desc.children {
            self.children.insert(*child);
        }
        self.firmware.insert(id);
        visited.push(id);
        Ok(())
    }

    /// Applies `value` to an activated session and re-resolves whatever
    /// depends on it. Returns every cap the pass touched, trigger first.
    ///
    /// On failure only this pass's firmware entries are dropped; caps still
    /// held for a batched commit stay pending.
    pub fn dynamic_pass(
        &mut self,
        state: &mut CapabilityState<'_>,
        id: CapId,
        value: i32,
    ) -> Result<Vec<CapId>> {
        let mut touched = Vec::new();
        let mark = self.firmware.len();
        match self.run_dynamic(state, id, value, &mut touched) {
            Ok(()) => Ok(touched),
            Err(e) => {
                log::error!("{}: dynamic pass aborted: {}", id, e);
                self.children.clear();
                self.firmware.truncate(mark);
                Err(e)
            }
        }
    }

    fn run_dynamic(
        &mut self,
        state: &mut CapabilityState<'_>,
        id: CapId,
        value: i32,
        touched: &mut Vec<CapId>,
    ) -> Result<()> {
        let desc = state
            .descriptor(id)
            .ok_or(CapError::InvalidParams("dynamic pass on an unregistered capability"))?;
        if !desc.is_dynamic_allowed() {
            return Err(CapError::NotDynamicallyAllowed(id));
        }

        let prev = state.value(id);
        match desc.adjust {
            Some(rule) => adjust::run(state, id, rule, Some(value))?,
            None => state.set_value(id, value),
        }
        if state.value(id) != prev {
            for child in &desc.children {
                self.children.insert(*child);
            }
        }
        self.firmware.insert(id);
        touched.push(id);

        while let Some(child) = self.children.front() {
            let child_desc = state
                .descriptor(child)
                .ok_or_else(|| CapError::malformed(child, "child is not registered"))?;
            if !child_desc.is_dynamic_allowed() {
                return Err(CapError::NotDynamicallyAllowed(child));
            }
            let rule = child_desc
                .adjust
                .ok_or_else(|| CapError::malformed(child, "dynamic child without adjust rule"))?;

            let prev = state.value(child);
            adjust::run(state, child, rule, None)?;
            if state.value(child) != prev {
                for grandchild in &child_desc.children {
                    self.children.insert(*grandchild);
                }
            }
            self.firmware.insert(child);
            touched.push(child);
            self.children.pop_front();
        }
        Ok(())
    }

    /// Sends the firmware queue. The queue is empty afterwards either way.
    pub fn drain<T: Transport + ?Sized>(
        &mut self,
        state: &CapabilityState<'_>,
        transport: &mut T,
    ) -> Result<DrainReport> {
        let report = packetizer::drain(state, &mut self.firmware, transport);
        self.children.clear();
        report
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;
