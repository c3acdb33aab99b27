//! Visited-set cycle guard
//!
//! Provides [`CycleGuard`]: the source-identity → clone table of a single
//! structural clone call.

use crate::error::{CloneError, Resource};
use replica_value::{NodeId, NodeRef};
use std::collections::HashMap;

/// Table of nodes already cloned during one traversal
///
/// Scoped to exactly one top-level clone call and discarded afterwards.
/// Growth is capped at `max_nodes` entries.
///
/// Each entry holds the source handle next to its clone, so a source node
/// cannot be freed (and its address reused) while the traversal runs.
#[derive(Debug)]
pub struct CycleGuard {
    table: HashMap<NodeId, (NodeRef, NodeRef)>,
    max_nodes: usize,
}

impl CycleGuard {
    /// Empty guard admitting at most `max_nodes` entries
    #[inline]
    #[must_use]
    pub fn new(max_nodes: usize) -> Self {
        Self {
            table: HashMap::new(),
            max_nodes,
        }
    }

    /// Clone already created for `source`, if any
    #[inline]
    #[must_use]
    pub fn resolve(&self, source: &NodeRef) -> Option<NodeRef> {
        self.table
            .get(&source.id())
            .filter(|(recorded, _)| recorded.ptr_eq(source))
            .map(|(_, clone)| clone.clone())
    }

    /// Remember the clone created for `source`
    ///
    /// # Errors
    /// Returns [`CloneError::ResourceExhausted`] once the node ceiling is hit
    pub fn record(&mut self, source: &NodeRef, clone: NodeRef) -> Result<(), CloneError> {
        let id = source.id();
        if self.table.len() >= self.max_nodes && !self.table.contains_key(&id) {
            return Err(CloneError::ResourceExhausted {
                resource: Resource::Nodes,
                limit: self.max_nodes,
            });
        }
        self.table.insert(id, (source.clone(), clone));
        Ok(())
    }

    /// Clones recorded so far
    pub fn clones(&self) -> impl Iterator<Item = &NodeRef> {
        self.table.values().map(|(_, clone)| clone)
    }

    /// Tear down every recorded clone
    ///
    /// Used when a traversal fails: partially built clones may already form
    /// cycles that nothing outside the guard can reach to break.
    pub fn discard(self) {
        for (_, clone) in self.table.values() {
            clone.detach();
        }
    }

    /// Number of nodes recorded
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
