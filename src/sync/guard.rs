//! Promotion guard: at most one in-flight collect per node
//!
//! A promotion spans two asynchronous steps (the optimistic local rewrite and
//! the network round trip), and the user can click again before the round
//! trip resolves. The guard records which nodes are mid-promotion so the
//! second click is skipped.

use crate::graph::NodeId;
use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct PromotionGuard {
    in_flight: DashSet<NodeId>,
}

impl PromotionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in flight. Returns false if it already was.
    pub fn try_begin(&self, id: &NodeId) -> bool {
        self.in_flight.insert(id.clone())
    }

    /// Clear the in-flight marker. Unknown ids are ignored, so a late
    /// completion for a node that has since been removed is harmless.
    pub fn end(&self, id: &NodeId) {
        self.in_flight.remove(id);
    }

    pub fn is_in_flight(&self, id: &NodeId) -> bool {
        self.in_flight.contains(id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Like [`PromotionGuard::try_begin`], but the marker is cleared when the
    /// returned ticket drops, whichever way the promotion finishes.
    pub fn try_acquire(&self, id: &NodeId) -> Option<PromotionTicket<'_>> {
        if self.try_begin(id) {
            Some(PromotionTicket { guard: self, id: id.clone() })
        } else {
            None
        }
    }
}

/// Proof that the holder owns the promotion of one node.
#[derive(Debug)]
pub struct PromotionTicket<'a> {
    guard: &'a PromotionGuard,
    id: NodeId,
}

impl PromotionTicket<'_> {
    pub fn node_id(&self) -> &NodeId {
        &self.id
    }
}

impl Drop for PromotionTicket<'_> {
    fn drop(&mut self) {
        self.guard.end(&self.id);
    }
}
