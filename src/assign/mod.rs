//! `AssignList`: an ordered set of `(node, time, value)` assignments.
//!
//! Used both as the output of the sufficient-condition extractor (§4.6,
//! over internal nodes) and as the output of the justifier (§4.7, restricted
//! to PIs/PPIs), and internally by [`crate::sat`] to turn a propagation
//! condition into SAT assumptions.

use crate::error::{DruidError, Result};
use crate::ids::{NodeId, TimeFrame};

/// A single `(node, time, value)` assignment
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeVal {
    node: NodeId,
    time: TimeFrame,
    val: bool,
}

impl NodeVal {
    /// Build a new assignment
    pub fn new(node: NodeId, time: TimeFrame, val: bool) -> Self {
        NodeVal { node, time, val }
    }

    /// The assigned node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The time frame the assignment applies to
    pub fn time(&self) -> TimeFrame {
        self.time
    }

    /// The assigned boolean value
    pub fn val(&self) -> bool {
        self.val
    }

    fn key(&self) -> (u32, usize) {
        (self.node.0, self.time.as_index())
    }
}

/// An ordered set of assignments with set semantics over `(node, time)`:
/// duplicates collapse, conflicting entries for the same key are rejected.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AssignList {
    entries: Vec<NodeVal>,
}

impl AssignList {
    /// An empty assignment list
    pub fn new() -> Self {
        AssignList::default()
    }

    /// Number of distinct assignments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no assignments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The assignments, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &NodeVal> {
        self.entries.iter()
    }

    /// Look up the value assigned to `(node, time)`, if any
    pub fn get(&self, node: NodeId, time: TimeFrame) -> Option<bool> {
        self.entries
            .iter()
            .find(|nv| nv.node == node && nv.time == time)
            .map(|nv| nv.val)
    }

    /// Add an assignment. A duplicate of an existing `(node, time, value)`
    /// is silently absorbed; a conflicting value for an existing `(node,
    /// time)` is rejected as a [`DruidError::FaultModelMismatch`].
    pub fn add(&mut self, nv: NodeVal) -> Result<()> {
        if let Some(existing) = self.entries.iter().find(|e| e.key() == nv.key()) {
            if existing.val != nv.val {
                return Err(DruidError::FaultModelMismatch(format!(
                    "conflicting assignment on node {} at time {:?}",
                    nv.node, nv.time
                )));
            }
            return Ok(());
        }
        self.entries.push(nv);
        Ok(())
    }

    /// Union two assignment lists; fails if they disagree on any shared key
    pub fn merge(&self, other: &AssignList) -> Result<AssignList> {
        let mut ret = self.clone();
        for nv in &other.entries {
            ret.add(*nv)?;
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> NodeId {
        NodeId(i)
    }

    #[test]
    fn test_duplicate_collapses() {
        let mut a = AssignList::new();
        a.add(NodeVal::new(n(1), TimeFrame::Present, true)).unwrap();
        a.add(NodeVal::new(n(1), TimeFrame::Present, true)).unwrap();
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_conflict_rejected() {
        let mut a = AssignList::new();
        a.add(NodeVal::new(n(1), TimeFrame::Present, true)).unwrap();
        let res = a.add(NodeVal::new(n(1), TimeFrame::Present, false));
        assert!(res.is_err());
    }

    #[test]
    fn test_merge_union() {
        let mut a = AssignList::new();
        a.add(NodeVal::new(n(1), TimeFrame::Present, true)).unwrap();
        let mut b = AssignList::new();
        b.add(NodeVal::new(n(2), TimeFrame::Present, false)).unwrap();
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 2);
    }
}
