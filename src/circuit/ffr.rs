//! Fanout-Free Regions.

use crate::ids::{FfrId, NodeId};

/// A maximal connected sub-DAG whose only internal fanout is 1.
///
/// Every fault inside an FFR's stem nodes propagates to the root's output
/// literal as a pure product of input literals: no intermediate gating, so
/// the FFR-local propagation condition is a conjunction of assignments.
#[derive(Clone, Debug)]
pub struct TpgFFR {
    id: FfrId,
    root: NodeId,
    /// All nodes in this FFR, including the root, in discovery order
    nodes: Vec<NodeId>,
    /// Boundary nodes: fanins of FFR-internal nodes that belong to another FFR
    inputs: Vec<NodeId>,
}

impl TpgFFR {
    pub(crate) fn new(id: FfrId, root: NodeId, nodes: Vec<NodeId>, inputs: Vec<NodeId>) -> Self {
        TpgFFR {
            id,
            root,
            nodes,
            inputs,
        }
    }

    /// This FFR's id
    pub fn id(&self) -> FfrId {
        self.id
    }

    /// The FFR's root node (a PPO or a node with more than one fanout)
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// All nodes belonging to this FFR, including the root
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The FFR's boundary inputs: fanins of internal nodes owned by another FFR
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }
}
