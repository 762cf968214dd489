//! Node and primitive-gate types of the levelized circuit model.

use crate::ids::NodeId;
use smallvec::SmallVec;

/// The fixed alphabet of primitive gate types.
///
/// Any Boolean expression accepted by a netlist reader is decomposed into a
/// tree of these primitives at construction time (§4.1); the CNF encoder and
/// the fault simulator both only ever see this fixed alphabet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimType {
    /// Constant 0, no fanins
    C0,
    /// Constant 1, no fanins
    C1,
    /// Single fanin, unchanged
    Buff,
    /// Single fanin, inverted
    Not,
    /// N-ary conjunction
    And,
    /// N-ary conjunction, inverted output
    Nand,
    /// N-ary disjunction
    Or,
    /// N-ary disjunction, inverted output
    Nor,
    /// N-ary parity
    Xor,
    /// N-ary parity, inverted output
    Xnor,
}

impl PrimType {
    /// Controlling value of the gate, i.e. the input value that alone
    /// determines the output regardless of other inputs. `And`/`Nand` are
    /// controlled by 0, `Or`/`Nor` by 1; the other primitives have none.
    pub fn controlling_value(&self) -> Option<bool> {
        match self {
            PrimType::And | PrimType::Nand => Some(false),
            PrimType::Or | PrimType::Nor => Some(true),
            _ => None,
        }
    }

    /// Whether the gate inverts its natural (non-controlled) output
    pub fn inverting(&self) -> bool {
        matches!(
            self,
            PrimType::Not | PrimType::Nand | PrimType::Nor | PrimType::Xnor
        )
    }
}

/// The role a node plays in the circuit: a pseudo-primary I/O boundary or
/// ordinary combinational logic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    /// Pseudo-primary input: a primary input, or the output of a DFF
    Ppi,
    /// Pseudo-primary output: a primary output, or the data input of a DFF
    Ppo,
    /// Ordinary combinational logic gate
    Logic(PrimType),
}

/// A node of the levelized combinational DAG.
///
/// Nodes are immutable once the network finishes construction; the network
/// exclusively owns all nodes for its lifetime, every other reference is a
/// non-owning [`NodeId`].
#[derive(Clone, Debug)]
pub struct TpgNode {
    id: NodeId,
    kind: NodeKind,
    fanins: SmallVec<[NodeId; 5]>,
    fanouts: Vec<NodeId>,
    level: u32,
    ffr_root: FfrRootRef,
    mffc_root: Option<NodeId>,
    /// For a PPI backed by a DFF, the corresponding DFF-input node in the
    /// previous time frame (transition-delay mode only)
    alt_node: Option<NodeId>,
}

/// Whether a node is the root of its FFR, recorded eagerly during
/// partitioning so `TpgFFR` invariants can be checked in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FfrRootRef {
    /// Not yet assigned to an FFR
    Unassigned,
    /// This node is the root of FFR `0`
    Root(crate::ids::FfrId),
    /// This node belongs to FFR `0` but is not its root
    Member(crate::ids::FfrId),
}

impl TpgNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind, fanins: SmallVec<[NodeId; 5]>) -> Self {
        TpgNode {
            id,
            kind,
            fanins,
            fanouts: Vec::new(),
            level: 0,
            ffr_root: FfrRootRef::Unassigned,
            mffc_root: None,
            alt_node: None,
        }
    }

    /// This node's own id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's role (PPI, PPO or logic gate)
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether this is a pseudo-primary input
    pub fn is_ppi(&self) -> bool {
        self.kind == NodeKind::Ppi
    }

    /// Whether this is a pseudo-primary output
    pub fn is_ppo(&self) -> bool {
        self.kind == NodeKind::Ppo
    }

    /// The gate type, if this is a logic node
    pub fn gate_type(&self) -> Option<PrimType> {
        match self.kind {
            NodeKind::Logic(p) => Some(p),
            _ => None,
        }
    }

    /// Ordered fanin list
    pub fn fanins(&self) -> &[NodeId] {
        &self.fanins
    }

    /// Fanout list, in the order fanouts were added
    pub fn fanouts(&self) -> &[NodeId] {
        &self.fanouts
    }

    /// Number of fanouts; a node with more than one fanout is always an FFR root
    pub fn fanout_count(&self) -> usize {
        self.fanouts.len()
    }

    /// Level: the longest path length from a PPI, with PPIs at level 0
    pub fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub(crate) fn push_fanout(&mut self, n: NodeId) {
        self.fanouts.push(n);
    }

    /// The FFR this node belongs to, if partitioning has run
    pub fn ffr(&self) -> Option<crate::ids::FfrId> {
        match self.ffr_root {
            FfrRootRef::Root(f) | FfrRootRef::Member(f) => Some(f),
            FfrRootRef::Unassigned => None,
        }
    }

    /// Whether this node is the root of its FFR
    pub fn is_ffr_root(&self) -> bool {
        matches!(self.ffr_root, FfrRootRef::Root(_))
    }

    pub(crate) fn set_ffr(&mut self, f: crate::ids::FfrId, is_root: bool) {
        self.ffr_root = if is_root {
            FfrRootRef::Root(f)
        } else {
            FfrRootRef::Member(f)
        };
    }

    /// The MFFC this node belongs to, if partitioning has run
    pub fn mffc(&self) -> Option<NodeId> {
        self.mffc_root
    }

    pub(crate) fn set_mffc_root(&mut self, root: NodeId) {
        self.mffc_root = Some(root);
    }

    /// A PPI's DFF-input counterpart in the previous time frame, for
    /// transition-delay mode. `None` for primary inputs and all non-PPI nodes.
    pub fn alt_node(&self) -> Option<NodeId> {
        self.alt_node
    }

    pub(crate) fn set_alt_node(&mut self, alt: NodeId) {
        self.alt_node = Some(alt);
    }
}
