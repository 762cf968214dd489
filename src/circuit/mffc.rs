//! Maximal Fanout-Free Cones.

use crate::ids::{FfrId, MffcId, NodeId};

/// A tree of FFRs sharing a single output.
///
/// Each fault's propagation up to the MFFC root is fully determined by its
/// FFR-propagation condition (a small cube) plus a per-FFR selector
/// variable; every FFR belongs to exactly one MFFC.
#[derive(Clone, Debug)]
pub struct TpgMFFC {
    id: MffcId,
    root: NodeId,
    ffrs: Vec<FfrId>,
}

impl TpgMFFC {
    pub(crate) fn new(id: MffcId, root: NodeId, ffrs: Vec<FfrId>) -> Self {
        TpgMFFC { id, root, ffrs }
    }

    /// This MFFC's id
    pub fn id(&self) -> MffcId {
        self.id
    }

    /// The MFFC's root node, dominating every node in its constituent FFRs
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The FFRs that make up this MFFC
    pub fn ffrs(&self) -> &[FfrId] {
        &self.ffrs
    }
}
