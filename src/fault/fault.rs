//! `TpgFault` and `FaultStatus`.

use crate::ids::{FaultId, FaultType, NodeId};

/// Where on a gate a fault sits: at the gate's own output (a "stem" fault),
/// or on one specific fanin edge (a "branch" fault).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FaultSite {
    /// Fault at the output of the origin node
    Stem,
    /// Fault at fanin edge `index` of the origin node
    Branch(usize),
}

/// A specific stuck-at or transition-delay fault.
///
/// The excitation condition is the single literal "origin = ¬val"; the
/// FFR-propagation condition is a small assignment over FFR-internal nodes,
/// precomputed once per representative fault (see [`crate::fault::FaultMgr`]).
#[derive(Clone, Copy, Debug)]
pub struct TpgFault {
    id: FaultId,
    fault_type: FaultType,
    origin: NodeId,
    site: FaultSite,
    /// Stuck-at / slow-to-rise(1) or slow-to-fall(0) value
    value: bool,
    /// The representative fault of this fault's equivalence class (itself,
    /// if it is the representative)
    representative: FaultId,
}

impl TpgFault {
    pub(crate) fn new(
        id: FaultId,
        fault_type: FaultType,
        origin: NodeId,
        site: FaultSite,
        value: bool,
    ) -> Self {
        TpgFault {
            id,
            fault_type,
            origin,
            site,
            value,
            representative: id,
        }
    }

    /// This fault's id
    pub fn id(&self) -> FaultId {
        self.id
    }

    /// The fault model this fault was enumerated under
    pub fn fault_type(&self) -> FaultType {
        self.fault_type
    }

    /// The node the fault sits on or near
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Stem or branch placement
    pub fn site(&self) -> FaultSite {
        self.site
    }

    /// The stuck-at (or transition target) value
    pub fn value(&self) -> bool {
        self.value
    }

    /// This fault's representative in its equivalence class
    pub fn representative(&self) -> FaultId {
        self.representative
    }

    /// Whether this fault is the representative of its equivalence class
    pub fn is_representative(&self) -> bool {
        self.representative == self.id
    }

    pub(crate) fn set_representative(&mut self, rep: FaultId) {
        self.representative = rep;
    }
}

/// Detection status of a fault. Monotonic within a run: `Undetected` may
/// transition to `Detected` or `Untestable`, never back (§8 invariant 8).
///
/// A SAT `Unknown` (timeout) outcome leaves the fault `Undetected` and is
/// reported only through [`crate::dtpg::DtpgStats`] and the abort callback
/// — it is not a fourth status.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FaultStatus {
    /// No test pattern has been found yet, and the fault has not been
    /// proven untestable
    Undetected,
    /// A test pattern detecting this fault has been found
    Detected,
    /// Proven impossible to excite and propagate to an observable output
    Untestable,
}
