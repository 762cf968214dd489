//! Stable integer identifiers used throughout the crate.
//!
//! Nodes, faults, FFRs and MFFCs are owned by arenas (`TpgNetwork`,
//! `FaultMgr`) and referenced everywhere else by these small `Copy` index
//! types rather than by pointer or reference, sidestepping lifetime
//! threading for back-references such as a DFF's alternate node.

use std::fmt;

macro_rules! def_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// Build an id from a raw index
            #[inline]
            pub fn new(idx: usize) -> Self {
                $name(idx as u32)
            }

            /// Return the raw index
            #[inline]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(idx: usize) -> Self {
                $name::new(idx)
            }
        }
    };
}

def_id!(NodeId, "Identifier of a `TpgNode` within a `TpgNetwork`");
def_id!(FaultId, "Identifier of a `TpgFault` within a `FaultMgr`");
def_id!(FfrId, "Identifier of a `TpgFFR` within a `TpgNetwork`");
def_id!(MffcId, "Identifier of a `TpgMFFC` within a `TpgNetwork`");

/// A time frame in the 2-frame transition-delay unrolling: 0 (past) or 1 (present)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TimeFrame {
    /// Frame 0, the launch cycle
    Past,
    /// Frame 1, the capture cycle
    Present,
}

impl TimeFrame {
    /// Return the frame as a 0/1 index, matching the spec's `time ∈ {0,1}` convention
    pub fn as_index(&self) -> usize {
        match self {
            TimeFrame::Past => 0,
            TimeFrame::Present => 1,
        }
    }
}

/// The fault model a network/test vector/fault is being handled under
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FaultType {
    /// A line permanently tied to 0 or 1
    StuckAt,
    /// A line that fails to make a 0→1 or 1→0 transition within one clock
    TransitionDelay,
}

