//! Justification: turning an internal-node `AssignList` (from [`crate::extract`])
//! plus a satisfying model into a PI/PPI test vector (§4.7).

mod common;
mod just1;
mod just2;
mod naive;

use crate::assign::AssignList;
use crate::circuit::TpgNetwork;
use crate::ids::{NodeId, TimeFrame};

/// Which justification algorithm to run
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JustifierKind {
    /// Picks the first qualifying fanin; fast, produces larger vectors
    Just1,
    /// Picks the qualifying fanin with the lowest estimated PI cost (default)
    Just2,
    /// Records the full transitive fanin with no selection; debugging only
    Naive,
}

impl Default for JustifierKind {
    fn default() -> Self {
        JustifierKind::Just2
    }
}

/// Justify `assign_list` into a PI/PPI-restricted `AssignList`, reading
/// remaining node values from `val` (the SAT model, or a fault-free
/// resimulation, depending on caller)
pub fn justify(
    kind: JustifierKind,
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    assign_list: &AssignList,
) -> AssignList {
    match kind {
        JustifierKind::Just1 => just1::justify(network, val, has_prev_state, assign_list),
        JustifierKind::Just2 => just2::justify(network, val, has_prev_state, assign_list),
        JustifierKind::Naive => naive::justify(network, val, has_prev_state, assign_list),
    }
}
