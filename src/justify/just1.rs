//! Just1: the simplest justifier. Grounded on
//! `original_source/c++-src/dtpg/jt/Just1.cc`: among fanins carrying the
//! gate's controlling value, always pick the first one in fanin order.

use crate::assign::AssignList;
use crate::circuit::TpgNetwork;
use crate::ids::{NodeId, TimeFrame};

use super::common;

/// Justify `assign_list` down to a PI/PPI assignment list, picking the first
/// qualifying fanin at every controlled gate
pub fn justify(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    assign_list: &AssignList,
) -> AssignList {
    common::run(
        network,
        val,
        has_prev_state,
        |candidates, _time| *candidates.first().expect("a controlled output always has a qualifying fanin"),
        assign_list,
    )
}
