//! Shared backward-walk driver for [`super::just1`] and [`super::just2`]:
//! both pick one qualifying fanin per controlled gate and recurse into all
//! fanins otherwise, per the table in §4.7. Only the *choice* among multiple
//! qualifying fanins differs between the two variants.

use std::collections::HashSet;

use crate::assign::{AssignList, NodeVal};
use crate::circuit::{PrimType, TpgNetwork};
use crate::ids::{NodeId, TimeFrame};

/// Recurse from `(node, time)` toward PIs/PPIs, recording every PPI reached
/// into `output`. `pick` chooses one fanin among those carrying the gate's
/// controlling value, when only one is needed.
pub(super) fn justify_node(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    pick: &mut dyn FnMut(&[NodeId], TimeFrame) -> NodeId,
    visited: &mut HashSet<(NodeId, TimeFrame)>,
    output: &mut AssignList,
    node: NodeId,
    time: TimeFrame,
) {
    if !visited.insert((node, time)) {
        return;
    }
    let tpg_node = network.node(node);

    if tpg_node.is_ppi() {
        if time == TimeFrame::Present && has_prev_state {
            if let Some(alt) = tpg_node.alt_node() {
                justify_node(network, val, has_prev_state, pick, visited, output, alt, TimeFrame::Past);
                return;
            }
        }
        output
            .add(NodeVal::new(node, time, val(node, time)))
            .expect("justifier PI assignments cannot conflict: each (node,time) is visited once");
        return;
    }

    if tpg_node.is_ppo() {
        let fanin = tpg_node.fanins()[0];
        justify_node(network, val, has_prev_state, pick, visited, output, fanin, time);
        return;
    }

    let Some(prim) = tpg_node.gate_type() else {
        return;
    };
    let fanins = tpg_node.fanins();
    match prim {
        PrimType::C0 | PrimType::C1 => {}
        PrimType::Buff | PrimType::Not => {
            justify_node(network, val, has_prev_state, pick, visited, output, fanins[0], time);
        }
        PrimType::Xor | PrimType::Xnor => {
            for &f in fanins {
                justify_node(network, val, has_prev_state, pick, visited, output, f, time);
            }
        }
        PrimType::And | PrimType::Nand | PrimType::Or | PrimType::Nor => {
            let cval = prim.controlling_value().expect("AND/OR-family gates have a controlling value");
            let coval = if prim.inverting() { !cval } else { cval };
            let oval = val(node, time);
            if oval == coval {
                let candidates: Vec<NodeId> =
                    fanins.iter().copied().filter(|&f| val(f, time) == cval).collect();
                let chosen = pick(&candidates, time);
                justify_node(network, val, has_prev_state, pick, visited, output, chosen, time);
            } else {
                for &f in fanins {
                    justify_node(network, val, has_prev_state, pick, visited, output, f, time);
                }
            }
        }
    }
}

/// Run `justify_node` over every assignment in `assign_list`, sharing one
/// visited set and output accumulator across the whole list.
pub(super) fn run(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    mut pick: impl FnMut(&[NodeId], TimeFrame) -> NodeId,
    assign_list: &AssignList,
) -> AssignList {
    let mut visited = HashSet::new();
    let mut output = AssignList::new();
    for nv in assign_list.iter() {
        justify_node(
            network,
            val,
            has_prev_state,
            &mut pick,
            &mut visited,
            &mut output,
            nv.node(),
            nv.time(),
        );
    }
    output
}
