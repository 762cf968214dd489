//! Just2: the default justifier. Grounded on
//! `original_source/c++-src/dtpg/jt/Just2.cc`: a weight pass estimates, for
//! every `(node, time)` reachable from the assignment list, how many PIs a
//! full justification of that node would cost; the justify pass then picks
//! the cheapest qualifying fanin at each controlled gate instead of just the
//! first one.

use std::collections::HashMap;

use crate::assign::AssignList;
use crate::circuit::{PrimType, TpgNetwork};
use crate::ids::{NodeId, TimeFrame};

use super::common;

/// Estimated PI cost to justify `(node, time)`, memoized across the whole walk
fn cost(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    memo: &mut HashMap<(NodeId, TimeFrame), f64>,
    node: NodeId,
    time: TimeFrame,
) -> f64 {
    if let Some(&c) = memo.get(&(node, time)) {
        return c;
    }
    let tpg_node = network.node(node);
    let c = if tpg_node.is_ppi() {
        if time == TimeFrame::Present && has_prev_state {
            if let Some(alt) = tpg_node.alt_node() {
                cost(network, val, has_prev_state, memo, alt, TimeFrame::Past)
            } else {
                1.0
            }
        } else {
            1.0
        }
    } else if tpg_node.is_ppo() {
        cost(network, val, has_prev_state, memo, tpg_node.fanins()[0], time)
    } else {
        match tpg_node.gate_type() {
            None => 0.0,
            Some(PrimType::Buff) | Some(PrimType::Not) => {
                cost(network, val, has_prev_state, memo, tpg_node.fanins()[0], time)
            }
            Some(prim @ (PrimType::And | PrimType::Nand | PrimType::Or | PrimType::Nor)) => {
                let cval = prim.controlling_value().unwrap();
                let coval = if prim.inverting() { !cval } else { cval };
                let oval = val(node, time);
                if oval == coval {
                    tpg_node
                        .fanins()
                        .iter()
                        .filter(|&&f| val(f, time) == cval)
                        .map(|&f| cost(network, val, has_prev_state, memo, f, time))
                        .fold(f64::MAX, f64::min)
                } else {
                    tpg_node
                        .fanins()
                        .iter()
                        .map(|&f| cost(network, val, has_prev_state, memo, f, time))
                        .sum()
                }
            }
            Some(PrimType::Xor) | Some(PrimType::Xnor) => tpg_node
                .fanins()
                .iter()
                .map(|&f| cost(network, val, has_prev_state, memo, f, time))
                .sum(),
            Some(PrimType::C0) | Some(PrimType::C1) => 0.0,
        }
    };
    memo.insert((node, time), c);
    c
}

/// Justify `assign_list` down to a PI/PPI assignment list, picking at each
/// controlled gate the qualifying fanin with the lowest estimated PI cost,
/// tie-broken deterministically to the lowest node id
pub fn justify(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    assign_list: &AssignList,
) -> AssignList {
    let mut memo = HashMap::new();
    for nv in assign_list.iter() {
        cost(network, val, has_prev_state, &mut memo, nv.node(), nv.time());
    }
    common::run(
        network,
        val,
        has_prev_state,
        |candidates, time| {
            *candidates
                .iter()
                .min_by(|&&a, &&b| {
                    let ca = cost(network, val, has_prev_state, &mut memo, a, time);
                    let cb = cost(network, val, has_prev_state, &mut memo, b, time);
                    ca.partial_cmp(&cb).unwrap().then(a.cmp(&b))
                })
                .expect("a controlled output always has a qualifying fanin")
        },
        assign_list,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::NodeVal;

    #[test]
    fn test_ties_break_to_lowest_node_id() {
        // AND(a,c) forced to 0 by a=0,c=0: both fanins qualify and have equal
        // cost (both PIs), so Just2 must pick the lower-id one (`a`)
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mut list = AssignList::new();
        list.add(NodeVal::new(g, TimeFrame::Present, false)).unwrap();
        let val = |_n: NodeId, _t: TimeFrame| false;
        let result = justify(&net, &val, false, &list);
        assert_eq!(result.get(a, TimeFrame::Present), Some(false));
        assert_eq!(result.get(c, TimeFrame::Present), None);
    }

    #[test]
    fn test_uncontrolled_output_descends_all_fanins() {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mut list = AssignList::new();
        list.add(NodeVal::new(g, TimeFrame::Present, true)).unwrap();
        let val = |_n: NodeId, _t: TimeFrame| true;
        let result = justify(&net, &val, false, &list);
        assert_eq!(result.get(a, TimeFrame::Present), Some(true));
        assert_eq!(result.get(c, TimeFrame::Present), Some(true));
    }
}
