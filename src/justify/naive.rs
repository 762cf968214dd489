//! JustNaive: records every PI/PPI in the full transitive fanin of the
//! assignment list, with no fanin selection. Grounded on
//! `original_source/c++-src/dtpg/jt/JustNaive.cc`: largest vectors, cheapest
//! to compute, used for debugging rather than production DTPG runs.

use std::collections::HashSet;

use crate::assign::{AssignList, NodeVal};
use crate::circuit::TpgNetwork;
use crate::ids::{NodeId, TimeFrame};

fn collect_tfi(network: &TpgNetwork, roots: &[NodeId], seen: &mut HashSet<NodeId>, mut on_node: impl FnMut(NodeId)) {
    let mut stack: Vec<NodeId> = roots.to_vec();
    for &r in roots {
        seen.insert(r);
    }
    while let Some(n) = stack.pop() {
        on_node(n);
        for &fanin in network.node(n).fanins() {
            if seen.insert(fanin) {
                stack.push(fanin);
            }
        }
    }
}

/// Justify `assign_list` by walking its full transitive fanin and recording
/// every PI/PPI reached, with no attempt to minimize the resulting vector
pub fn justify(
    network: &TpgNetwork,
    val: &dyn Fn(NodeId, TimeFrame) -> bool,
    has_prev_state: bool,
    assign_list: &AssignList,
) -> AssignList {
    let mut cur_roots = Vec::new();
    let mut prev_roots = Vec::new();
    for nv in assign_list.iter() {
        match nv.time() {
            TimeFrame::Present => cur_roots.push(nv.node()),
            TimeFrame::Past => prev_roots.push(nv.node()),
        }
    }

    let mut output = AssignList::new();
    let mut seen_cur = HashSet::new();
    collect_tfi(network, &cur_roots, &mut seen_cur, |node| {
        if network.node(node).is_ppi() {
            if has_prev_state {
                if let Some(alt) = network.node(node).alt_node() {
                    prev_roots.push(alt);
                    return;
                }
            }
            output
                .add(NodeVal::new(node, TimeFrame::Present, val(node, TimeFrame::Present)))
                .expect("naive justifier PI assignments cannot conflict: each node visited once");
        }
    });

    if has_prev_state {
        let mut seen_prev = HashSet::new();
        collect_tfi(network, &prev_roots, &mut seen_prev, |node| {
            if network.node(node).is_ppi() {
                output
                    .add(NodeVal::new(node, TimeFrame::Past, val(node, TimeFrame::Past)))
                    .expect("naive justifier PI assignments cannot conflict: each node visited once");
            }
        });
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PrimType;

    #[test]
    fn test_records_every_pi_in_cone() {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mut list = AssignList::new();
        list.add(NodeVal::new(g, TimeFrame::Present, false)).unwrap();
        let val = |n: NodeId, _t: TimeFrame| n == a;
        let result = justify(&net, &val, false, &list);
        // unlike Just1/Just2, naive records both PIs regardless of gate semantics
        assert_eq!(result.get(a, TimeFrame::Present), Some(true));
        assert_eq!(result.get(c, TimeFrame::Present), Some(false));
    }
}
