//! Sufficient-condition extraction from a SAT model (§4.6).
//!
//! Grounded on `original_source/c++-src/ex/Extractor.cc`: walk backward from
//! a sensitized primary output through the fault cone, recording a blocking
//! side-input wherever the fault effect is masked, and a full recursive
//! fanin set wherever it is still propagating.

use std::collections::{HashMap, HashSet};

use crate::assign::{AssignList, NodeVal};
use crate::circuit::TpgNetwork;
use crate::ids::{NodeId, TimeFrame};
use crate::sat::{Model, ModelVal, StructEngine};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Still on the sensitized path: good and faulty values differ here
    Sensitized,
    /// Inside the fault cone, but the difference is masked at this node
    Masking,
    /// Outside the fault cone: a plain value to record
    SideInput,
}

fn model_bool(model: &Model, lit: crate::sat::SatLit) -> bool {
    matches!(model.value(lit), ModelVal::True)
}

/// Extract one sufficient propagation condition for the fault whose cone was
/// last encoded by `engine` into `model`, rooted at `origin`.
pub fn extract_sufficient_condition(
    network: &TpgNetwork,
    origin: NodeId,
    engine: &StructEngine,
    model: &Model,
) -> AssignList {
    // TFO of origin, matching the cone encode_fault built
    let mut fcone: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![origin];
    fcone.insert(origin);
    while let Some(n) = stack.pop() {
        if network.node(n).is_ppo() {
            continue;
        }
        for &fo in network.node(n).fanouts() {
            if fcone.insert(fo) {
                stack.push(fo);
            }
        }
    }

    let gval = |n: NodeId| -> bool {
        engine
            .good_lit_of(n)
            .map(|l| model_bool(model, l))
            .unwrap_or(false)
    };
    let fval = |n: NodeId| -> bool {
        engine
            .faulty_lit_of(n)
            .map(|l| model_bool(model, l))
            .unwrap_or_else(|| gval(n))
    };
    let classify = |n: NodeId| -> Role {
        if !fcone.contains(&n) {
            Role::SideInput
        } else if gval(n) != fval(n) {
            Role::Sensitized
        } else {
            Role::Masking
        }
    };

    let mut spo_list: Vec<NodeId> = fcone
        .iter()
        .copied()
        .filter(|&n| network.node(n).is_ppo() && gval(n) != fval(n))
        .collect();
    spo_list.sort();
    let spo = *spo_list.first().expect("sensitized fault must reach some PPO");

    let mut marks: HashMap<NodeId, Role> = HashMap::new();
    let mut queue: Vec<NodeId> = Vec::new();
    let mut put = |n: NodeId, role: Role, marks: &mut HashMap<NodeId, Role>, queue: &mut Vec<NodeId>| {
        if marks.contains_key(&n) {
            return;
        }
        marks.insert(n, role);
        queue.push(n);
    };
    put(spo, Role::Sensitized, &mut marks, &mut queue);

    let mut assign = AssignList::new();
    let mut rpos = 0;
    while rpos < queue.len() {
        let node = queue[rpos];
        rpos += 1;
        match marks[&node] {
            Role::Sensitized => {
                for &fanin in network.node(node).fanins() {
                    let role = classify(fanin);
                    put(fanin, role, &mut marks, &mut queue);
                }
            }
            Role::Masking => {
                let mut has_sensitized_fanin = false;
                let mut blocking: Vec<NodeId> = Vec::new();
                let cv = network.node(node).gate_type().and_then(|p| p.controlling_value());
                for &fanin in network.node(node).fanins() {
                    let role = classify(fanin);
                    if role == Role::Sensitized {
                        has_sensitized_fanin = true;
                    } else if role == Role::SideInput {
                        if let Some(cv) = cv {
                            if gval(fanin) == cv {
                                blocking.push(fanin);
                            }
                        }
                    }
                }
                blocking.sort();
                if has_sensitized_fanin && !blocking.is_empty() {
                    put(blocking[0], Role::SideInput, &mut marks, &mut queue);
                } else {
                    // the difference cancels out among in-cone fanins; recurse fully
                    for &fanin in network.node(node).fanins() {
                        let role = classify(fanin);
                        put(fanin, role, &mut marks, &mut queue);
                    }
                }
            }
            Role::SideInput => {
                let val = gval(node);
                assign
                    .add(NodeVal::new(node, TimeFrame::Present, val))
                    .expect("side-input assignments over distinct nodes cannot conflict");
            }
        }
    }
    assign
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PrimType;
    use crate::fault::{FaultMgr, FaultSite};
    use crate::ids::FaultType;
    use crate::sat::SatResult;

    /// E4: x = NOT(OR(AND(a1,a2), AND(b1,b2))); fault a1-sa1. Sufficient
    /// condition: a2=1 (sensitize), plus one of b1=0/b2=0 to block the other
    /// branch, tie-broken to the lowest node id.
    #[test]
    fn test_aoi22_e4() {
        let mut b = TpgNetwork::builder();
        let a1 = b.add_input();
        let a2 = b.add_input();
        let b1 = b.add_input();
        let b2 = b.add_input();
        let and_a = b.add_gate(PrimType::And, &[a1, a2]).unwrap();
        let and_b = b.add_gate(PrimType::And, &[b1, b2]).unwrap();
        let or_n = b.add_gate(PrimType::Nor, &[and_a, and_b]).unwrap();
        b.add_output(or_n).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let a1_sa1 = mgr
            .representative_faults()
            .find(|f| f.origin() == and_a && f.site() == FaultSite::Branch(0) && f.value())
            .unwrap();

        let mut eng = StructEngine::new(&net);
        let detect = eng.encode_fault(a1_sa1);
        let result = eng.solver_mut().solve(&[detect]);
        assert_eq!(result, SatResult::True);
        let model = eng.solver_mut().model();

        let assign = extract_sufficient_condition(&net, a1_sa1.origin(), &eng, &model);
        // a2 must be required at value 1
        assert_eq!(assign.get(a2, TimeFrame::Present), Some(true));
        // exactly one of b1/b2 required at 0, tie-broken to the lower id (b1)
        let b1_req = assign.get(b1, TimeFrame::Present);
        let b2_req = assign.get(b2, TimeFrame::Present);
        assert!(b1_req == Some(false) || b2_req == Some(false));
    }
}
