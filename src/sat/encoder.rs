//! `StructEngine`: the Boolean-difference CNF encoder (§4.4).
//!
//! Uses the standard per-gate Tseitin clause patterns (AND/OR minimal
//! forms, XOR's 4-clause 2-input expansion), generalized from "one network
//! to CNF" into "good cone + faulty cone with a shared prefix" so multiple
//! faults in one FFR reuse the good-side clauses.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::circuit::{NodeKind, PrimType, TpgNetwork};
use crate::fault::{FaultSite, TpgFault};
use crate::ids::NodeId;
use crate::sat::solver::{DruidSolver, SatLit};

fn emit_gate(solver: &mut DruidSolver, prim: PrimType, ins: &[SatLit], out: SatLit) {
    match prim {
        PrimType::C0 => solver.add_clause(&[out.negate()]),
        PrimType::C1 => solver.add_clause(&[out]),
        PrimType::Buff => {
            solver.add_clause(&[ins[0].negate(), out]);
            solver.add_clause(&[ins[0], out.negate()]);
        }
        PrimType::Not => {
            solver.add_clause(&[ins[0], out]);
            solver.add_clause(&[ins[0].negate(), out.negate()]);
        }
        PrimType::And => emit_and(solver, ins, out, false),
        PrimType::Nand => emit_and(solver, ins, out, true),
        PrimType::Or => emit_or(solver, ins, out, false),
        PrimType::Nor => emit_or(solver, ins, out, true),
        PrimType::Xor => emit_xor(solver, ins, out, false),
        PrimType::Xnor => emit_xor(solver, ins, out, true),
    }
}

/// `o <-> AND(ins)`, with `o = out` or `o = ¬out` depending on `invert`:
/// `n` binary clauses `(¬o ∨ i_k)` plus one `(n+1)`-ary clause.
fn emit_and(solver: &mut DruidSolver, ins: &[SatLit], out: SatLit, invert: bool) {
    let o = if invert { out.negate() } else { out };
    for &i in ins {
        solver.add_clause(&[i, o.negate()]);
    }
    let mut last = vec![o];
    last.extend(ins.iter().map(|i| i.negate()));
    solver.add_clause(&last);
}

/// Dual of [`emit_and`]: `o <-> OR(ins)`
fn emit_or(solver: &mut DruidSolver, ins: &[SatLit], out: SatLit, invert: bool) {
    let o = if invert { out.negate() } else { out };
    for &i in ins {
        solver.add_clause(&[i.negate(), o]);
    }
    let mut last = vec![o.negate()];
    last.extend(ins.iter().copied());
    solver.add_clause(&last);
}

/// `o <-> XOR(ins)`. Two inputs use the standard 4 ternary clauses; wider
/// fanins are folded pairwise through fresh auxiliary variables.
fn emit_xor(solver: &mut DruidSolver, ins: &[SatLit], out: SatLit, invert: bool) {
    let o = if invert { out.negate() } else { out };
    if ins.len() == 2 {
        emit_xor2(solver, ins[0], ins[1], o);
        return;
    }
    let mut acc = ins[0];
    for &i in &ins[1..ins.len() - 1] {
        let aux = solver.new_var();
        emit_xor2(solver, acc, i, aux);
        acc = aux;
    }
    emit_xor2(solver, acc, ins[ins.len() - 1], o);
}

fn emit_xor2(solver: &mut DruidSolver, a: SatLit, b: SatLit, o: SatLit) {
    solver.add_clause(&[a.negate(), b.negate(), o.negate()]);
    solver.add_clause(&[a, b, o.negate()]);
    solver.add_clause(&[a.negate(), b, o]);
    solver.add_clause(&[a, b.negate(), o]);
}

/// Monotonic CNF builder shared by every fault processed within one FFR or
/// MFFC: good-side clauses are emitted once per node and reused; each
/// `encode_fault` call adds only the faulty-cone clauses for that one fault.
///
/// Transition-delay faults unroll two frames, mirroring [`crate::fsim`]'s
/// `run_frame0`/`run_frame1` split: `past` is an independent good-side cone
/// over a second copy of every primary input (the launch pattern), and a
/// DFF's present-frame literal is tied to its `alt_node`'s past-frame literal
/// rather than left free, so the capture-frame DFF state is whatever the
/// launch pattern settled into. `encode_fault_origin` still forces the
/// fault only in the present/capture frame, exactly as `apply_fault` does.
pub struct StructEngine<'a> {
    network: &'a TpgNetwork,
    solver: DruidSolver,
    good: HashMap<NodeId, SatLit>,
    faulty: HashMap<NodeId, SatLit>,
    past: HashMap<NodeId, SatLit>,
    td_mode: bool,
}

impl<'a> StructEngine<'a> {
    /// An empty engine bound to `network`
    pub fn new(network: &'a TpgNetwork) -> Self {
        StructEngine {
            network,
            solver: DruidSolver::new(),
            good: HashMap::new(),
            faulty: HashMap::new(),
            past: HashMap::new(),
            td_mode: false,
        }
    }

    /// Good-side literal for `id` in the present/capture frame, allocating it
    /// and its whole TFI on demand. In transition-delay mode, a DFF output
    /// is tied to its `alt_node`'s launch-frame literal instead of being
    /// left free.
    pub fn add_cur_node(&mut self, id: NodeId) -> SatLit {
        if let Some(&l) = self.good.get(&id) {
            return l;
        }
        let kind = self.network.node(id).kind();
        let lit = match kind {
            NodeKind::Ppi => {
                if self.td_mode {
                    if let Some(alt) = self.network.node(id).alt_node() {
                        self.add_past_node(alt)
                    } else {
                        self.solver.new_var()
                    }
                } else {
                    self.solver.new_var()
                }
            }
            NodeKind::Ppo => {
                let fanin = self.network.node(id).fanins()[0];
                self.add_cur_node(fanin)
            }
            NodeKind::Logic(prim) => {
                let fanins: SmallVec<[NodeId; 5]> =
                    self.network.node(id).fanins().iter().copied().collect();
                let fanin_lits: SmallVec<[SatLit; 5]> =
                    fanins.iter().map(|&f| self.add_cur_node(f)).collect();
                let out = self.solver.new_var();
                emit_gate(&mut self.solver, prim, &fanin_lits, out);
                out
            }
        };
        self.good.insert(id, lit);
        lit
    }

    /// Good-side literal for `id` in the launch/past frame: every PPI,
    /// DFF outputs included, is a fresh free variable — the launch pattern
    /// is an independent primary-input vector and the model only unrolls
    /// two frames, so a DFF's own previous state is not constrained further.
    fn add_past_node(&mut self, id: NodeId) -> SatLit {
        if let Some(&l) = self.past.get(&id) {
            return l;
        }
        let kind = self.network.node(id).kind();
        let lit = match kind {
            NodeKind::Ppi => self.solver.new_var(),
            NodeKind::Ppo => {
                let fanin = self.network.node(id).fanins()[0];
                self.add_past_node(fanin)
            }
            NodeKind::Logic(prim) => {
                let fanins: SmallVec<[NodeId; 5]> =
                    self.network.node(id).fanins().iter().copied().collect();
                let fanin_lits: SmallVec<[SatLit; 5]> =
                    fanins.iter().map(|&f| self.add_past_node(f)).collect();
                let out = self.solver.new_var();
                emit_gate(&mut self.solver, prim, &fanin_lits, out);
                out
            }
        };
        self.past.insert(id, lit);
        lit
    }

    fn transitive_fanout(&self, origin: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![origin];
        seen.insert(origin);
        while let Some(n) = stack.pop() {
            order.push(n);
            if self.network.node(n).is_ppo() {
                continue;
            }
            for &fo in self.network.node(n).fanouts() {
                if seen.insert(fo) {
                    stack.push(fo);
                }
            }
        }
        order.sort_by_key(|&n| self.network.node(n).level());
        order
    }

    /// Encode one fault's faulty cone and detection clause, returning a
    /// single literal such that `solve(&[lit])` asks "does some pattern
    /// excite and propagate this fault to an observable output?" (§4.4).
    pub fn encode_fault(&mut self, fault: &TpgFault) -> SatLit {
        self.faulty.clear();
        self.td_mode = fault.fault_type() == crate::ids::FaultType::TransitionDelay;
        let origin = fault.origin();
        let cone = self.transitive_fanout(origin);

        for &n in &cone {
            let kind = self.network.node(n).kind();
            let lit = if n == origin {
                self.encode_fault_origin(fault)
            } else {
                match kind {
                    NodeKind::Ppo => {
                        let fanin = self.network.node(n).fanins()[0];
                        self.faulty_lit(fanin)
                    }
                    NodeKind::Logic(prim) => {
                        let fanins: SmallVec<[NodeId; 5]> =
                            self.network.node(n).fanins().iter().copied().collect();
                        let ins: SmallVec<[SatLit; 5]> =
                            fanins.iter().map(|&f| self.faulty_lit(f)).collect();
                        let out = self.solver.new_var();
                        emit_gate(&mut self.solver, prim, &ins, out);
                        out
                    }
                    NodeKind::Ppi => unreachable!("a PPI cannot be downstream of a fault origin"),
                }
            };
            self.faulty.insert(n, lit);
        }

        let observable: Vec<NodeId> = self
            .network
            .outputs()
            .iter()
            .copied()
            .filter(|o| self.faulty.contains_key(o))
            .collect();
        let witnesses: Vec<SatLit> = observable
            .into_iter()
            .map(|o| {
                let g = self.add_cur_node(o);
                let f = self.faulty[&o];
                let w = self.solver.new_var();
                emit_xor2(&mut self.solver, g, f, w);
                w
            })
            .collect();

        let detect = self.solver.new_var();
        let mut clause = vec![detect.negate()];
        clause.extend(witnesses.iter().copied());
        self.solver.add_clause(&clause);
        for w in &witnesses {
            self.solver.add_clause(&[w.negate(), detect]);
        }
        detect
    }

    /// Value a node takes on the faulty side, reading the already-populated
    /// faulty cone if present, or falling back to the (unaffected) good value
    fn faulty_lit(&mut self, id: NodeId) -> SatLit {
        if let Some(&l) = self.faulty.get(&id) {
            l
        } else {
            self.add_cur_node(id)
        }
    }

    /// Faulty-side value at the fault's own origin node: a stem fault forces
    /// a constant; a branch fault forces one fanin edge to a constant and
    /// re-evaluates the gate with the other fanins taking their good values
    fn encode_fault_origin(&mut self, fault: &TpgFault) -> SatLit {
        let origin = fault.origin();
        match fault.site() {
            FaultSite::Stem => {
                let lit = self.solver.new_var();
                let forced = if fault.value() { lit } else { lit.negate() };
                self.solver.add_clause(&[forced]);
                lit
            }
            FaultSite::Branch(idx) => {
                let prim = self
                    .network
                    .node(origin)
                    .gate_type()
                    .expect("branch fault origin must be a logic node");
                let fanins: SmallVec<[NodeId; 5]> =
                    self.network.node(origin).fanins().iter().copied().collect();
                let edge = self.solver.new_var();
                let forced = if fault.value() { edge } else { edge.negate() };
                self.solver.add_clause(&[forced]);
                let ins: SmallVec<[SatLit; 5]> = fanins
                    .iter()
                    .enumerate()
                    .map(|(i, &f)| if i == idx { edge } else { self.add_cur_node(f) })
                    .collect();
                let out = self.solver.new_var();
                emit_gate(&mut self.solver, prim, &ins, out);
                out
            }
        }
    }

    /// The good-side literal for `id`, if it has been allocated
    pub fn good_lit_of(&self, id: NodeId) -> Option<SatLit> {
        self.good.get(&id).copied()
    }

    /// The faulty-side literal for `id` within the most recent `encode_fault`
    /// call, if `id` is in that fault's cone
    pub fn faulty_lit_of(&self, id: NodeId) -> Option<SatLit> {
        self.faulty.get(&id).copied()
    }

    /// The launch-frame literal for `id`, if transition-delay encoding has
    /// allocated one (only ever populated while `td_mode` is set).
    pub fn past_lit_of(&self, id: NodeId) -> Option<SatLit> {
        self.past.get(&id).copied()
    }

    /// Mutable access to the underlying solver, for the DTPG driver's solve calls
    pub fn solver_mut(&mut self) -> &mut DruidSolver {
        &mut self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::TpgNetwork;
    use crate::fault::FaultMgr;
    use crate::ids::FaultType;
    use crate::sat::solver::SatResult;

    #[test]
    fn test_and2_x_sa0_is_sat() {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let x_sa0 = mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Stem && !f.value())
            .unwrap();

        let mut eng = StructEngine::new(&net);
        let detect = eng.encode_fault(x_sa0);
        let result = eng.solver_mut().solve(&[detect]);
        assert_eq!(result, SatResult::True);
    }

    #[test]
    fn test_buffer_chain_unsat_for_impossible_fault() {
        // out = BUFF(BUFF(a)); out-sa at the gate driven by a constant edge
        // fault with an always-false value still needs excitation, so this
        // just checks the encoder doesn't panic and returns a definite verdict
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let n1 = b.add_gate(PrimType::Buff, &[a]).unwrap();
        let n2 = b.add_gate(PrimType::Buff, &[n1]).unwrap();
        b.add_output(n2).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        for f in mgr.representative_faults() {
            let mut eng = StructEngine::new(&net);
            let detect = eng.encode_fault(f);
            let result = eng.solver_mut().solve(&[detect]);
            assert_ne!(result, SatResult::Unknown);
        }
    }

    /// Transition-delay faults must tie a DFF output's present-frame literal
    /// to its data input's launch-frame literal, not leave it free — this is
    /// the structural invariant that makes the encoding a genuine two-frame
    /// transition model rather than a single-frame stuck-at encoding.
    #[test]
    fn test_transition_delay_ties_dff_output_to_launch_frame() {
        let mut b = TpgNetwork::builder();
        let d_in = b.add_input();
        let q = b.add_dff(d_in).unwrap();
        let buf = b.add_gate(PrimType::Buff, &[q]).unwrap();
        b.add_output(buf).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::TransitionDelay);
        let f = mgr
            .representative_faults()
            .find(|f| f.origin() == buf)
            .expect("buf must carry a transition-delay fault");

        let mut eng = StructEngine::new(&net);
        let detect = eng.encode_fault(f);
        let result = eng.solver_mut().solve(&[detect]);
        assert_ne!(result, SatResult::Unknown);

        // reaching q's good literal must have populated the launch-frame
        // cone for d_in, tied to the exact same variable
        let q_good = eng.add_cur_node(q);
        let d_in_past = eng
            .past_lit_of(d_in)
            .expect("launch-frame cone for the DFF's data input must be built");
        assert_eq!(q_good, d_in_past);
    }
}
