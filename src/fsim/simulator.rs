//! `Fsim`: the event-driven, word-parallel fault simulator (§4.3).
//!
//! One `Fsim` is built per network and reused across many `spsfp`/`sppfp`/
//! `ppsfp` calls: the node-value arrays and the event queue are allocated
//! once and overwritten in place, mirroring the teacher's bit-packed
//! `Simulation` type in spirit (value arrays indexed by id, not by pointer).

use smallvec::SmallVec;

use crate::bitvec::{TestVector, Val3};
use crate::circuit::{NodeKind, TpgNetwork};
use crate::fault::{FaultSite, TpgFault};
use crate::fsim::eventq::EventQ;
use crate::fsim::simnode::{Lanes, WORD_WIDTH};
use crate::ids::{FaultType, NodeId};

/// Word-parallel, event-driven fault simulator bound to one network.
pub struct Fsim<'a> {
    network: &'a TpgNetwork,
    val: Vec<Lanes>,
    queue: EventQ,
}

impl<'a> Fsim<'a> {
    /// Build a simulator for `network`, with every node initialized to X
    pub fn new(network: &'a TpgNetwork) -> Self {
        let n = network.nb_nodes();
        Fsim {
            network,
            val: vec![Lanes::X; n],
            queue: EventQ::new(n, network.max_level() as usize),
        }
    }

    fn lane_of(v: Val3) -> Lanes {
        match v {
            Val3::Zero => Lanes::ZERO,
            Val3::One => Lanes::ONE,
            Val3::X => Lanes::X,
        }
    }

    fn diff_mask(a: Lanes, b: Lanes) -> u64 {
        (a.v0 ^ b.v0) | (a.v1 ^ b.v1)
    }

    fn set_ppi(&mut self, id: NodeId, v: Lanes) {
        if self.val[id.index()] != v {
            self.val[id.index()] = v;
            for &fo in self.network.node(id).fanouts() {
                self.queue.put(fo, self.network.node(fo).level());
            }
        }
    }

    fn recompute(&self, n: NodeId) -> Lanes {
        let node = self.network.node(n);
        match node.kind() {
            NodeKind::Ppi => self.val[n.index()],
            NodeKind::Ppo => self.val[node.fanins()[0].index()],
            NodeKind::Logic(prim) => {
                let ins: SmallVec<[Lanes; 5]> =
                    node.fanins().iter().map(|f| self.val[f.index()]).collect();
                Lanes::eval(prim, &ins)
            }
        }
    }

    fn drain(&mut self) {
        while let Some(n) = self.queue.get() {
            let new = self.recompute(n);
            if new != self.val[n.index()] {
                self.val[n.index()] = new;
                for &fo in self.network.node(n).fanouts() {
                    self.queue.put(fo, self.network.node(fo).level());
                }
            }
        }
    }

    fn output_lanes(&self) -> Vec<Lanes> {
        self.network
            .outputs()
            .iter()
            .map(|&o| self.val[o.index()])
            .collect()
    }

    fn load_frame(&mut self, input: &[Lanes], dff: &[Lanes]) {
        for (i, &v) in input.iter().enumerate() {
            self.set_ppi(self.network.input(i), v);
        }
        for (i, &v) in dff.iter().enumerate() {
            self.set_ppi(self.network.dffs()[i].output, v);
        }
        self.drain();
    }

    /// Run the launch cycle; returns a full node-indexed snapshot, needed to
    /// resolve each DFF's capture-cycle value through its `alt_node`.
    fn run_frame0(&mut self, input0: &[Lanes], dff0: &[Lanes]) -> Vec<Lanes> {
        self.load_frame(input0, dff0);
        self.val.clone()
    }

    /// Run the capture cycle: each DFF output takes on the value its
    /// `alt_node` (the DFF's data input) settled to at the end of frame 0.
    fn run_frame1(&mut self, input1: &[Lanes], frame0: &[Lanes]) {
        let dff1: Vec<Lanes> = self
            .network
            .dffs()
            .iter()
            .map(|dff| {
                let alt = self
                    .network
                    .node(dff.output)
                    .alt_node()
                    .expect("DFF output missing alt_node in transition-delay mode");
                frame0[alt.index()]
            })
            .collect();
        self.load_frame(input1, &dff1);
    }

    /// Force `fault`'s site to its stuck-at/transition value on the lanes
    /// selected by `mask`, and enqueue the origin's fanouts. Does not drain.
    ///
    /// A stem fault overrides the origin node's own output; a branch fault
    /// overrides only the value the origin gate sees on one fanin edge, so
    /// the fanin node's value as seen by its other consumers is untouched.
    fn apply_fault(&mut self, fault: &TpgFault, mask: u64) {
        let origin = fault.origin();
        let node = self.network.node(origin);
        let forced = if fault.value() { Lanes::ONE } else { Lanes::ZERO };
        let new = match fault.site() {
            FaultSite::Stem => {
                let cur = self.val[origin.index()];
                Lanes {
                    v0: (cur.v0 & !mask) | (forced.v0 & mask),
                    v1: (cur.v1 & !mask) | (forced.v1 & mask),
                }
            }
            FaultSite::Branch(idx) => {
                let prim = node.gate_type().expect("fault origin must be a logic node");
                let mut ins: SmallVec<[Lanes; 5]> =
                    node.fanins().iter().map(|f| self.val[f.index()]).collect();
                let cur_in = ins[idx];
                ins[idx] = Lanes {
                    v0: (cur_in.v0 & !mask) | (forced.v0 & mask),
                    v1: (cur_in.v1 & !mask) | (forced.v1 & mask),
                };
                let evaled = Lanes::eval(prim, &ins);
                let cur_out = self.val[origin.index()];
                Lanes {
                    v0: (cur_out.v0 & !mask) | (evaled.v0 & mask),
                    v1: (cur_out.v1 & !mask) | (evaled.v1 & mask),
                }
            }
        };
        if new != self.val[origin.index()] {
            self.val[origin.index()] = new;
            for &fo in node.fanouts() {
                self.queue.put(fo, self.network.node(fo).level());
            }
        }
    }

    fn lanes_of_single(&self, tv: &TestVector) -> (Vec<Lanes>, Vec<Lanes>, Vec<Lanes>) {
        let nb_inputs = self.network.nb_inputs();
        let nb_dffs = self.network.nb_dffs();
        let in0 = (0..nb_inputs).map(|i| Self::lane_of(tv.input_val(i))).collect();
        let dff0 = (0..nb_dffs).map(|i| Self::lane_of(tv.dff_val(i))).collect();
        let in1 = if tv.fault_type() == FaultType::TransitionDelay {
            (0..nb_inputs)
                .map(|i| Self::lane_of(tv.input_val_time1(i)))
                .collect()
        } else {
            Vec::new()
        };
        (in0, dff0, in1)
    }

    fn lanes_of_many(&self, patterns: &[TestVector]) -> (Vec<Lanes>, Vec<Lanes>, Vec<Lanes>) {
        let nb_inputs = self.network.nb_inputs();
        let nb_dffs = self.network.nb_dffs();
        let pack = |get: &dyn Fn(&TestVector) -> Val3| -> Lanes {
            let mut v0 = 0u64;
            let mut v1 = 0u64;
            for (lane, tv) in patterns.iter().enumerate() {
                let lv = Self::lane_of(get(tv));
                v0 |= (lv.v0 & 1) << lane;
                v1 |= (lv.v1 & 1) << lane;
            }
            Lanes { v0, v1 }
        };
        let in0 = (0..nb_inputs).map(|i| pack(&|tv| tv.input_val(i))).collect();
        let dff0 = (0..nb_dffs).map(|i| pack(&|tv| tv.dff_val(i))).collect();
        let in1 = if patterns[0].fault_type() == FaultType::TransitionDelay {
            (0..nb_inputs)
                .map(|i| pack(&|tv| tv.input_val_time1(i)))
                .collect()
        } else {
            Vec::new()
        };
        (in0, dff0, in1)
    }

    /// Fault-free simulation of a single test vector
    pub fn simulate_good(&mut self, tv: &TestVector) -> Vec<Lanes> {
        let (in0, dff0, in1) = self.lanes_of_single(tv);
        let frame0 = self.run_frame0(&in0, &dff0);
        if tv.fault_type() == FaultType::TransitionDelay {
            self.run_frame1(&in1, &frame0);
        }
        self.output_lanes()
    }

    /// Single-pattern, single-fault detection check
    pub fn spsfp(&mut self, tv: &TestVector, fault: &TpgFault) -> bool {
        self.sppfp(tv, std::slice::from_ref(fault))[0]
    }

    /// Single-pattern, parallel-fault detection: up to [`WORD_WIDTH`] faults
    /// batched into one pass, each assigned its own lane (§4.3).
    pub fn sppfp(&mut self, tv: &TestVector, faults: &[TpgFault]) -> Vec<bool> {
        assert!(!faults.is_empty() && faults.len() <= WORD_WIDTH);
        let (in0, dff0, in1) = self.lanes_of_single(tv);
        let frame0 = self.run_frame0(&in0, &dff0);
        if tv.fault_type() == FaultType::TransitionDelay {
            self.run_frame1(&in1, &frame0);
        }
        let good = self.output_lanes();

        for (lane, fault) in faults.iter().enumerate() {
            self.apply_fault(fault, 1u64 << lane);
        }
        self.drain();
        let faulty = self.output_lanes();

        let mut detected = vec![false; faults.len()];
        for (g, f) in good.iter().zip(faulty.iter()) {
            let mask = Self::diff_mask(*g, *f);
            for (lane, d) in detected.iter_mut().enumerate() {
                if mask & (1u64 << lane) != 0 {
                    *d = true;
                }
            }
        }
        detected
    }

    /// Parallel-pattern, single-fault detection: up to [`WORD_WIDTH`]
    /// patterns packed into one pass, `bit i` of the result set iff pattern
    /// `i` detects `fault` (§4.3). `ppsfp(...)` must agree bit-for-bit with
    /// calling `spsfp` on each pattern individually (§8 invariant 9).
    pub fn ppsfp(&mut self, patterns: &[TestVector], fault: &TpgFault) -> u64 {
        assert!(!patterns.is_empty() && patterns.len() <= WORD_WIDTH);
        let (in0, dff0, in1) = self.lanes_of_many(patterns);
        let frame0 = self.run_frame0(&in0, &dff0);
        if patterns[0].fault_type() == FaultType::TransitionDelay {
            self.run_frame1(&in1, &frame0);
        }
        let good = self.output_lanes();

        let full_mask = if patterns.len() == WORD_WIDTH {
            !0u64
        } else {
            (1u64 << patterns.len()) - 1
        };
        self.apply_fault(fault, full_mask);
        self.drain();
        let faulty = self.output_lanes();

        let mut detect = 0u64;
        for (g, f) in good.iter().zip(faulty.iter()) {
            detect |= Self::diff_mask(*g, *f);
        }
        detect & full_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{PrimType, TpgNetwork};
    use crate::fault::FaultMgr;

    fn and2_net() -> TpgNetwork {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        b.build().unwrap()
    }

    fn tv_from_bits(net: &TpgNetwork, bits: &[Val3]) -> TestVector {
        let mut tv = TestVector::new(FaultType::StuckAt, net.nb_inputs(), net.nb_dffs());
        for (i, &v) in bits.iter().enumerate() {
            tv.set_input(i, v);
        }
        tv
    }

    #[test]
    fn test_good_and2() {
        let net = and2_net();
        let mut fsim = Fsim::new(&net);
        let tv = tv_from_bits(&net, &[Val3::One, Val3::One]);
        let out = fsim.simulate_good(&tv);
        assert_eq!(out[0], Lanes::ONE);

        let tv2 = tv_from_bits(&net, &[Val3::One, Val3::Zero]);
        let out2 = fsim.simulate_good(&tv2);
        assert_eq!(out2[0], Lanes::ZERO);
    }

    #[test]
    fn test_x_sa0_detected_by_11() {
        let net = and2_net();
        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let x_sa1 = mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Stem && f.value())
            .unwrap();
        let mut fsim = Fsim::new(&net);
        let tv = tv_from_bits(&net, &[Val3::One, Val3::One]);
        // AND(1,1) = 1 good; x stuck-at-1 has no observable effect here
        assert!(!fsim.spsfp(&tv, x_sa1));

        let x_sa0 = mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Stem && !f.value())
            .unwrap();
        // x stuck-at-0 is excited and observed: good=1, faulty=0
        assert!(fsim.spsfp(&tv, x_sa0));
    }

    #[test]
    fn test_sppfp_matches_spsfp() {
        let net = and2_net();
        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let faults: Vec<TpgFault> = mgr.representative_faults().copied().collect();
        let tv = tv_from_bits(&net, &[Val3::One, Val3::One]);

        let mut fsim = Fsim::new(&net);
        let batch = fsim.sppfp(&tv, &faults);
        for (i, f) in faults.iter().enumerate() {
            let mut fsim2 = Fsim::new(&net);
            assert_eq!(fsim2.spsfp(&tv, f), batch[i]);
        }
    }

    /// A `Branch` fault must merge only its masked lanes into the origin's
    /// value, not overwrite the whole word: batching a `Stem` fault and a
    /// `Branch` fault at the same origin must not let the branch fault's
    /// application clobber the stem fault's already-forced lanes.
    #[test]
    fn test_branch_fault_does_not_clobber_stem_fault_same_origin() {
        let net = and2_net();
        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let x_sa0 = *mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Stem && !f.value())
            .unwrap();
        let a_sa1 = *mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Branch(0) && f.value())
            .unwrap();
        let tv = tv_from_bits(&net, &[Val3::One, Val3::One]);

        let mut fsim = Fsim::new(&net);
        let batch = fsim.sppfp(&tv, &[x_sa0, a_sa1]);

        let mut single = Fsim::new(&net);
        assert_eq!(batch[0], single.spsfp(&tv, &x_sa0));
    }

    #[test]
    fn test_ppsfp_matches_spsfp() {
        let net = and2_net();
        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let fault = mgr
            .representative_faults()
            .find(|f| f.site() == FaultSite::Stem && !f.value())
            .unwrap();
        let patterns = vec![
            tv_from_bits(&net, &[Val3::One, Val3::One]),
            tv_from_bits(&net, &[Val3::Zero, Val3::One]),
            tv_from_bits(&net, &[Val3::One, Val3::Zero]),
        ];

        let mut fsim = Fsim::new(&net);
        let mask = fsim.ppsfp(&patterns, fault);

        for (i, tv) in patterns.iter().enumerate() {
            let mut single = Fsim::new(&net);
            let expect = single.spsfp(tv, fault);
            assert_eq!(mask & (1 << i) != 0, expect);
        }
    }
}
