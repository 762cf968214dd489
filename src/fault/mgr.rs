//! `FaultMgr`: fault enumeration, equivalence collapse and status tracking.

use std::collections::HashMap;

use crate::circuit::TpgNetwork;
use crate::fault::fault::{FaultSite, FaultStatus, TpgFault};
use crate::ids::{FaultId, FaultType, FfrId, MffcId, NodeId};

/// Owns the fault list for a network and tracks each fault's [`FaultStatus`].
///
/// Built once via [`FaultMgr::generate`], which enumerates every stuck-at (or
/// transition-delay) fault on every node and collapses structurally
/// equivalent faults onto a canonical representative (§4.1). The default
/// fault list exposed to the DTPG driver contains representatives only.
#[derive(Clone, Debug)]
pub struct FaultMgr {
    fault_type: FaultType,
    faults: Vec<TpgFault>,
    status: Vec<FaultStatus>,
    by_node: HashMap<NodeId, Vec<FaultId>>,
    by_ffr: HashMap<FfrId, Vec<FaultId>>,
    by_mffc: HashMap<MffcId, Vec<FaultId>>,
}

impl FaultMgr {
    /// Enumerate every representative fault of `network` under `fault_type`
    pub fn generate(network: &TpgNetwork, fault_type: FaultType) -> FaultMgr {
        let mut faults = Vec::new();
        // one entry per (node, stuck-at value) pointing at the stem fault id,
        // used to resolve branch-fault equivalence
        let mut stem_id: HashMap<(NodeId, bool), FaultId> = HashMap::new();

        for node_id in network.node_ids() {
            let node = network.node(node_id);
            let gate = match node.gate_type() {
                Some(g) => g,
                None => continue, // PPIs/PPOs carry no gate-level faults of their own
            };
            for value in [false, true] {
                let stem_fid = FaultId::new(faults.len());
                faults.push(TpgFault::new(
                    stem_fid,
                    fault_type,
                    node_id,
                    FaultSite::Stem,
                    value,
                ));
                stem_id.insert((node_id, value), stem_fid);

                for fanin_idx in 0..node.fanins().len() {
                    let fid = FaultId::new(faults.len());
                    faults.push(TpgFault::new(
                        fid,
                        fault_type,
                        node_id,
                        FaultSite::Branch(fanin_idx),
                        value,
                    ));
                    if let Some(cv) = gate.controlling_value() {
                        if value == cv {
                            let stem_val = cv ^ gate.inverting();
                            let rep = stem_id[&(node_id, stem_val)];
                            faults[fid.index()].set_representative(rep);
                        }
                    }
                }
            }
        }

        let status = vec![FaultStatus::Undetected; faults.len()];

        let mut by_node: HashMap<NodeId, Vec<FaultId>> = HashMap::new();
        let mut by_ffr: HashMap<FfrId, Vec<FaultId>> = HashMap::new();
        let mut by_mffc: HashMap<MffcId, Vec<FaultId>> = HashMap::new();
        for f in &faults {
            if !f.is_representative() {
                continue;
            }
            by_node.entry(f.origin()).or_default().push(f.id());
            if let Some(ffr) = network.node(f.origin()).ffr() {
                by_ffr.entry(ffr).or_default().push(f.id());
                // every FFR belongs to exactly one MFFC (§8 invariant 3)
                for mffc in network.mffcs() {
                    if mffc.ffrs().contains(&ffr) {
                        by_mffc.entry(mffc.id()).or_default().push(f.id());
                        break;
                    }
                }
            }
        }

        FaultMgr {
            fault_type,
            faults,
            status,
            by_node,
            by_ffr,
            by_mffc,
        }
    }

    /// The fault model faults were enumerated under
    pub fn fault_type(&self) -> FaultType {
        self.fault_type
    }

    /// Access a fault by id
    pub fn fault(&self, id: FaultId) -> &TpgFault {
        &self.faults[id.index()]
    }

    /// Every enumerated fault, including non-representatives
    pub fn all_faults(&self) -> &[TpgFault] {
        &self.faults
    }

    /// Only the representative faults: the default fault list for DTPG
    pub fn representative_faults(&self) -> impl Iterator<Item = &TpgFault> {
        self.faults.iter().filter(|f| f.is_representative())
    }

    /// Representative faults whose origin is `node`
    pub fn faults_of_node(&self, node: NodeId) -> &[FaultId] {
        self.by_node.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Representative faults contained in FFR `ffr`
    pub fn faults_of_ffr(&self, ffr: FfrId) -> &[FaultId] {
        self.by_ffr.get(&ffr).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Representative faults contained in MFFC `mffc`
    pub fn faults_of_mffc(&self, mffc: MffcId) -> &[FaultId] {
        self.by_mffc.get(&mffc).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Current status of a fault
    pub fn status(&self, id: FaultId) -> FaultStatus {
        self.status[id.index()]
    }

    /// Update a fault's status. Only the DTPG driver should call this; it
    /// is not enforced at the type level but the spec's single-writer
    /// policy (§5) relies on callers respecting it.
    pub fn set_status(&mut self, id: FaultId, status: FaultStatus) {
        self.status[id.index()] = status;
    }

    /// Number of representative faults still `Undetected`
    pub fn nb_undetected(&self) -> usize {
        self.representative_faults()
            .filter(|f| self.status(f.id()) == FaultStatus::Undetected)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{PrimType, TpgNetwork};
    use crate::fault::fault::FaultSite;

    /// E1: 2-input AND, stuck-at. Representatives should be exactly
    /// {a-sa1, b-sa1, x-sa0, x-sa1}.
    #[test]
    fn test_and2_equivalence_e1() {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let bb = b.add_input();
        let g = b.add_gate(PrimType::And, &[a, bb]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        let reps: Vec<&TpgFault> = mgr.representative_faults().collect();
        assert_eq!(reps.len(), 4);

        let stem_reps: Vec<&&TpgFault> = reps
            .iter()
            .filter(|f| f.origin() == g && f.site() == FaultSite::Stem)
            .collect();
        assert_eq!(stem_reps.len(), 2); // x-sa0, x-sa1

        let branch_reps: Vec<&&TpgFault> = reps
            .iter()
            .filter(|f| matches!(f.site(), FaultSite::Branch(_)))
            .collect();
        assert_eq!(branch_reps.len(), 2); // a-sa1, b-sa1 survive; *-sa0 collapse
        for f in branch_reps {
            assert!(f.value()); // only the sa1 branch faults remain
        }
    }

    #[test]
    fn test_nand_equivalence_collapses_onto_stem_sa1() {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let bb = b.add_input();
        let g = b.add_gate(PrimType::Nand, &[a, bb]).unwrap();
        b.add_output(g).unwrap();
        let net = b.build().unwrap();

        let mgr = FaultMgr::generate(&net, FaultType::StuckAt);
        // branch sa0 faults on a NAND collapse onto the stem's sa1 fault
        for fault in mgr.all_faults() {
            if fault.origin() == g && matches!(fault.site(), FaultSite::Branch(_)) && !fault.value()
            {
                let rep = mgr.fault(fault.representative());
                assert_eq!(rep.site(), FaultSite::Stem);
                assert!(rep.value());
            }
        }
    }
}
