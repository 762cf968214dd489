//! FFR and MFFC driver variants implementing the per-fault loop of §4.5.

use crate::bitvec::TestVector;
use crate::circuit::TpgNetwork;
use crate::dtpg::mgr::{imprint_test_vector, DtpgOptions};
use crate::dtpg::mgr::DtpgStats;
use crate::extract::extract_sufficient_condition;
use crate::fault::{FaultMgr, FaultStatus, TpgFault};
use crate::fsim::Fsim;
use crate::ids::{FaultId, FaultType, NodeId, TimeFrame};
use crate::justify;
use crate::sat::{ModelVal, StructEngine};

type DetectedCb<'a> = dyn FnMut(&TpgFault, &TestVector) + 'a;
type UndetCb<'a> = dyn FnMut(&TpgFault) + 'a;

/// One CNF per FFR, reused across that FFR's faults
pub fn run_ffr_driver(
    network: &TpgNetwork,
    fault_mgr: &mut FaultMgr,
    test_vectors: &mut Vec<TestVector>,
    stats: &mut DtpgStats,
    options: &DtpgOptions,
    on_detected: &mut DetectedCb,
    on_untestable: &mut UndetCb,
    on_aborted: &mut UndetCb,
) {
    let ffr_ids: Vec<_> = network.ffrs().iter().map(|f| f.id()).collect();
    for ffr_id in ffr_ids {
        let fault_ids = fault_mgr.faults_of_ffr(ffr_id).to_vec();
        if fault_ids.is_empty() {
            continue;
        }
        let mut engine = StructEngine::new(network);
        process_fault_list(
            network,
            &mut engine,
            fault_mgr,
            test_vectors,
            stats,
            options,
            &fault_ids,
            on_detected,
            on_untestable,
            on_aborted,
        );
    }
}

/// One CNF per MFFC, with every FFR's faults grouped onto one shared engine
/// instance instead of introducing explicit per-FFR selector variables (see
/// DESIGN.md): `StructEngine::encode_fault` already scopes each fault's
/// faulty cone to its own TFO, so correctness does not depend on the
/// selector mechanism, only the amount of CNF reuse across faults does.
pub fn run_mffc_driver(
    network: &TpgNetwork,
    fault_mgr: &mut FaultMgr,
    test_vectors: &mut Vec<TestVector>,
    stats: &mut DtpgStats,
    options: &DtpgOptions,
    on_detected: &mut DetectedCb,
    on_untestable: &mut UndetCb,
    on_aborted: &mut UndetCb,
) {
    let mffc_ids: Vec<_> = network.mffcs().iter().map(|m| m.id()).collect();
    for mffc_id in mffc_ids {
        let fault_ids = fault_mgr.faults_of_mffc(mffc_id).to_vec();
        if fault_ids.is_empty() {
            continue;
        }
        let mut engine = StructEngine::new(network);
        process_fault_list(
            network,
            &mut engine,
            fault_mgr,
            test_vectors,
            stats,
            options,
            &fault_ids,
            on_detected,
            on_untestable,
            on_aborted,
        );
    }
}

fn process_fault_list(
    network: &TpgNetwork,
    engine: &mut StructEngine,
    fault_mgr: &mut FaultMgr,
    test_vectors: &mut Vec<TestVector>,
    stats: &mut DtpgStats,
    options: &DtpgOptions,
    fault_ids: &[FaultId],
    on_detected: &mut DetectedCb,
    on_untestable: &mut UndetCb,
    on_aborted: &mut UndetCb,
) {
    for &fid in fault_ids {
        if fault_mgr.status(fid) != FaultStatus::Undetected {
            continue;
        }
        let fault = fault_mgr.fault(fid).clone();
        let detect_lit = engine.encode_fault(&fault);
        let result = engine.solver_mut().solve(&[detect_lit]);

        match result {
            crate::sat::SatResult::True => {
                let model = engine.solver_mut().model();
                let side_inputs = extract_sufficient_condition(network, fault.origin(), engine, &model);
                let has_prev_state = fault.fault_type() == FaultType::TransitionDelay;
                let val = |n: NodeId, t: TimeFrame| -> bool {
                    let lit = match t {
                        TimeFrame::Present => engine.good_lit_of(n).or_else(|| engine.faulty_lit_of(n)),
                        TimeFrame::Past => engine.past_lit_of(n),
                    };
                    lit.map(|l| matches!(model.value(l), ModelVal::True)).unwrap_or(false)
                };
                let pi_assign =
                    justify::justify(options.justifier, network, &val, has_prev_state, &side_inputs);
                let tv = imprint_test_vector(network, fault.fault_type(), &pi_assign);

                fault_mgr.set_status(fid, FaultStatus::Detected);
                stats.nb_detected += 1;
                test_vectors.push(tv.clone());
                on_detected(&fault, &tv);

                if options.drop_detected_by_sim {
                    drop_further_faults(network, fault_mgr, &tv, stats, on_detected);
                }
            }
            crate::sat::SatResult::False => {
                fault_mgr.set_status(fid, FaultStatus::Untestable);
                stats.nb_untestable += 1;
                on_untestable(&fault);
            }
            crate::sat::SatResult::Unknown => {
                stats.nb_aborted += 1;
                on_aborted(&fault);
            }
        }
    }
}

/// Fault-simulate a freshly detected vector against every still-undetected
/// fault and drop every one it also detects, up to 64 faults per batch
/// (§4.5 step 3, `Fsim::sppfp`).
fn drop_further_faults(
    network: &TpgNetwork,
    fault_mgr: &mut FaultMgr,
    tv: &TestVector,
    stats: &mut DtpgStats,
    on_detected: &mut DetectedCb,
) {
    let undetected: Vec<FaultId> = fault_mgr
        .representative_faults()
        .filter(|f| fault_mgr.status(f.id()) == FaultStatus::Undetected)
        .map(|f| f.id())
        .collect();
    let mut fsim = Fsim::new(network);
    for chunk in undetected.chunks(64) {
        let batch: Vec<TpgFault> = chunk.iter().map(|&fid| fault_mgr.fault(fid).clone()).collect();
        let detected = fsim.sppfp(tv, &batch);
        for (i, &fid) in chunk.iter().enumerate() {
            if detected[i] {
                fault_mgr.set_status(fid, FaultStatus::Detected);
                stats.nb_detected += 1;
                on_detected(fault_mgr.fault(fid), tv);
            }
        }
    }
}
