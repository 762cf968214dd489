//! The `.bench` reader feeding straight into fault enumeration and DTPG,
//! exercising the full read → build → generate path a CLI invocation runs.

use std::time::Duration;

use druid_atpg::dtpg::{DriverKind, DtpgMgr, DtpgOptions};
use druid_atpg::fsim::Fsim;
use druid_atpg::ids::FaultType;
use druid_atpg::io::bench::read_bench;
use druid_atpg::justify::JustifierKind;

const C17_LIKE: &str = "
INPUT(a)
INPUT(b)
INPUT(c)
INPUT(d)
INPUT(e)
n1 = NAND(a, b)
n2 = NAND(c, d)
n3 = NAND(b, e)
n4 = NAND(n2, n1)
n5 = NAND(n2, n3)
o1 = NAND(n1, n4)
o2 = NAND(n4, n5)
OUTPUT(o1)
OUTPUT(o2)
";

#[test]
fn test_c17_like_reads_and_reaches_full_coverage() {
    let net = read_bench(C17_LIKE.as_bytes()).unwrap();
    assert_eq!(net.nb_inputs(), 5);
    assert_eq!(net.nb_outputs(), 2);
    assert!(net.is_comb());

    let mut mgr = DtpgMgr::new(&net, FaultType::StuckAt);
    let options = DtpgOptions {
        fault_type: FaultType::StuckAt,
        driver_kind: DriverKind::Ffr,
        justifier: JustifierKind::Just2,
        timeout: Some(Duration::from_secs(5)),
        drop_detected_by_sim: true,
        parallel: false,
    };
    let mut vectors = Vec::new();
    mgr.run(
        &options,
        &mut |fault, tv| vectors.push((fault.clone(), tv.clone())),
        &mut |_| {},
        &mut |_| {},
    );

    assert_eq!(mgr.fault_mgr().nb_undetected(), 0);
    assert_eq!(mgr.stats().nb_aborted, 0);

    let mut fsim = Fsim::new(&net);
    for (fault, tv) in &vectors {
        assert!(fsim.spsfp(tv, fault));
    }
}

#[test]
fn test_sequential_bench_with_dff() {
    let text = "\
INPUT(a)
q = DFF(a)
n1 = NOT(q)
OUTPUT(n1)
";
    let net = read_bench(text.as_bytes()).unwrap();
    assert_eq!(net.nb_inputs(), 1);
    assert_eq!(net.nb_dffs(), 1);
    assert!(!net.is_comb());
}

#[test]
fn test_malformed_bench_rejected() {
    let text = "INPUT(a)\nx = AND(a, missing)\nOUTPUT(x)\n";
    assert!(read_bench(text.as_bytes()).is_err());
}
