//! The circuit model: a levelized combinational DAG partitioned into
//! Fanout-Free Regions (FFRs) and Maximal Fanout-Free Cones (MFFCs).
//!
//! This is the one-time, build-then-freeze data structure every other
//! subsystem reads from: the fault simulator walks it to build `SimNode`s,
//! the CNF encoder walks it to emit Tseitin clauses, and the DTPG driver
//! iterates its FFRs/MFFCs to schedule work.

mod ffr;
mod mffc;
mod network;
mod node;

pub use ffr::TpgFFR;
pub use mffc::TpgMFFC;
pub use network::{Dff, NetworkBuilder, TpgNetwork};
pub use node::{NodeKind, PrimType, TpgNode};
