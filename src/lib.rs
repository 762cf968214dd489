//! `druid-atpg`: a gate-level Automatic Test Pattern Generation toolchain.
//!
//! Given a levelized gate-level netlist, this crate enumerates single
//! stuck-at or transition-delay faults, drives a bit-parallel fault
//! simulator (PFS) for fast coverage estimation, and falls back to a
//! SAT-based deterministic test generator (DTPG) — with sufficient-condition
//! extraction and backward justification — for the faults PFS alone cannot
//! resolve.
//!
//! Structured as a thin `cmd`/`main` CLI layered over a library surface,
//! one module per subsystem, doc-comment-driven module docs.

pub mod assign;
pub mod bitvec;
pub mod circuit;
pub mod dtpg;
pub mod error;
pub mod extract;
pub mod fault;
pub mod fsim;
pub mod ids;
pub mod io;
pub mod justify;
pub mod sat;

pub use assign::{AssignList, NodeVal};
pub use bitvec::{BitVector, DffVector, InputVector, TestVector, Val3};
pub use circuit::{NetworkBuilder, PrimType, TpgFFR, TpgMFFC, TpgNetwork, TpgNode};
pub use dtpg::{DriverKind, DtpgMgr, DtpgOptions, DtpgStats};
pub use error::{DruidError, Result};
pub use fault::{FaultMgr, FaultSite, FaultStatus, TpgFault};
pub use fsim::Fsim;
pub use ids::{FaultId, FaultType, FfrId, MffcId, NodeId, TimeFrame};
pub use justify::JustifierKind;
