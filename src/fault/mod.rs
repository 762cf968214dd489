//! The fault model: fault enumeration, equivalence collapse, and status
//! tracking, kept separate from the circuit model so `TpgNetwork` stays a
//! pure, fault-agnostic structure (§4.8).

mod fault;
mod mgr;

pub use fault::{FaultSite, FaultStatus, TpgFault};
pub use mgr::FaultMgr;
