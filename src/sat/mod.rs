//! The Boolean-difference CNF encoder and its SAT backend (§4.4, §6.2).

mod encoder;
mod solver;

pub use encoder::StructEngine;
pub use solver::{DruidSolver, Model, ModelVal, SatLit, SatResult, SatStats};
