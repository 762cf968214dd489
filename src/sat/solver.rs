//! Thin wrapper over the incremental SAT backend (§6.2).
//!
//! The public surface here mirrors the abstract interface the spec
//! describes (`new_variable`, `add_clause`, `solve(assumptions)`, `model()`,
//! `get_stats()`) rather than exposing `rustsat` types directly, so the rest
//! of the crate never names a solver crate outside this file.

use rustsat::instances::BasicVarManager;
use rustsat::solvers::{Solve, SolveIncremental, SolverResult as RSolverResult};
use rustsat::types::{Assignment, Clause, Lit as RLit, TernaryVal, Var as RVar};
use rustsat_kissat::Kissat;

/// A literal in the CNF under construction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SatLit(RLit);

impl SatLit {
    /// The complementary literal
    pub fn negate(self) -> SatLit {
        SatLit(!self.0)
    }
}

/// Outcome of a `solve` call. `Unknown` covers solver timeout or resource
/// exhaustion (§7); it is not a third steady-state fault status, only a
/// transient driver signal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SatResult {
    True,
    False,
    Unknown,
}

/// A variable's value in a satisfying model
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModelVal {
    False,
    True,
    DontCare,
}

/// A satisfying assignment returned by the solver after `solve` returns `True`
pub struct Model(Assignment);

impl Model {
    /// The model's value for `lit`
    pub fn value(&self, lit: SatLit) -> ModelVal {
        match self.0.lit_value(lit.0) {
            TernaryVal::True => ModelVal::True,
            TernaryVal::False => ModelVal::False,
            TernaryVal::DontCare => ModelVal::DontCare,
        }
    }
}

/// Running totals exposed for diagnostics/logging, not correctness
#[derive(Clone, Copy, Debug, Default)]
pub struct SatStats {
    pub nb_vars: usize,
    pub nb_clauses: usize,
    pub nb_calls: usize,
}

/// Incremental CNF + solver handle. One instance backs one [`crate::sat::StructEngine`].
pub struct DruidSolver {
    backend: Kissat,
    var_mgr: BasicVarManager,
    stats: SatStats,
}

impl Default for DruidSolver {
    fn default() -> Self {
        DruidSolver {
            backend: Kissat::default(),
            var_mgr: BasicVarManager::default(),
            stats: SatStats::default(),
        }
    }
}

impl DruidSolver {
    /// A fresh solver with no variables or clauses
    pub fn new() -> Self {
        DruidSolver::default()
    }

    /// Allocate a fresh Boolean variable, returned as its positive literal
    pub fn new_var(&mut self) -> SatLit {
        let v: RVar = self.var_mgr.new_var();
        self.stats.nb_vars += 1;
        SatLit(RLit::positive(v))
    }

    /// Add one clause (a disjunction of literals)
    pub fn add_clause(&mut self, lits: &[SatLit]) {
        let clause: Clause = lits.iter().map(|l| l.0).collect();
        self.backend
            .add_clause(clause)
            .expect("the backend rejected a clause");
        self.stats.nb_clauses += 1;
    }

    /// Solve under the given assumption literals
    pub fn solve(&mut self, assumptions: &[SatLit]) -> SatResult {
        self.stats.nb_calls += 1;
        let assumps: Vec<RLit> = assumptions.iter().map(|l| l.0).collect();
        match self.backend.solve_assumps(assumps) {
            Ok(RSolverResult::Sat) => SatResult::True,
            Ok(RSolverResult::Unsat) => SatResult::False,
            Ok(RSolverResult::Interrupted) => SatResult::Unknown,
            Err(_) => SatResult::Unknown,
        }
    }

    /// Read back the model after a `True` result
    pub fn model(&mut self) -> Model {
        Model(
            self.backend
                .full_solution()
                .expect("model requested without a satisfying solve() result"),
        )
    }

    /// Solver call counters, for logging
    pub fn stats(&self) -> SatStats {
        self.stats
    }
}
