//! Error types surfaced to callers of the public API.
//!
//! Per the crate's error-handling design, only *external misuse* (malformed
//! netlists, calling a transition-delay operation on a stuck-at network, a
//! bad bin/hex string) is surfaced as a [`DruidError`]. Internal invariant
//! breaches (an out-of-range node id, an event enqueued behind the current
//! level) stay as `assert!`/`panic!`, and SAT timeouts/unsat outcomes are
//! absorbed locally by the DTPG driver into [`crate::fault::FaultStatus`]
//! rather than returned here.

use thiserror::Error;

/// Errors returned by the public API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DruidError {
    /// The netlist is malformed: a cycle, a dangling reference or an unknown gate type
    #[error("malformed network: {0}")]
    MalformedNetwork(String),

    /// An operation valid only in one fault model was requested on the other
    #[error("fault model mismatch: {0}")]
    FaultModelMismatch(String),

    /// A bin/hex vector string could not be parsed
    #[error("could not parse vector: {0}")]
    Parse(String),
}

/// Convenience alias for fallible crate operations
pub type Result<T> = std::result::Result<T, DruidError>;
