//! Reading gate-level netlists into a [`TpgNetwork`] (§6.1).

mod bench;

use std::fs::File;
use std::path::Path;

pub use bench::read_bench;

use crate::circuit::TpgNetwork;
use crate::error::{DruidError, Result};

/// Parse a netlist from a file, dispatching on its extension.
///
/// Only `.bench` (ISCAS-89) is supported; see [`bench::read_bench`].
pub fn read_network_file(path: &Path) -> Result<TpgNetwork> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("bench") => {
            let f = File::open(path).map_err(|e| DruidError::Parse(e.to_string()))?;
            read_bench(f)
        }
        other => Err(DruidError::Parse(format!(
            "unsupported netlist extension: {other:?}"
        ))),
    }
}
