//! The top-level DTPG scheduler: FFR/MFFC drivers over the CNF encoder,
//! extractor and justifier (§4.5, §4.8).

mod driver;
mod mgr;

pub use mgr::{DriverKind, DtpgMgr, DtpgOptions, DtpgStats};
