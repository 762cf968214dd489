//! Command line interface.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use druid_atpg::dtpg::{DriverKind, DtpgMgr, DtpgOptions};
use druid_atpg::fault::FaultStatus;
use druid_atpg::ids::FaultType;
use druid_atpg::io::read_network_file;
use druid_atpg::justify::JustifierKind;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a netlist
    ///
    /// Prints the number of inputs, outputs, DFFs, gates, FFRs and MFFCs.
    #[clap()]
    Show(ShowArgs),

    /// Generate test patterns for every fault of a netlist
    ///
    /// Runs the fault simulator opportunistically before falling back to
    /// SAT-based DTPG for faults it cannot resolve, then writes every
    /// generated pattern plus a final coverage summary.
    #[clap()]
    Atpg(AtpgArgs),
}

/// Command arguments for netlist statistics
#[derive(Args)]
pub struct ShowArgs {
    /// Netlist to inspect (.bench)
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) -> druid_atpg::error::Result<()> {
        let net = read_network_file(&self.file)?;
        println!("Inputs:  {}", net.nb_inputs());
        println!("Outputs: {}", net.nb_outputs());
        println!("DFFs:    {}", net.nb_dffs());
        println!("Nodes:   {}", net.nb_nodes());
        println!("FFRs:    {}", net.ffrs().len());
        println!("MFFCs:   {}", net.mffcs().len());
        println!("Levels:  {}", net.max_level());
        Ok(())
    }
}

/// Fault model selection mirrored from [`FaultType`]
#[derive(Clone, Copy, ValueEnum)]
pub enum FaultModelArg {
    /// Single stuck-at fault model
    StuckAt,
    /// Transition-delay fault model
    TransitionDelay,
}

impl From<FaultModelArg> for FaultType {
    fn from(a: FaultModelArg) -> Self {
        match a {
            FaultModelArg::StuckAt => FaultType::StuckAt,
            FaultModelArg::TransitionDelay => FaultType::TransitionDelay,
        }
    }
}

/// Driver granularity selection mirrored from [`DriverKind`]
#[derive(Clone, Copy, ValueEnum)]
pub enum DriverKindArg {
    /// One CNF per FFR (default)
    Ffr,
    /// One CNF per MFFC
    Mffc,
}

impl From<DriverKindArg> for DriverKind {
    fn from(a: DriverKindArg) -> Self {
        match a {
            DriverKindArg::Ffr => DriverKind::Ffr,
            DriverKindArg::Mffc => DriverKind::Mffc,
        }
    }
}

/// Justifier selection mirrored from [`JustifierKind`]
#[derive(Clone, Copy, ValueEnum)]
pub enum JustifierArg {
    /// First qualifying fanin
    Just1,
    /// Lowest estimated-cost qualifying fanin (default)
    Just2,
    /// Full transitive fanin, no selection
    Naive,
}

impl From<JustifierArg> for JustifierKind {
    fn from(a: JustifierArg) -> Self {
        match a {
            JustifierArg::Just1 => JustifierKind::Just1,
            JustifierArg::Just2 => JustifierKind::Just2,
            JustifierArg::Naive => JustifierKind::Naive,
        }
    }
}

/// Command arguments for test pattern generation
#[derive(Args)]
pub struct AtpgArgs {
    /// Netlist to generate patterns for (.bench)
    network: PathBuf,

    /// Output file for generated test patterns, one `to_bin()` line per vector
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Fault model to target
    #[arg(long, value_enum, default_value = "stuck-at")]
    fault_model: FaultModelArg,

    /// CNF driver granularity
    #[arg(long, value_enum, default_value = "ffr")]
    driver: DriverKindArg,

    /// Justification algorithm
    #[arg(long, value_enum, default_value = "just2")]
    justifier: JustifierArg,

    /// Per-fault SAT solver timeout, in milliseconds (no timeout if unset)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Disable opportunistic fault-simulation-based dropping of freshly detected faults
    #[arg(long)]
    no_drop_by_sim: bool,
}

impl AtpgArgs {
    pub fn run(&self) -> druid_atpg::error::Result<()> {
        let net = read_network_file(&self.network)?;
        let fault_type: FaultType = self.fault_model.into();
        let mut mgr = DtpgMgr::new(&net, fault_type);

        let options = DtpgOptions {
            fault_type,
            driver_kind: self.driver.into(),
            justifier: self.justifier.into(),
            timeout: self.timeout_ms.map(Duration::from_millis),
            drop_detected_by_sim: !self.no_drop_by_sim,
            parallel: false,
        };

        let mut nb_untestable = 0usize;
        let mut nb_aborted = 0usize;
        mgr.run(
            &options,
            &mut |_fault, _tv| {},
            &mut |_fault| nb_untestable += 1,
            &mut |_fault| nb_aborted += 1,
        );

        let mut out = File::create(&self.output).map_err(|e| {
            druid_atpg::error::DruidError::Parse(format!("could not create {:?}: {e}", self.output))
        })?;
        for tv in mgr.test_vectors() {
            writeln!(out, "{}", tv.bits().to_bin()).map_err(|e| {
                druid_atpg::error::DruidError::Parse(format!("could not write pattern: {e}"))
            })?;
        }

        let total = mgr.fault_mgr().representative_faults().count();
        let nb_detected = mgr
            .fault_mgr()
            .representative_faults()
            .filter(|f| mgr.fault_mgr().status(f.id()) == FaultStatus::Detected)
            .count();
        let coverage = if total == 0 {
            100.0
        } else {
            100.0 * nb_detected as f64 / total as f64
        };
        println!("Faults:     {total}");
        println!("Detected:   {nb_detected}");
        println!("Untestable: {nb_untestable}");
        println!("Aborted:    {nb_aborted}");
        println!("Coverage:   {coverage:.2}%");
        println!("Vectors:    {}", mgr.test_vectors().len());
        Ok(())
    }
}
