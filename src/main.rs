//! Binary for druid-atpg

#![warn(missing_docs)]

mod cmd;

use clap::Parser;

#[doc(hidden)]
fn main() {
    env_logger::init();
    let cli = cmd::Cli::parse();

    let result = match cli.command {
        cmd::Commands::Show(a) => a.run(),
        cmd::Commands::Atpg(a) => a.run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
