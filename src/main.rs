//! # nutau
//!
//! Command-line front end of the tau-appearance analysis tooling.
//!
//! ## Usage
//!
//! ```bash
//! # Configuration records for one combination
//! nutau generate --channel TAU --reco NNFit_full --order IO --systematics systematics
//!
//! # Every combination of a cut policy
//! nutau generate --all --cut hard_cut
//!
//! # Label events and summarise reconstruction efficiency
//! nutau classify events.parquet labelled.parquet
//! nutau count-flags events.parquet --csv flags.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
