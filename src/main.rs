//! # MindSync CLI
//!
//! Command-line front end for the synthetic monitoring pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Live dashboard for 30 ticks, then write a report
//! mindsync monitor --ticks 30 --report out/
//!
//! # Simulate 100 ticks instantly and write the PDF plus a bundle
//! mindsync report --ticks 100 --seed 7 --bundle out/
//!
//! # Score one reading
//! mindsync score 82 14.5 19
//!
//! # Write the three SVG charts
//! mindsync charts --ticks 60 charts/
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
