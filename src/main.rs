//! # xasmap
//!
//! A command-line tool for checking XAS metadata mappings.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a glossary, mapping table, example instance and XDI file together
//! xasmap validate glossary.rdf mapping.csv example.jsonld cu_metal_rt.xdi
//!
//! # Write a JSON report
//! xasmap validate glossary.rdf mapping.csv example.jsonld cu_metal_rt.xdi \
//!     --format json -o report.json
//!
//! # Summarize one input
//! xasmap info glossary.rdf
//!
//! # Rewrite a mapping table with canonical headers
//! xasmap normalize mapping.tsv -o mapping.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
