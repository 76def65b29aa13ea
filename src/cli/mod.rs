//! Command-line interface for anncmp.
//!
//! Available commands:
//!
//! - **compare**: per-record comparison report with an overall total
//! - **stats**: per-statement or per-group precision/recall table
//!
//! ## Usage
//!
//! ```text
//! # Per-record report
//! anncmp compare ref/ test/ --thesaurus thesaurus.json
//!
//! # With a full conclusions listing and group unions
//! anncmp compare ref/ test/ -t thesaurus.json --full -u unions.json
//!
//! # Per-group table as TSV for spreadsheet import
//! anncmp stats ref/ test/ -t thesaurus.json --by-group --format tsv
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::matching::unions::{UnionSet, UnionSpec};
use crate::thesaurus::Thesaurus;

pub mod compare;
pub mod input;
pub mod stats;

#[derive(Parser)]
#[command(name = "anncmp")]
#[command(version)]
#[command(about = "Compare diagnostic annotation sets against a reference")]
#[command(
    long_about = "anncmp compares annotation conclusions from one or more test sources against a reference source.\n\nEvery conclusion of every shared record is classified as a true positive, false positive, or false negative, and the marks are aggregated into precision/recall/F-score statistics per record, per source, per statement, or per group."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-record comparison report with an overall total
    Compare(compare::CompareArgs),

    /// Per-statement or per-group statistics table
    Stats(stats::StatsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the thesaurus and, when given, the union specification resolved
/// against it. Shared by both subcommands.
pub(crate) fn load_vocabulary(
    thesaurus_path: &Path,
    unions_path: Option<&Path>,
) -> anyhow::Result<(Thesaurus, Option<UnionSet>)> {
    let thesaurus = Thesaurus::load_from_file(thesaurus_path)?;
    let unions = match unions_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let spec: UnionSpec = serde_json::from_str(&content)?;
            Some(UnionSet::from_spec(&spec, &thesaurus)?)
        }
        None => None,
    };
    Ok((thesaurus, unions))
}
