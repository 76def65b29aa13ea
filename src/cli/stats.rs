use std::path::PathBuf;

use clap::Args;
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use crate::core::table::DatasetTable;
use crate::core::types::SourceKey;
use crate::matching::aggregate::{per_code_stats, per_group_stats, per_source_stats};
use crate::matching::classifier::Classifier;
use crate::report;

#[derive(Args)]
pub struct StatsArgs {
    /// File or folder with reference annotations
    #[arg(required = true)]
    pub ref_path: PathBuf,

    /// Files or folders with test annotations
    #[arg(required = true)]
    pub test_paths: Vec<PathBuf>,

    /// Path to the thesaurus file
    #[arg(short, long)]
    pub thesaurus: PathBuf,

    /// Path to a group-union specification
    #[arg(short, long)]
    pub unions: Option<PathBuf>,

    /// Drop codes outside every union before classification
    #[arg(long, requires = "unions")]
    pub strict: bool,

    /// Aggregate per thesaurus group instead of per statement
    #[arg(long)]
    pub by_group: bool,

    /// Aggregate per source instead of per statement
    #[arg(long, conflicts_with = "by_group")]
    pub by_source: bool,

    /// Normalization factor for the normalized F-score
    #[arg(long, default_value = "5")]
    pub knorm: u32,
}

pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (thesaurus, unions) = crate::cli::load_vocabulary(&args.thesaurus, args.unions.as_deref())?;

    let ref_records = crate::cli::input::collect_records(&[&args.ref_path]);
    let test_records = crate::cli::input::collect_records(&args.test_paths);

    let (ref_table, ref_rejected) =
        DatasetTable::build(ref_records, &thesaurus.label, SourceKey::Database);
    let (test_table, test_rejected) =
        DatasetTable::build(test_records, &thesaurus.label, SourceKey::Database);

    for rejected in ref_rejected.iter().chain(test_rejected.iter()) {
        warn!(
            "Rejected record {:?}/{:?}: {}",
            rejected.record.database, rejected.record.record, rejected.reason
        );
    }
    if verbose {
        debug!(
            "Reference: {} records, test: {} records",
            ref_table.record_count(),
            test_table.record_count()
        );
    }

    let mut classifier = Classifier::new(&thesaurus).strict(args.strict);
    if let Some(unions) = &unions {
        classifier = classifier.with_unions(unions);
    }
    let classification = classifier.classify(&ref_table, &test_table)?;

    let knorm = Some(args.knorm);
    let rows = if args.by_group {
        per_group_stats(&classification, &thesaurus, unions.as_ref(), knorm)
    } else if args.by_source {
        per_source_stats(&classification, knorm)
    } else {
        per_code_stats(&classification, &thesaurus, knorm)
    };

    if !classification.excess.is_empty() {
        warn!("Excess conclusions: {}", classification.excess.join(", "));
    }

    match format {
        OutputFormat::Text => print!("{}", report::render_named_text(&rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Tsv => print!("{}", report::render_named_tsv(&rows)),
    }

    Ok(())
}
