use std::path::PathBuf;

use clap::Args;
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use crate::core::table::DatasetTable;
use crate::core::types::SourceKey;
use crate::matching::aggregate::{per_record_stats, total_stats};
use crate::matching::classifier::Classifier;
use crate::matching::requirements::{check_required_groups, RequiredGroups};
use crate::report;
use crate::report::CompareReport;

#[derive(Args)]
pub struct CompareArgs {
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

    /// Key test sources by annotator instead of database
    #[arg(long)]
    pub by_annotator: bool,

    /// Include the full conclusions listing grouped by mark
    #[arg(long)]
    pub full: bool,

    /// Normalization factor for the normalized F-score
    #[arg(long, default_value = "5")]
    pub knorm: u32,

    /// Mandatory group set: comma-separated thesaurus group ids.
    /// May be given several times; a record must satisfy every set.
    #[arg(long = "require")]
    pub required: Vec<String>,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (thesaurus, unions) = crate::cli::load_vocabulary(&args.thesaurus, args.unions.as_deref())?;

    let ref_records = crate::cli::input::collect_records(&[&args.ref_path]);
    let test_records = crate::cli::input::collect_records(&args.test_paths);
    let key = if args.by_annotator {
        SourceKey::Annotator
    } else {
        SourceKey::Database
    };

    let (test_table, test_rejected) = DatasetTable::build(test_records, &thesaurus.label, key);
    let ref_records = if args.by_annotator {
        // Replicate the reference under every test annotator so each one is
        // compared against the same reference records
        let annotators: Vec<String> = test_table.sources().map(|s| s.id.clone()).collect();
        ref_records
            .iter()
            .flat_map(|record| {
                annotators.iter().map(|annotator| {
                    let mut record = record.clone();
                    record.annotator = Some(annotator.clone());
                    record
                })
            })
            .collect()
    } else {
        ref_records
    };
    let (ref_table, ref_rejected) = DatasetTable::build(ref_records, &thesaurus.label, key);

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
    let requirements = if args.required.is_empty() {
        Vec::new()
    } else {
        // One --require flag per mandatory set
        let required: Vec<RequiredGroups> = args
            .required
            .iter()
            .map(|set| RequiredGroups::new(set.split(',').map(str::trim)))
            .collect();
        check_required_groups(&test_table, &required, &thesaurus)
    };
    let conclusions = if args.full {
        report::mark_listings(&classification, &thesaurus)
    } else {
        Vec::new()
    };

    let report = CompareReport {
        records: per_record_stats(&classification, knorm),
        total: total_stats(&classification, knorm),
        excess: classification.excess.clone(),
        requirements,
        conclusions,
    };

    match format {
        OutputFormat::Text => print!("{}", report::render_compare_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print!("{}", report::render_compare_tsv(&report)),
    }

    Ok(())
}
