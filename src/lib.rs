//! # anncmp
//!
//! A library for comparing sets of diagnostic annotation codes against a
//! reference and computing precision/recall statistics.
//!
//! Annotation tools for the same records often disagree: a test annotator
//! may miss a conclusion the reference carries, add one it does not, or pick
//! a neighbouring statement from the same semantic group. `anncmp` classifies
//! every conclusion of every shared record as a true positive, false
//! positive, or false negative, and aggregates the marks into
//! precision/recall/F-score statistics at any granularity.
//!
//! ## Features
//!
//! - **Per-record classification**: one mark per code per compared record
//! - **Group unions**: configurable equivalence classes that count
//!   near-misses within a union as matches
//! - **Strict mode**: restrict the comparison to union-covered codes
//! - **Flexible aggregation**: per record, per source, per statement, per
//!   group/union, or grand total from the same mark multiset
//! - **Best-effort input handling**: malformed records and unknown codes are
//!   excluded and reported, never fatal
//!
//! ## Example
//!
//! ```rust
//! use anncmp::{Classifier, DatasetTable, MatchStats, SourceKey, Thesaurus};
//! use anncmp::core::record::AnnotationRecord;
//!
//! let thesaurus = Thesaurus::from_json(r#"{
//!     "thesaurus": "MCS",
//!     "groups": [{"id": "g1", "name": "Rhythm", "reports": [
//!         {"id": "1.1", "name": "Sinus rhythm"}]}]
//! }"#).unwrap();
//!
//! let record = |codes: &[&str]| AnnotationRecord {
//!     database: Some("db".into()),
//!     record: Some("r1".into()),
//!     conclusion_thesaurus: Some("MCS".into()),
//!     conclusions: Some(codes.iter().map(ToString::to_string).collect()),
//!     ..Default::default()
//! };
//! let (ref_table, _) = DatasetTable::build(vec![record(&["1.1"])], "MCS", SourceKey::Database);
//! let (test_table, _) = DatasetTable::build(vec![record(&["1.1"])], "MCS", SourceKey::Database);
//!
//! let classification = Classifier::new(&thesaurus)
//!     .classify(&ref_table, &test_table)
//!     .unwrap();
//! let stats = MatchStats::from_marks(classification.all_marks(), Some(5));
//! assert_eq!(stats.tp, 1);
//! ```
//!
//! ## Modules
//!
//! - [`thesaurus`]: reference vocabulary loading and lookup
//! - [`core`]: annotation records, dataset tables, mark types
//! - [`matching`]: classifier, group unions, statistics aggregation
//! - [`report`]: arranging computed statistics into output shapes
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod report;
pub mod thesaurus;

// Re-export commonly used types for convenience
pub use core::table::DatasetTable;
pub use core::types::{MatchMark, SourceKey};
pub use matching::classifier::{Classification, Classifier, CompareError};
pub use matching::requirements::check_required_groups;
pub use matching::stats::MatchStats;
pub use matching::unions::{UnionSet, UnionSpec};
pub use thesaurus::Thesaurus;
