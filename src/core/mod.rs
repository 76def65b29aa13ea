//! Core data types for annotation comparison.
//!
//! - [`AnnotationRecord`](record::AnnotationRecord): one raw record as read
//!   from an input file, plus its rejection rules
//! - [`DatasetTable`](table::DatasetTable): insertion-ordered
//!   `source -> record -> codes` table
//! - [`MatchMark`](types::MatchMark), [`SourceKey`](types::SourceKey):
//!   classification and table-keying enums

pub mod record;
pub mod table;
pub mod types;
