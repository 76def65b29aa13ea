use std::collections::HashMap;

use serde::Serialize;

use crate::core::record::{AnnotationRecord, RejectedRecord};
use crate::core::types::SourceKey;

/// Annotation codes of one record within one source
#[derive(Debug, Clone, Serialize)]
pub struct RecordEntry {
    pub id: String,
    pub codes: Vec<String>,
}

/// All records of one source (database or annotator), in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry {
    pub id: String,
    records: Vec<RecordEntry>,
    #[serde(skip)]
    record_index: HashMap<String, usize>,
}

impl SourceEntry {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            records: Vec::new(),
            record_index: HashMap::new(),
        }
    }

    fn insert(&mut self, record_id: &str, codes: Vec<String>) {
        match self.record_index.get(record_id) {
            // Later record for the same id replaces the earlier code list
            Some(&idx) => self.records[idx].codes = codes,
            None => {
                self.record_index
                    .insert(record_id.to_string(), self.records.len());
                self.records.push(RecordEntry {
                    id: record_id.to_string(),
                    codes,
                });
            }
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordEntry> {
        self.records.iter()
    }

    #[must_use]
    pub fn get(&self, record_id: &str) -> Option<&RecordEntry> {
        self.record_index.get(record_id).map(|&i| &self.records[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Nested `source -> record -> codes` table built from raw annotation records.
///
/// Iteration order at both levels is insertion order of first occurrence, so
/// reports are stable across runs for the same input sequence. The table is a
/// pure transform of its input: no I/O, no global state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetTable {
    sources: Vec<SourceEntry>,
    #[serde(skip)]
    source_index: HashMap<String, usize>,
}

impl DatasetTable {
    /// Build a table from raw records, keeping only records that belong to
    /// the active thesaurus. Rejected records are returned alongside, with
    /// the reason each one was excluded.
    #[must_use]
    pub fn build(
        records: Vec<AnnotationRecord>,
        thesaurus_label: &str,
        key: SourceKey,
    ) -> (Self, Vec<RejectedRecord>) {
        let mut table = Self::default();
        let mut rejected = Vec::new();

        for record in records {
            if let Some(reason) = record.reject_reason(thesaurus_label, key) {
                rejected.push(RejectedRecord { record, reason });
                continue;
            }
            // Validated above: identity fields and conclusions are present
            let source_id = match key {
                SourceKey::Database => record.database.as_deref(),
                SourceKey::Annotator => record.annotator.as_deref(),
            };
            let (Some(source_id), Some(record_id), Some(codes)) =
                (source_id, record.record.as_deref(), record.conclusions)
            else {
                continue;
            };
            table.insert(source_id, record_id, codes);
        }

        (table, rejected)
    }

    fn insert(&mut self, source_id: &str, record_id: &str, codes: Vec<String>) {
        let idx = match self.source_index.get(source_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.sources.len();
                self.source_index.insert(source_id.to_string(), idx);
                self.sources.push(SourceEntry::new(source_id));
                idx
            }
        };
        self.sources[idx].insert(record_id, codes);
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceEntry> {
        self.sources.iter()
    }

    #[must_use]
    pub fn source(&self, source_id: &str) -> Option<&SourceEntry> {
        self.source_index.get(source_id).map(|&i| &self.sources[i])
    }

    /// Total number of records across all sources
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(SourceEntry::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.iter().all(SourceEntry::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(db: &str, rec: &str, codes: &[&str]) -> AnnotationRecord {
        AnnotationRecord {
            database: Some(db.into()),
            record: Some(rec.into()),
            annotator: Some("alice".into()),
            conclusion_thesaurus: Some("MCS".into()),
            conclusions: Some(codes.iter().map(ToString::to_string).collect()),
            doc_type: None,
        }
    }

    #[test]
    fn test_build_groups_by_database() {
        let records = vec![
            record("db1", "r1", &["1.1"]),
            record("db1", "r2", &["2.1"]),
            record("db2", "r1", &["3.1"]),
        ];
        let (table, rejected) = DatasetTable::build(records, "MCS", SourceKey::Database);

        assert!(rejected.is_empty());
        assert_eq!(table.record_count(), 3);
        let db1 = table.source("db1").unwrap();
        assert_eq!(db1.len(), 2);
        assert_eq!(db1.get("r1").unwrap().codes, vec!["1.1"]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let records = vec![
            record("z", "r9", &["1.1"]),
            record("a", "r1", &["1.1"]),
            record("z", "r0", &["1.1"]),
        ];
        let (table, _) = DatasetTable::build(records, "MCS", SourceKey::Database);

        let sources: Vec<&str> = table.sources().map(|s| s.id.as_str()).collect();
        assert_eq!(sources, vec!["z", "a"]);
        let z_records: Vec<&str> = table
            .source("z")
            .unwrap()
            .records()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(z_records, vec!["r9", "r0"]);
    }

    #[test]
    fn test_duplicate_record_last_wins() {
        let records = vec![record("db1", "r1", &["1.1"]), record("db1", "r1", &["2.1"])];
        let (table, _) = DatasetTable::build(records, "MCS", SourceKey::Database);

        assert_eq!(table.record_count(), 1);
        assert_eq!(table.source("db1").unwrap().get("r1").unwrap().codes, vec!["2.1"]);
    }

    #[test]
    fn test_malformed_records_rejected_not_fatal() {
        let mut bad = record("db1", "r1", &["1.1"]);
        bad.conclusions = None;
        let records = vec![bad, record("db1", "r2", &["2.1"])];
        let (table, rejected) = DatasetTable::build(records, "MCS", SourceKey::Database);

        assert_eq!(table.record_count(), 1);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_annotator_key_splits_sources() {
        let mut r1 = record("db1", "r1", &["1.1"]);
        r1.annotator = Some("alice".into());
        let mut r2 = record("db1", "r1", &["2.1"]);
        r2.annotator = Some("bob".into());
        let (table, _) = DatasetTable::build(vec![r1, r2], "MCS", SourceKey::Annotator);

        assert!(table.source("alice").is_some());
        assert!(table.source("bob").is_some());
        assert!(table.source("db1").is_none());
    }

    #[test]
    fn test_empty_table() {
        let (table, _) = DatasetTable::build(Vec::new(), "MCS", SourceKey::Database);
        assert!(table.is_empty());
        assert_eq!(table.record_count(), 0);
    }
}
