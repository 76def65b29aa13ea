use std::collections::HashMap;

use serde::Serialize;

use crate::core::types::MatchMark;
use crate::matching::classifier::Classification;
use crate::matching::stats::MatchStats;
use crate::matching::unions::UnionSet;
use crate::thesaurus::Thesaurus;

/// Stats of one compared record
#[derive(Debug, Clone, Serialize)]
pub struct RecordStats {
    pub source: String,
    pub record: String,
    pub stats: MatchStats,
}

/// Stats of one named row (a statement code or a group/union)
#[derive(Debug, Clone, Serialize)]
pub struct NamedStats {
    pub name: String,
    pub stats: MatchStats,
}

/// Per-record stats in classification order
#[must_use]
pub fn per_record_stats(classification: &Classification, knorm: Option<u32>) -> Vec<RecordStats> {
    let mut rows = Vec::new();
    for source in &classification.sources {
        for record in &source.records {
            let stats =
                MatchStats::from_marks(record.marks.iter().map(|m| m.mark), knorm);
            rows.push(RecordStats {
                source: source.source.clone(),
                record: record.record.clone(),
                stats,
            });
        }
    }
    rows
}

/// Per-source stats in classification order
#[must_use]
pub fn per_source_stats(classification: &Classification, knorm: Option<u32>) -> Vec<NamedStats> {
    classification
        .sources
        .iter()
        .map(|source| {
            let marks = source
                .records
                .iter()
                .flat_map(|r| r.marks.iter())
                .map(|m| m.mark);
            NamedStats {
                name: source.source.clone(),
                stats: MatchStats::from_marks(marks, knorm),
            }
        })
        .collect()
}

/// Grand total over every mark of the run
#[must_use]
pub fn total_stats(classification: &Classification, knorm: Option<u32>) -> MatchStats {
    MatchStats::from_marks(classification.all_marks(), knorm)
}

/// Per-statement stats in thesaurus display order, labeled with display
/// names. Codes that received no marks are omitted.
#[must_use]
pub fn per_code_stats(
    classification: &Classification,
    thesaurus: &Thesaurus,
    knorm: Option<u32>,
) -> Vec<NamedStats> {
    let by_code = classification.marks_by_code();
    thesaurus
        .items()
        .filter_map(|item| {
            let marks = by_code.get(item.code.as_str())?;
            Some(NamedStats {
                name: item.name.clone(),
                stats: MatchStats::from_marks(marks.iter().copied(), knorm),
            })
        })
        .collect()
}

/// Per-group stats in thesaurus group order. A group covered by a union is
/// reported under the union's name; groups merged into the same union share
/// one row. Groups with no marks are omitted.
#[must_use]
pub fn per_group_stats(
    classification: &Classification,
    thesaurus: &Thesaurus,
    unions: Option<&UnionSet>,
    knorm: Option<u32>,
) -> Vec<NamedStats> {
    // Row name per group, first-occurrence order
    let mut row_names: Vec<String> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut code_row: HashMap<&str, usize> = HashMap::new();

    for group in &thesaurus.groups {
        let name = unions
            .and_then(|u| u.union_of_group(&group.id))
            .map_or(group.name.as_str(), |union| union.name.as_str());
        let idx = match row_index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = row_names.len();
                row_index.insert(name.to_string(), idx);
                row_names.push(name.to_string());
                idx
            }
        };
        for statement in &group.statements {
            code_row.insert(statement.id.as_str(), idx);
        }
    }

    let mut row_marks: Vec<Vec<MatchMark>> = vec![Vec::new(); row_names.len()];
    for (code, marks) in classification.marks_by_code() {
        if let Some(&idx) = code_row.get(code) {
            row_marks[idx].extend(marks);
        }
    }

    row_names
        .into_iter()
        .zip(row_marks)
        .filter(|(_, marks)| !marks.is_empty())
        .map(|(name, marks)| NamedStats {
            name,
            stats: MatchStats::from_marks(marks, knorm),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::AnnotationRecord;
    use crate::core::table::DatasetTable;
    use crate::core::types::SourceKey;
    use crate::matching::classifier::Classifier;
    use crate::matching::unions::UnionSpec;

    fn thesaurus() -> Thesaurus {
        Thesaurus::from_json(
            r#"{
            "thesaurus": "MCS",
            "groups": [
                {"id": "g1", "name": "Rhythm", "reports": [
                    {"id": "1.1", "name": "Sinus rhythm"}]},
                {"id": "g2", "name": "Conduction", "reports": [
                    {"id": "2.1", "name": "AV block"}]},
                {"id": "g3", "name": "Ischemia", "reports": [
                    {"id": "3.1", "name": "ST depression"}]}
            ]
        }"#,
        )
        .unwrap()
    }

    fn table(entries: &[(&str, &str, &[&str])]) -> DatasetTable {
        let records = entries
            .iter()
            .map(|(db, rec, codes)| AnnotationRecord {
                database: Some((*db).into()),
                record: Some((*rec).into()),
                annotator: None,
                conclusion_thesaurus: Some("MCS".into()),
                conclusions: Some(codes.iter().map(ToString::to_string).collect()),
                doc_type: None,
            })
            .collect();
        DatasetTable::build(records, "MCS", SourceKey::Database).0
    }

    fn classification() -> Classification {
        let thesaurus = thesaurus();
        let ref_table = table(&[("db", "r1", &["1.1", "2.1"]), ("db", "r2", &["1.1"])]);
        let test_table = table(&[("db", "r1", &["2.1", "3.1"]), ("db", "r2", &["1.1"])]);
        Classifier::new(&thesaurus)
            .classify(&ref_table, &test_table)
            .unwrap()
    }

    #[test]
    fn test_per_record_rows_in_order() {
        let rows = per_record_stats(&classification(), Some(5));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record, "r1");
        assert_eq!((rows[0].stats.tp, rows[0].stats.fp, rows[0].stats.fn_), (1, 1, 1));
        assert_eq!(rows[1].stats.tp, 1);
        assert_eq!(rows[1].stats.normalized, Some(5));
    }

    #[test]
    fn test_total_is_concatenation_of_records() {
        let classification = classification();
        let total = total_stats(&classification, None);
        let per_record = per_record_stats(&classification, None);
        let tp_sum: usize = per_record.iter().map(|r| r.stats.tp).sum();
        assert_eq!(total.tp, tp_sum);
        assert_eq!(total.mark_count(), 4);
    }

    #[test]
    fn test_per_source_stats() {
        let rows = per_source_stats(&classification(), None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "db");
        assert_eq!(rows[0].stats.mark_count(), 4);
    }

    #[test]
    fn test_per_code_rows_use_display_order_and_names() {
        let rows = per_code_stats(&classification(), &thesaurus(), None);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sinus rhythm", "AV block", "ST depression"]);
        // 1.1: TP in r2, FN in r1
        assert_eq!((rows[0].stats.tp, rows[0].stats.fn_), (1, 1));
    }

    #[test]
    fn test_groups_merged_under_union_name() {
        let thesaurus = thesaurus();
        let mut spec = UnionSpec::default();
        spec.groups
            .insert("Rhythm+Ischemia".into(), vec!["g1".into(), "g3".into()]);
        let unions = UnionSet::from_spec(&spec, &thesaurus).unwrap();

        let rows = per_group_stats(&classification(), &thesaurus, Some(&unions), None);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Rhythm+Ischemia", "Conduction"]);
        // Merged row carries marks of both g1 and g3 codes
        assert_eq!(rows[0].stats.mark_count(), 3);
    }

    #[test]
    fn test_groups_without_marks_omitted() {
        let thesaurus = thesaurus();
        let ref_table = table(&[("db", "r1", &["1.1"])]);
        let test_table = table(&[("db", "r1", &["1.1"])]);
        let classification = Classifier::new(&thesaurus)
            .classify(&ref_table, &test_table)
            .unwrap();

        let rows = per_group_stats(&classification, &thesaurus, None, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Rhythm");
    }
}
