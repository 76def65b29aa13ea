use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::core::table::DatasetTable;
use crate::core::types::MatchMark;
use crate::matching::unions::UnionSet;
use crate::thesaurus::Thesaurus;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("No usable input: {0} table is empty after filtering")]
    NoUsableInput(&'static str),
}

/// One classified code within a compared record
#[derive(Debug, Clone, Serialize)]
pub struct CodeMark {
    pub code: String,
    pub mark: MatchMark,
}

/// Marks of one compared record
#[derive(Debug, Clone, Serialize)]
pub struct RecordMarks {
    pub record: String,
    pub marks: Vec<CodeMark>,
}

/// Marks of all compared records within one source
#[derive(Debug, Clone, Serialize)]
pub struct SourceMarks {
    pub source: String,
    pub records: Vec<RecordMarks>,
}

/// Result of classifying a test table against a reference table.
///
/// Marks follow the reference table's iteration order. The excess list holds
/// codes that appeared in some record but are not thesaurus members; it is
/// owned by this result, not shared between invocations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub sources: Vec<SourceMarks>,

    /// Non-thesaurus codes encountered, in first-seen order
    pub excess: Vec<String>,
}

impl Classification {
    /// All marks across every source and record
    pub fn all_marks(&self) -> impl Iterator<Item = MatchMark> + '_ {
        self.sources
            .iter()
            .flat_map(|s| s.records.iter())
            .flat_map(|r| r.marks.iter())
            .map(|m| m.mark)
    }

    /// Marks grouped by code, preserving per-code mark order
    #[must_use]
    pub fn marks_by_code(&self) -> HashMap<&str, Vec<MatchMark>> {
        let mut by_code: HashMap<&str, Vec<MatchMark>> = HashMap::new();
        for source in &self.sources {
            for record in &source.records {
                for code_mark in &record.marks {
                    by_code
                        .entry(code_mark.code.as_str())
                        .or_default()
                        .push(code_mark.mark);
                }
            }
        }
        by_code
    }

    /// Number of compared records (shared between both tables)
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(|s| s.records.len()).sum()
    }
}

/// The match classifier: compares a test table against a reference table.
///
/// For every record present in both tables, every code of the combined code
/// set receives exactly one [`MatchMark`]. Records present in only one table
/// have nothing to compare and are skipped silently.
pub struct Classifier<'a> {
    thesaurus: &'a Thesaurus,
    unions: Option<&'a UnionSet>,
    strict: bool,
}

impl<'a> Classifier<'a> {
    #[must_use]
    pub fn new(thesaurus: &'a Thesaurus) -> Self {
        Self {
            thesaurus,
            unions: None,
            strict: false,
        }
    }

    /// Apply group-union equivalence: a false mark whose code shares a union
    /// with some code of the opposing set is upgraded to a true positive.
    #[must_use]
    pub fn with_unions(mut self, unions: &'a UnionSet) -> Self {
        self.unions = Some(unions);
        self
    }

    /// Strict mode: drop codes outside every union before classification.
    /// Only meaningful when unions are configured; changes the tp+fp+fn
    /// denominators, not just the matching.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Classify every shared (source, record) pair.
    ///
    /// Fails with [`CompareError::NoUsableInput`] when either table holds no
    /// records at all; statistics over zero records are meaningless.
    pub fn classify(
        &self,
        ref_table: &DatasetTable,
        test_table: &DatasetTable,
    ) -> Result<Classification, CompareError> {
        if ref_table.is_empty() {
            return Err(CompareError::NoUsableInput("reference"));
        }
        if test_table.is_empty() {
            return Err(CompareError::NoUsableInput("test"));
        }

        let mut excess: Vec<String> = Vec::new();
        let mut excess_set: HashSet<String> = HashSet::new();
        let mut sources = Vec::new();

        for ref_source in ref_table.sources() {
            let Some(test_source) = test_table.source(&ref_source.id) else {
                continue;
            };
            let mut records = Vec::new();
            for ref_record in ref_source.records() {
                let Some(test_record) = test_source.get(&ref_record.id) else {
                    continue;
                };
                let marks = self.classify_record(
                    &ref_record.codes,
                    &test_record.codes,
                    &mut excess,
                    &mut excess_set,
                );
                records.push(RecordMarks {
                    record: ref_record.id.clone(),
                    marks,
                });
            }
            if !records.is_empty() {
                sources.push(SourceMarks {
                    source: ref_source.id.clone(),
                    records,
                });
            }
        }

        Ok(Classification { sources, excess })
    }

    fn classify_record(
        &self,
        ref_codes: &[String],
        test_codes: &[String],
        excess: &mut Vec<String>,
        excess_set: &mut HashSet<String>,
    ) -> Vec<CodeMark> {
        let ref_set: HashSet<&str> = ref_codes.iter().map(String::as_str).collect();
        let test_set: HashSet<&str> = test_codes.iter().map(String::as_str).collect();

        // Reference codes first, then test-only codes, each in input order;
        // keeps mark order deterministic where a set union would not be.
        let mut seen: HashSet<&str> = HashSet::new();
        let combined = ref_codes
            .iter()
            .chain(test_codes.iter())
            .map(String::as_str)
            .filter(|&code| seen.insert(code));

        let mut marks = Vec::new();
        for code in combined {
            // A code flagged excess once stays excess for the whole run
            if excess_set.contains(code) {
                continue;
            }
            if !self.thesaurus.contains(code) {
                excess_set.insert(code.to_string());
                excess.push(code.to_string());
                continue;
            }
            if self.strict {
                if let Some(unions) = self.unions {
                    if !unions.covers_code(code) {
                        continue;
                    }
                }
            }

            let (mut mark, opposing) = if !ref_set.contains(code) {
                (MatchMark::FalsePositive, Some(&ref_set))
            } else if test_set.contains(code) {
                (MatchMark::TruePositive, None)
            } else {
                (MatchMark::FalseNegative, Some(&test_set))
            };

            if let (Some(unions), Some(opposing)) = (self.unions, opposing) {
                if let Some(union) = unions.union_of_code(code) {
                    if opposing.iter().any(|other| union.codes.contains(*other)) {
                        mark = MatchMark::TruePositive;
                    }
                }
            }

            marks.push(CodeMark {
                code: code.to_string(),
                mark,
            });
        }
        marks
    }
}
