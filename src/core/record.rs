use serde::{Deserialize, Serialize};

use crate::core::types::SourceKey;

/// Document type marker for previously exported comparison results.
/// Such files live next to plain annotation files and must be skipped.
pub const CMP_RESULT_TYPE: &str = "cmpresult";

/// One raw annotation record as read from a JSON input file.
///
/// Field names follow the on-disk format produced by the annotation tools:
/// `database`, `record`, `annotator`, `conclusionThesaurus`, `conclusions`.
/// Every field is optional at the parsing level; validation happens when the
/// record is admitted into a [`DatasetTable`](crate::core::table::DatasetTable).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotator: Option<String>,

    /// Label of the annotation scheme the conclusions were drawn from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion_thesaurus: Option<String>,

    /// Annotation codes; `None` (field absent) is distinct from an empty list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<Vec<String>>,

    /// Document type marker (`"cmpresult"` for exported comparison results)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

impl AnnotationRecord {
    /// Validate the record against the active thesaurus label.
    ///
    /// Returns the reason the record cannot enter a dataset table, or `None`
    /// when it is usable under the given source key.
    #[must_use]
    pub fn reject_reason(&self, thesaurus_label: &str, key: SourceKey) -> Option<RejectReason> {
        if self.doc_type.as_deref() == Some(CMP_RESULT_TYPE) {
            return Some(RejectReason::ComparisonResult);
        }
        if self.conclusions.is_none() {
            return Some(RejectReason::MissingConclusions);
        }
        if self.conclusion_thesaurus.as_deref() != Some(thesaurus_label) {
            return Some(RejectReason::ThesaurusMismatch);
        }
        if self.database.is_none() || self.record.is_none() {
            return Some(RejectReason::MissingIdentity);
        }
        if key == SourceKey::Annotator && self.annotator.is_none() {
            return Some(RejectReason::MissingAnnotator);
        }
        None
    }
}

/// Why a record was excluded from a dataset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The document is a previously exported comparison result
    ComparisonResult,
    /// No `conclusions` field at all
    MissingConclusions,
    /// Declared thesaurus label differs from the active one
    ThesaurusMismatch,
    /// Missing `database` or `record` identifier
    MissingIdentity,
    /// Missing `annotator` while building an annotator-keyed table
    MissingAnnotator,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ComparisonResult => "document is a comparison result",
            Self::MissingConclusions => "no conclusions field",
            Self::ThesaurusMismatch => "thesaurus label mismatch",
            Self::MissingIdentity => "missing database or record identifier",
            Self::MissingAnnotator => "missing annotator identifier",
        };
        write!(f, "{text}")
    }
}

/// A record excluded from a table, kept for diagnostic reporting
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRecord {
    pub record: AnnotationRecord,
    pub reason: RejectReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usable_record() -> AnnotationRecord {
        AnnotationRecord {
            database: Some("db1".into()),
            record: Some("rec1".into()),
            annotator: Some("alice".into()),
            conclusion_thesaurus: Some("MCS".into()),
            conclusions: Some(vec!["1.1".into()]),
            doc_type: None,
        }
    }

    #[test]
    fn test_valid_record_accepted() {
        let rec = usable_record();
        assert_eq!(rec.reject_reason("MCS", SourceKey::Database), None);
        assert_eq!(rec.reject_reason("MCS", SourceKey::Annotator), None);
    }

    #[test]
    fn test_cmpresult_rejected() {
        let rec = AnnotationRecord {
            doc_type: Some(CMP_RESULT_TYPE.into()),
            ..usable_record()
        };
        assert_eq!(
            rec.reject_reason("MCS", SourceKey::Database),
            Some(RejectReason::ComparisonResult)
        );
    }

    #[test]
    fn test_label_mismatch_rejected() {
        let rec = usable_record();
        assert_eq!(
            rec.reject_reason("OTHER", SourceKey::Database),
            Some(RejectReason::ThesaurusMismatch)
        );
    }

    #[test]
    fn test_missing_conclusions_rejected() {
        let rec = AnnotationRecord {
            conclusions: None,
            ..usable_record()
        };
        assert_eq!(
            rec.reject_reason("MCS", SourceKey::Database),
            Some(RejectReason::MissingConclusions)
        );
    }

    #[test]
    fn test_missing_annotator_only_matters_for_annotator_key() {
        let rec = AnnotationRecord {
            annotator: None,
            ..usable_record()
        };
        assert_eq!(rec.reject_reason("MCS", SourceKey::Database), None);
        assert_eq!(
            rec.reject_reason("MCS", SourceKey::Annotator),
            Some(RejectReason::MissingAnnotator)
        );
    }

    #[test]
    fn test_parses_camel_case_fields() {
        let json = r#"{
            "database": "db1",
            "record": "rec1",
            "conclusionThesaurus": "MCS",
            "conclusions": ["1.1", "2.1"],
            "type": "annotation"
        }"#;
        let rec: AnnotationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.conclusion_thesaurus.as_deref(), Some("MCS"));
        assert_eq!(rec.conclusions.as_ref().unwrap().len(), 2);
    }
}
