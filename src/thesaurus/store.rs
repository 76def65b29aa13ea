use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThesaurusError {
    #[error("Failed to read thesaurus: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse thesaurus: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Code '{code}' appears in groups '{first}' and '{second}'")]
    DuplicateCode {
        code: String,
        first: String,
        second: String,
    },
}

/// Serializable thesaurus document format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThesaurusData {
    #[serde(rename = "thesaurus")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub groups: Vec<GroupData>,
}

/// One statement group: an identifier, a display name, and ordered members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupData {
    pub id: String,
    pub name: String,
    #[serde(rename = "reports")]
    pub statements: Vec<StatementData>,
}

/// One statement: annotation code and its display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementData {
    pub id: String,
    pub name: String,
}

/// A flattened statement with its owning group, in canonical display order
#[derive(Debug, Clone)]
pub struct StatementItem {
    pub code: String,
    pub name: String,
    pub group_id: String,
}

/// The reference vocabulary of annotation codes.
///
/// Groups and statements keep the order of the source document, which is the
/// canonical display order for reports. Every code belongs to exactly one
/// group; a code listed under two groups is a construction error.
#[derive(Debug)]
pub struct Thesaurus {
    /// Label identifying the annotation scheme
    pub label: String,

    /// Language tag of the display names (informational only)
    pub language: Option<String>,

    /// Group definitions in document order
    pub groups: Vec<GroupData>,

    /// Flattened statements in display order
    items: Vec<StatementItem>,

    /// Index: code -> index in items
    code_index: HashMap<String, usize>,
}

impl Thesaurus {
    /// Load a thesaurus from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ThesaurusError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a thesaurus from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ThesaurusError> {
        let data: ThesaurusData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Build from an already-parsed document, enforcing the one-group invariant
    pub fn from_data(data: ThesaurusData) -> Result<Self, ThesaurusError> {
        let mut items = Vec::new();
        let mut code_index = HashMap::new();

        for group in &data.groups {
            for statement in &group.statements {
                if let Some(&prev) = code_index.get(&statement.id) {
                    let prev: &StatementItem = &items[prev];
                    return Err(ThesaurusError::DuplicateCode {
                        code: statement.id.clone(),
                        first: prev.group_id.clone(),
                        second: group.id.clone(),
                    });
                }
                code_index.insert(statement.id.clone(), items.len());
                items.push(StatementItem {
                    code: statement.id.clone(),
                    name: statement.name.clone(),
                    group_id: group.id.clone(),
                });
            }
        }

        Ok(Self {
            label: data.label,
            language: data.language,
            groups: data.groups,
            items,
            code_index,
        })
    }

    /// Is the code a member of this thesaurus?
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.code_index.contains_key(code)
    }

    /// Display name of a code
    #[must_use]
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.code_index
            .get(code)
            .map(|&i| self.items[i].name.as_str())
    }

    /// Group identifier the code belongs to
    #[must_use]
    pub fn group_of(&self, code: &str) -> Option<&str> {
        self.code_index
            .get(code)
            .map(|&i| self.items[i].group_id.as_str())
    }

    /// Position of a code in canonical display order
    #[must_use]
    pub fn display_index(&self, code: &str) -> Option<usize> {
        self.code_index.get(code).copied()
    }

    /// All statements in canonical display order
    pub fn items(&self) -> impl Iterator<Item = &StatementItem> {
        self.items.iter()
    }

    /// All codes assigned to the given group, in display order
    pub fn codes_in_group<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.items
            .iter()
            .filter(move |item| item.group_id == group_id)
            .map(|item| item.code.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "thesaurus": "MCS",
        "language": "en",
        "groups": [
            {
                "id": "g1",
                "name": "Rhythm",
                "reports": [
                    {"id": "1.1", "name": "Sinus rhythm"},
                    {"id": "1.2", "name": "Sinus arrhythmia"}
                ]
            },
            {
                "id": "g2",
                "name": "Conduction",
                "reports": [
                    {"id": "2.1", "name": "AV block"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let thesaurus = Thesaurus::from_json(SAMPLE).unwrap();
        assert_eq!(thesaurus.label, "MCS");
        assert_eq!(thesaurus.language.as_deref(), Some("en"));
        assert_eq!(thesaurus.len(), 3);
        assert!(thesaurus.contains("1.2"));
        assert!(!thesaurus.contains("9.9"));
        assert_eq!(thesaurus.name_of("2.1"), Some("AV block"));
        assert_eq!(thesaurus.group_of("1.2"), Some("g1"));
    }

    #[test]
    fn test_display_order_is_document_order() {
        let thesaurus = Thesaurus::from_json(SAMPLE).unwrap();
        let codes: Vec<&str> = thesaurus.items().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["1.1", "1.2", "2.1"]);
        assert_eq!(thesaurus.display_index("2.1"), Some(2));
    }

    #[test]
    fn test_codes_in_group() {
        let thesaurus = Thesaurus::from_json(SAMPLE).unwrap();
        let g1: Vec<&str> = thesaurus.codes_in_group("g1").collect();
        assert_eq!(g1, vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_duplicate_code_is_error() {
        let json = r#"{
            "thesaurus": "MCS",
            "groups": [
                {"id": "g1", "name": "A", "reports": [{"id": "1.1", "name": "x"}]},
                {"id": "g2", "name": "B", "reports": [{"id": "1.1", "name": "y"}]}
            ]
        }"#;
        let err = Thesaurus::from_json(json).unwrap_err();
        assert!(matches!(err, ThesaurusError::DuplicateCode { .. }));
    }
}
