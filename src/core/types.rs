use serde::{Deserialize, Serialize};

/// Classification of a single annotation code within one compared record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMark {
    /// Code present in both the reference and the test set
    TruePositive,
    /// Code present in the test set only
    FalsePositive,
    /// Code present in the reference set only
    FalseNegative,
}

impl MatchMark {
    /// Short label used in text reports (TP/FP/FN)
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TruePositive => "TP",
            Self::FalsePositive => "FP",
            Self::FalseNegative => "FN",
        }
    }
}

impl std::fmt::Display for MatchMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which record field keys the source axis of a dataset table.
///
/// `Database` is the default and compares one annotation set per database.
/// `Annotator` keys test tables by annotator identity instead, so several
/// annotators of the same records can be compared against one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Database,
    Annotator,
}

impl Default for SourceKey {
    fn default() -> Self {
        Self::Database
    }
}
