//! Match classification and statistics aggregation.
//!
//! This module is the algorithmic core of the crate:
//!
//! - [`Classifier`]: marks every code of every shared record as TP/FP/FN,
//!   applying group-union equivalence and the optional strict filter
//! - [`UnionSet`]: named equivalence classes of mutually substitutable codes
//! - [`MatchStats`]: precision/recall/F-score reduction over mark multisets
//! - [`check_required_groups`]: mandatory-group presence flags per record
//!
//! ## Classification
//!
//! For a record present in both tables, every code of `ref ∪ test` receives
//! exactly one mark:
//!
//! - in test only → false positive
//! - in both → true positive
//! - in reference only → false negative
//!
//! A false mark is upgraded to a true positive when its code and some code
//! of the opposing set belong to the same union ("near-miss at the group
//! level still counts as a match"). Codes outside the thesaurus never get a
//! mark; they are collected once per run in the excess list.
//!
//! ## Aggregation
//!
//! [`MatchStats`] folds any mark multiset, so every aggregation level (per
//! record, per source, per code, per group, grand total) is just a different
//! concatenation performed by the caller.

pub mod aggregate;
pub mod classifier;
pub mod requirements;
pub mod stats;
pub mod unions;

pub use aggregate::{NamedStats, RecordStats};
pub use classifier::{Classification, Classifier, CompareError};
pub use requirements::{check_required_groups, RequiredGroups, RequirementFlag};
pub use stats::MatchStats;
pub use unions::{UnionError, UnionSet, UnionSpec};
