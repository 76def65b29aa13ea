use serde::Serialize;

use crate::core::types::MatchMark;

/// Safely convert usize to f64 for ratio calculations.
/// Counts here are annotation-code tallies, far inside f64 mantissa range.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Precision/recall statistics reduced from a multiset of match marks.
///
/// Derived on demand, never stored: callers concatenate whatever mark
/// multiset defines their aggregation level (one record, one source, one
/// code, one group, or everything) and reduce it here. The reducer itself
/// has no notion of hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchStats {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub precision: f64,
    pub recall: f64,
    pub fscore: f64,
    /// `round(fscore * (k + 1/k))` when a normalization factor k was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<i64>,
}

impl MatchStats {
    /// Fold a mark multiset into counts and derived scores.
    ///
    /// All ratios are zero-guarded: an empty or all-negative multiset yields
    /// precision = recall = fscore = 0 rather than NaN.
    pub fn from_marks<I>(marks: I, knorm: Option<u32>) -> Self
    where
        I: IntoIterator<Item = MatchMark>,
    {
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for mark in marks {
            match mark {
                MatchMark::TruePositive => tp += 1,
                MatchMark::FalsePositive => fp += 1,
                MatchMark::FalseNegative => fn_ += 1,
            }
        }
        Self::from_counts(tp, fp, fn_, knorm)
    }

    /// Derive scores from already-tallied counts
    #[must_use]
    pub fn from_counts(tp: usize, fp: usize, fn_: usize, knorm: Option<u32>) -> Self {
        let precision = if tp + fp > 0 {
            count_to_f64(tp) / count_to_f64(tp + fp)
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            count_to_f64(tp) / count_to_f64(tp + fn_)
        } else {
            0.0
        };
        let fscore = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let normalized = knorm.map(|k| normalize_fscore(fscore, k));

        Self {
            tp,
            fp,
            fn_,
            precision,
            recall,
            fscore,
            normalized,
        }
    }

    /// Total number of marks behind these stats
    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.tp + self.fp + self.fn_
    }
}

/// Map an F-score in [0,1] onto a 0..=k+1 integer scale: `round(f * (k + 1/k))`.
///
/// Rounds half away from zero via `f64::round`.
#[must_use]
pub fn normalize_fscore(fscore: f64, knorm: u32) -> i64 {
    let k = f64::from(knorm.max(1));
    #[allow(clippy::cast_possible_truncation)]
    {
        (fscore * (k + 1.0 / k)).round() as i64
    }
}
