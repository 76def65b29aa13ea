//! Report assembly: arranging computed statistics into output shapes.
//!
//! Everything here is presentation. Renderers receive fully computed
//! [`MatchStats`] rows and recompute nothing; the only work done locally is
//! ordering codes by thesaurus display order for the conclusions listing.
//! Three shapes are produced, one per [`OutputFormat`](crate::cli::OutputFormat):
//! hierarchical text, JSON, and flat TSV rows.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::types::MatchMark;
use crate::matching::aggregate::{NamedStats, RecordStats};
use crate::matching::classifier::Classification;
use crate::matching::requirements::RequirementFlag;
use crate::matching::stats::MatchStats;
use crate::thesaurus::Thesaurus;

/// Fully assembled per-record comparison report
#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub records: Vec<RecordStats>,
    pub total: MatchStats,

    /// Non-thesaurus codes encountered during classification
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excess: Vec<String>,

    /// Required-groups flags, when requirements were configured
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<RequirementFlag>,

    /// Conclusions grouped by mark (the `--full` listing)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conclusions: Vec<MarkListing>,
}

/// Display names of all codes that received a given mark anywhere in the run
#[derive(Debug, Serialize)]
pub struct MarkListing {
    pub mark: MatchMark,
    pub names: Vec<String>,
}

/// Collect the deduplicated codes per mark, ordered by thesaurus display
/// order, mapped to display names. Marks with no codes are omitted.
#[must_use]
pub fn mark_listings(classification: &Classification, thesaurus: &Thesaurus) -> Vec<MarkListing> {
    let by_code = classification.marks_by_code();
    [
        MatchMark::TruePositive,
        MatchMark::FalsePositive,
        MatchMark::FalseNegative,
    ]
    .into_iter()
    .filter_map(|wanted| {
        let mut codes: Vec<&str> = by_code
            .iter()
            .filter(|(_, marks)| marks.contains(&wanted))
            .map(|(&code, _)| code)
            .collect();
        codes.sort_by_key(|&code| thesaurus.display_index(code).unwrap_or(0));
        if codes.is_empty() {
            return None;
        }
        let names = codes
            .into_iter()
            .filter_map(|code| thesaurus.name_of(code))
            .map(ToString::to_string)
            .collect();
        Some(MarkListing {
            mark: wanted,
            names,
        })
    })
    .collect()
}

/// Hierarchical text rendering of a comparison report
#[must_use]
pub fn render_compare_text(report: &CompareReport) -> String {
    let mut out = String::new();
    for row in &report.records {
        let _ = writeln!(out, "{}, {}", row.source, row.record);
        write_stats_block(&mut out, &row.stats);
        out.push('\n');
    }
    let _ = writeln!(out, "Total");
    write_stats_block(&mut out, &report.total);

    if !report.conclusions.is_empty() {
        out.push('\n');
        for listing in &report.conclusions {
            let _ = writeln!(out, "{}", listing.mark);
            for name in &listing.names {
                let _ = writeln!(out, "  {name}");
            }
        }
    }
    if !report.excess.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Excess conclusions:");
        for code in &report.excess {
            let _ = writeln!(out, "  {code}");
        }
    }
    if !report.requirements.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Required groups:");
        for flag in &report.requirements {
            let status = if flag.passed { "passed" } else { "failed" };
            let _ = writeln!(out, "  {}, {}: {status}", flag.source, flag.record);
        }
    }
    out
}

fn write_stats_block(out: &mut String, stats: &MatchStats) {
    let _ = writeln!(out, "TP: {}", stats.tp);
    let _ = writeln!(out, "FP: {}", stats.fp);
    let _ = writeln!(out, "FN: {}", stats.fn_);
    let _ = writeln!(out, "Precision: {:.3}", stats.precision);
    let _ = writeln!(out, "Recall: {:.3}", stats.recall);
    let _ = writeln!(out, "F-score: {:.3}", stats.fscore);
    if let Some(normalized) = stats.normalized {
        let _ = writeln!(out, "Normalized F-score: {normalized}");
    }
}

/// TSV rendering of a comparison report: one row per record plus a total row
#[must_use]
pub fn render_compare_tsv(report: &CompareReport) -> String {
    let mut out = String::from("source\trecord\ttp\tfp\tfn\tprecision\trecall\tfscore");
    let with_norm = report.total.normalized.is_some();
    if with_norm {
        out.push_str("\tnormalized");
    }
    out.push('\n');
    for row in &report.records {
        let _ = write!(out, "{}\t{}", row.source, row.record);
        write_tsv_cells(&mut out, &row.stats, with_norm);
    }
    let _ = write!(out, "total\t");
    write_tsv_cells(&mut out, &report.total, with_norm);
    out
}

fn write_tsv_cells(out: &mut String, stats: &MatchStats, norm: bool) {
    let _ = write!(
        out,
        "\t{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}",
        stats.tp, stats.fp, stats.fn_, stats.precision, stats.recall, stats.fscore
    );
    if norm {
        let _ = write!(out, "\t{}", stats.normalized.unwrap_or(0));
    }
    out.push('\n');
}

/// Flat-table text rendering of named stats rows (per code or per group)
#[must_use]
pub fn render_named_text(rows: &[NamedStats]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{}", row.name);
        write_stats_block(&mut out, &row.stats);
        out.push('\n');
    }
    out
}

/// TSV rendering of named stats rows
#[must_use]
pub fn render_named_tsv(rows: &[NamedStats]) -> String {
    let with_norm = rows.iter().any(|r| r.stats.normalized.is_some());
    let mut out = String::from("name\ttp\tfp\tfn\tprecision\trecall\tfscore");
    if with_norm {
        out.push_str("\tnormalized");
    }
    out.push('\n');
    for row in rows {
        let _ = write!(out, "{}", row.name);
        write_tsv_cells(&mut out, &row.stats, with_norm);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CompareReport {
        CompareReport {
            records: vec![RecordStats {
                source: "db".into(),
                record: "r1".into(),
                stats: MatchStats::from_counts(1, 1, 1, Some(5)),
            }],
            total: MatchStats::from_counts(1, 1, 1, Some(5)),
            excess: vec!["9.9".into()],
            requirements: Vec::new(),
            conclusions: Vec::new(),
        }
    }

    #[test]
    fn test_text_report_contains_record_block() {
        let text = render_compare_text(&report());
        assert!(text.contains("db, r1"));
        assert!(text.contains("Precision: 0.500"));
        assert!(text.contains("Normalized F-score: 3"));
        assert!(text.contains("Total"));
        assert!(text.contains("Excess conclusions:"));
        assert!(text.contains("  9.9"));
    }

    #[test]
    fn test_tsv_report_has_total_row() {
        let tsv = render_compare_tsv(&report());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("source\trecord"));
        assert!(lines[2].starts_with("total\t"));
        assert!(lines[1].contains("0.500"));
    }

    #[test]
    fn test_named_tsv() {
        let rows = vec![NamedStats {
            name: "Sinus rhythm".into(),
            stats: MatchStats::from_counts(2, 0, 0, None),
        }];
        let tsv = render_named_tsv(&rows);
        assert!(tsv.contains("Sinus rhythm\t2\t0\t0\t1.000\t1.000\t1.000"));
    }

    #[test]
    fn test_json_report_serializes() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["total"]["tp"], 1);
        assert_eq!(json["records"][0]["source"], "db");
        assert_eq!(json["excess"][0], "9.9");
    }
}
