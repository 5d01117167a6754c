//! Formatted terminal output.
//!
//! Formatting lives here so the pipeline code stays free of presentation and
//! output changes stay localized.

use crate::domain::ObservationTable;
use crate::io::ingest::Table;
use crate::report::stats::{MetricStats, Summary};

const RULE_WIDTH: usize = 70;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Banner framing a section title between two rules.
pub fn format_banner(title: &str) -> String {
    format!("{}\n{title}\n{}", rule(), rule())
}

/// Loader diagnostics: file name and table shape.
pub fn format_load_diagnostics(table: &Table) -> String {
    let mut out = format!(
        "Loaded: {}\n  Rows: {}, Columns: {}",
        table.file_name(),
        table.row_count(),
        table.column_count()
    );
    if !table.row_errors.is_empty() {
        out.push_str(&format!("\n  Skipped malformed records: {}", table.row_errors.len()));
        for err in &table.row_errors {
            out.push_str(&format!("\n    line {}: {}", err.line, err.message));
        }
    }
    out
}

/// Network categories and load range found in the data.
pub fn format_dataset_overview(table: &ObservationTable) -> String {
    let labels = table.network_labels();
    let range = match table.lambda_range() {
        Some((lo, hi)) => format!("{} - {}", fmt_num(lo), fmt_num(hi)),
        None => "n/a".to_string(),
    };
    format!("Network types: [{}]\nLambda range: {range}", labels.join(", "))
}

/// The per-category statistics block.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format_banner("ANALYSIS METHOD STATISTICS"));
    out.push('\n');

    for category in &summary.categories {
        let name = category.network.label();
        let Some(metrics) = &category.metrics else {
            out.push_str(&format!("\n{name} network: NO DATA\n"));
            continue;
        };

        out.push_str(&format!("\n{name} network:\n"));
        for stats in metrics {
            out.push_str(&format_metric(stats));
        }
    }

    out.push_str(&rule());
    out
}

fn format_metric(stats: &MetricStats) -> String {
    let name = stats.metric.report_name();
    if stats.metric.is_delay() {
        let (min, max) = match stats.range {
            Some((lo, hi)) => (format!("{lo:.4} ms"), format!("{hi:.4} ms")),
            None => ("n/a".to_string(), "n/a".to_string()),
        };
        return format!("  {name}:\n    Min:  {min}\n    Max:  {max}\n");
    }

    let range = match stats.range {
        Some((lo, hi)) => format!("{lo:.4} - {hi:.4} Mbit/s"),
        None => "n/a".to_string(),
    };
    format!("  {name}:\n    Throughput: {range}\n")
}

fn fmt_num(v: f64) -> String {
    // Trim float noise such as 2.0000000000000004 while keeping exact values short.
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, ObservationTable};
    use crate::report::stats::summarize;

    #[test]
    fn summary_prints_no_data_for_absent_category() {
        let table = ObservationTable::new(vec![Observation::new("AdHoc", 0.1, [1.0, 2.0, 3.0, 4.0, 0.0125])]);
        let text = format_summary(&summarize(&table));

        assert!(text.contains("AdHoc network:\n  Mean Value Analysis:\n    Throughput: 1.0000 - 1.0000 Mbit/s"));
        assert!(text.contains("  Buzen Method:\n    Throughput: 4.0000 - 4.0000 Mbit/s"));
        assert!(text.contains("    Min:  12.5000 ms"));
        assert!(text.contains("Group network: NO DATA"));
        assert!(text.ends_with(&rule()));
    }

    #[test]
    fn overview_lists_types_and_range() {
        let table = ObservationTable::new(vec![
            Observation::new("AdHoc", 0.1, [0.0; 5]),
            Observation::new("Group", 2.0000000000000004, [0.0; 5]),
        ]);
        assert_eq!(format_dataset_overview(&table), "Network types: [AdHoc, Group]\nLambda range: 0.1 - 2");
    }

    #[test]
    fn load_diagnostics_report_shape() {
        let table = crate::io::ingest::read_table(
            "a,b,c\n1,2,3\n4,5,6\n".as_bytes(),
            std::path::Path::new("public/analysis_with_methods.csv"),
        )
        .unwrap();
        assert_eq!(
            format_load_diagnostics(&table),
            "Loaded: analysis_with_methods.csv\n  Rows: 2, Columns: 3"
        );
    }

    #[test]
    fn load_diagnostics_list_skipped_records() {
        let table = crate::io::ingest::read_table(
            &b"a,b\n1,2\n\xff,3\n4,5\n"[..],
            std::path::Path::new("analysis_with_methods.csv"),
        )
        .unwrap();
        let text = format_load_diagnostics(&table);
        assert!(text.starts_with("Loaded: analysis_with_methods.csv\n  Rows: 2, Columns: 2"));
        assert!(text.contains("\n  Skipped malformed records: 1\n    line 3: CSV parse error:"));
    }

    #[test]
    fn fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(-0.25), "-0.25");
    }
}
