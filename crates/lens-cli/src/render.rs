//! Plain-text report sections.

use std::io::{self, Write};

use lens::{MetricEntry, MetricMap};
use polars::prelude::DataFrame;

/// Message printed when the ticker data could not be fetched.
pub(crate) const NO_DATA: &str =
    "Could not retrieve data for the specified ticker. Check the symbol and try again.";

/// Writes a `=== title ===` header preceded by a blank line.
pub(crate) fn write_header(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {title} ===")
}

/// Writes a section of `label: value` lines; nested groups are indented.
pub(crate) fn write_section(
    out: &mut impl Write,
    title: &str,
    metrics: &MetricMap,
) -> io::Result<()> {
    write_header(out, title)?;
    write_metrics(out, metrics, 0)
}

fn write_metrics(out: &mut impl Write, metrics: &MetricMap, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for (label, entry) in metrics.iter() {
        match entry {
            MetricEntry::Value(value) => writeln!(out, "{indent}{label}: {value}")?,
            MetricEntry::Group(group) => {
                writeln!(out, "{indent}{label}:")?;
                write_metrics(out, group, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Writes the last `rows` rows of the price history.
pub(crate) fn write_history(
    out: &mut impl Write,
    history: &DataFrame,
    rows: usize,
) -> io::Result<()> {
    write_header(out, "Latest Historical Data")?;
    writeln!(out, "{}", history.tail(Some(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_flat_section() {
        let metrics: MetricMap = [("Symbol", "$AAPL"), ("Name", "Apple Inc.")]
            .into_iter()
            .collect();

        let text = render(|out| write_section(out, "Ticker Information", &metrics));

        assert_eq!(text, "\n=== Ticker Information ===\nSymbol: $AAPL\nName: Apple Inc.\n");
    }

    #[test]
    fn test_nested_group_is_indented() {
        let mut debt = MetricMap::new();
        debt.insert("Previous Debt", "150.00");
        let mut metrics = MetricMap::new();
        metrics.insert("Beta", "1.24");
        metrics.insert("Debt Comparison", debt);

        let text = render(|out| write_section(out, "Fundamental Analysis", &metrics));

        assert_eq!(
            text,
            "\n=== Fundamental Analysis ===\nBeta: 1.24\nDebt Comparison:\n  Previous Debt: 150.00\n"
        );
    }

    #[test]
    fn test_empty_section_prints_only_header() {
        let text = render(|out| write_section(out, "Debt Comparison", &MetricMap::new()));
        assert_eq!(text, "\n=== Debt Comparison ===\n");
    }

    #[test]
    fn test_history_shows_last_rows() {
        let history = DataFrame::new(vec![Column::new(
            "close".into(),
            [101.5, 102.25, 103.75, 104.5, 105.25, 106.5, 107.75],
        )])
        .unwrap();

        let text = render(|out| write_history(out, &history, 2));

        assert!(text.starts_with("\n=== Latest Historical Data ===\n"));
        assert!(text.contains("shape: (2, 1)"));
        assert!(text.contains("107.75"));
        assert!(!text.contains("101.5"));
    }
}
