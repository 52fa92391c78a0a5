//! Fundamental metrics drawn from a ticker's info snapshot.

use lens_core::{
    DataError, MetricMap, Result, TickerInfo, UNAVAILABLE, format_magnitude, format_value,
};

/// Label of the nested debt group inside the fundamentals section.
pub const DEBT_COMPARISON: &str = "Debt Comparison";

/// How a field is rendered.
#[derive(Clone, Copy, Debug)]
enum Render {
    /// As the vendor reported it.
    Raw,
    /// With a K/M/B suffix.
    Magnitude,
    /// Fraction scaled to a percentage.
    Percent,
}

/// Fundamentals section layout: label, vendor key, rendering.
const FIELDS: [(&str, &str, Render); 14] = [
    ("P/E Ratio", "trailingPE", Render::Raw),
    ("P/B Ratio", "priceToBook", Render::Raw),
    ("Dividend Yield", "dividendYield", Render::Percent),
    ("ROE", "returnOnEquity", Render::Raw),
    ("Debt to Equity", "debtToEquity", Render::Raw),
    ("Beta", "beta", Render::Raw),
    ("Revenue Growth", "revenueGrowth", Render::Raw),
    ("Free Cash Flow", "freeCashflow", Render::Magnitude),
    ("Total Debt", "totalDebt", Render::Magnitude),
    ("Long-Term Debt", "longTermDebt", Render::Magnitude),
    ("Operating Income", "operatingIncome", Render::Magnitude),
    ("Net Income", "netIncomeToCommon", Render::Magnitude),
    ("EPS Growth (5Y)", "earningsQuarterlyGrowth", Render::Raw),
    ("EPS Growth (Next 5Y)", "earningsGrowth", Render::Raw),
];

/// Builds the fundamentals section from a ticker's info snapshot.
///
/// Every metric is present in the result; the ones the vendor did not report
/// read [`UNAVAILABLE`]. The last entry is the [`DEBT_COMPARISON`] group,
/// holding the previous debt figure and, when both total debt and
/// debt-to-equity are reported and non-zero, their ratio as "Change".
///
/// # Errors
///
/// Returns [`DataError::Parse`] when a field that has to be computed on is
/// present but not numeric.
pub fn build_fundamentals(info: &TickerInfo) -> Result<MetricMap> {
    let mut fundamentals = MetricMap::new();

    for (label, key, render) in FIELDS {
        let text = match render {
            Render::Raw => info.display(key, UNAVAILABLE),
            Render::Magnitude => format_value(info.get(key)),
            Render::Percent => match info.get(key) {
                None => UNAVAILABLE.to_string(),
                Some(_) => percent(numeric(info, key)?),
            },
        };
        fundamentals.insert(label, text);
    }

    fundamentals.insert(DEBT_COMPARISON, debt_group(info)?);
    Ok(fundamentals)
}

fn debt_group(info: &TickerInfo) -> Result<MetricMap> {
    let mut group = MetricMap::new();
    group.insert("Previous Debt", format_value(info.get("debtToEquity")));

    if info.is_truthy("totalDebt") && info.is_truthy("debtToEquity") {
        let ratio = numeric(info, "totalDebt")? / numeric(info, "debtToEquity")?;
        group.insert("Change", format_magnitude(Some(ratio)));
    }

    Ok(group)
}

/// Scales a fraction to a percentage, always keeping a decimal part:
/// `0.02` gives `"2.0%"`, `0.015625` gives `"1.5625%"`.
fn percent(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if pct.fract() == 0.0 {
        format!("{pct:.1}%")
    } else {
        format!("{pct}%")
    }
}

fn numeric(info: &TickerInfo, key: &str) -> Result<f64> {
    info.get_f64(key).ok_or_else(|| {
        DataError::Parse(format!(
            "{key} is not numeric: {}",
            info.display(key, "missing")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> TickerInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_snapshot() {
        let info = snapshot(json!({
            "trailingPE": 28.5,
            "priceToBook": 47.1,
            "dividendYield": 0.015_625,
            "returnOnEquity": 1.47,
            "debtToEquity": 150.0,
            "beta": 1.24,
            "revenueGrowth": 0.061,
            "freeCashflow": 110_846_001_152_i64,
            "totalDebt": 106_629_001_216_i64,
            "operatingIncome": 123_216_003_072_i64,
            "netIncomeToCommon": 93_736_001_536_i64,
            "earningsQuarterlyGrowth": -0.021,
            "earningsGrowth": 0.102,
        }));

        let fundamentals = build_fundamentals(&info).unwrap();

        assert_eq!(fundamentals.value("P/E Ratio"), Some("28.5"));
        assert_eq!(fundamentals.value("P/B Ratio"), Some("47.1"));
        assert_eq!(fundamentals.value("Dividend Yield"), Some("1.5625%"));
        assert_eq!(fundamentals.value("Beta"), Some("1.24"));
        assert_eq!(fundamentals.value("Free Cash Flow"), Some("110.8B"));
        assert_eq!(fundamentals.value("Total Debt"), Some("106.6B"));
        assert_eq!(fundamentals.value("Long-Term Debt"), Some(UNAVAILABLE));
        assert_eq!(fundamentals.value("Net Income"), Some("93.7B"));
        assert_eq!(fundamentals.value("EPS Growth (5Y)"), Some("-0.021"));

        let debt = fundamentals.group(DEBT_COMPARISON).unwrap();
        assert_eq!(debt.value("Previous Debt"), Some("150.00"));
        assert_eq!(debt.value("Change"), Some("710.9M"));
    }

    #[test]
    fn test_whole_percentages_keep_a_decimal() {
        let info = snapshot(json!({"dividendYield": 0.02}));
        let fundamentals = build_fundamentals(&info).unwrap();
        assert_eq!(fundamentals.value("Dividend Yield"), Some("2.0%"));

        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(percent(1.0), "100.0%");
        assert_eq!(percent(0.015_625), "1.5625%");
    }

    #[test]
    fn test_labels_keep_their_order() {
        let fundamentals = build_fundamentals(&TickerInfo::new()).unwrap();
        let labels: Vec<&str> = fundamentals.labels().collect();

        let mut expected: Vec<&str> = FIELDS.iter().map(|(label, _, _)| *label).collect();
        expected.push(DEBT_COMPARISON);
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_empty_snapshot_reads_unavailable() {
        let fundamentals = build_fundamentals(&TickerInfo::new()).unwrap();

        for (label, entry) in fundamentals.iter() {
            if label == DEBT_COMPARISON {
                continue;
            }
            assert_eq!(entry.as_value(), Some(UNAVAILABLE), "{label}");
        }

        let debt = fundamentals.group(DEBT_COMPARISON).unwrap();
        assert_eq!(debt.value("Previous Debt"), Some(UNAVAILABLE));
        assert!(!debt.contains("Change"));
    }

    #[test]
    fn test_null_fields_read_unavailable() {
        let info = snapshot(json!({"dividendYield": null, "beta": null}));
        let fundamentals = build_fundamentals(&info).unwrap();

        assert_eq!(fundamentals.value("Dividend Yield"), Some(UNAVAILABLE));
        assert_eq!(fundamentals.value("Beta"), Some(UNAVAILABLE));
    }

    #[test]
    fn test_zero_debt_to_equity_skips_change() {
        let info = snapshot(json!({"totalDebt": 5_000_000, "debtToEquity": 0}));
        let debt = build_fundamentals(&info)
            .unwrap()
            .group(DEBT_COMPARISON)
            .cloned()
            .unwrap();

        assert_eq!(debt.value("Previous Debt"), Some("0.00"));
        assert!(!debt.contains("Change"));
    }

    #[test]
    fn test_non_numeric_computed_field_is_an_error() {
        let info = snapshot(json!({"totalDebt": "lots", "debtToEquity": 2.0}));
        let err = build_fundamentals(&info).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));

        let info = snapshot(json!({"dividendYield": "n/a"}));
        assert!(build_fundamentals(&info).is_err());
    }

    #[test]
    fn test_non_numeric_display_field_is_shown_as_is() {
        let info = snapshot(json!({"trailingPE": "Infinity", "freeCashflow": "n/a"}));
        let fundamentals = build_fundamentals(&info).unwrap();

        assert_eq!(fundamentals.value("P/E Ratio"), Some("Infinity"));
        assert_eq!(fundamentals.value("Free Cash Flow"), Some(UNAVAILABLE));
    }
}
