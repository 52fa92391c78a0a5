//! Core data types for ticker data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`TickerInfo`] - Schema-less key-value snapshot returned by a vendor
//! - [`StatementTable`] - Row-indexed financial statement with period columns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::format::coerce_f64;

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Schema-less snapshot of everything a vendor knows about a ticker.
///
/// Keys follow the vendor's naming (`trailingPE`, `debtToEquity`, ...).
/// Nothing is validated on construction; every lookup tolerates absence and
/// a JSON `null` reads the same as a missing key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerInfo(Map<String, Value>);

impl TickerInfo {
    /// Creates an empty info mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, or `None` if it is missing or null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns true if `key` is present and not null.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value for `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the value for `key` coerced to a finite number.
    ///
    /// Numeric strings are accepted; anything else yields `None`.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce_f64)
    }

    /// Returns true if the value for `key` is present and truthy.
    ///
    /// Zero, `false`, empty strings and empty collections are falsy.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(Value::Null) => false,
        }
    }

    /// Renders the value for `key` as display text, or `default` when absent.
    ///
    /// Strings are rendered without quotes; everything else uses its JSON form.
    #[must_use]
    pub fn display(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns the number of fields, null ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the raw fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for TickerInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for TickerInfo {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A financial statement laid out the way vendors publish it: one row per
/// line item, one column per reporting period.
///
/// Columns are ordered most-recent-first, so column 0 is the current period
/// and column 1 the prior one. Every row has exactly one cell per column;
/// a missing or non-finite figure is stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    periods: Vec<NaiveDate>,
    rows: BTreeMap<String, Vec<Option<f64>>>,
}

impl StatementTable {
    /// Creates an empty statement with the given period columns.
    ///
    /// The columns are sorted most-recent-first and deduplicated.
    #[must_use]
    pub fn new(mut periods: Vec<NaiveDate>) -> Self {
        periods.sort_unstable_by(|a, b| b.cmp(a));
        periods.dedup();
        Self {
            periods,
            rows: BTreeMap::new(),
        }
    }

    /// Returns the period end dates, most recent first.
    #[must_use]
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Sets a row from `(period, value)` pairs.
    ///
    /// Pairs whose period is not one of the table's columns are ignored and
    /// columns without a pair stay empty.
    pub fn insert_row<I>(&mut self, label: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut cells = vec![None; self.periods.len()];
        for (date, value) in values {
            if !value.is_finite() {
                continue;
            }
            if let Some(idx) = self.periods.iter().position(|p| *p == date) {
                cells[idx] = Some(value);
            }
        }
        self.rows.insert(label.into(), cells);
    }

    /// Returns true if the statement has a row with this label.
    #[must_use]
    pub fn contains_row(&self, label: &str) -> bool {
        self.rows.contains_key(label)
    }

    /// Returns the cells of a row, most recent first.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&[Option<f64>]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    /// Returns the figure at `(label, column)`, if both exist and the cell is filled.
    #[must_use]
    pub fn value(&self, label: &str, column: usize) -> Option<f64> {
        self.row(label)
            .and_then(|cells| cells.get(column).copied())
            .flatten()
    }

    /// Returns the row labels in sorted order.
    pub fn row_labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_symbol_normalizes() {
        assert_eq!(Symbol::new("  aapl ").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft").to_string(), "MSFT");
        assert!(Symbol::new("   ").is_empty());
    }

    #[test]
    fn test_info_null_reads_as_missing() {
        let info: TickerInfo = serde_json::from_value(json!({
            "beta": null,
            "trailingPE": 28.5,
        }))
        .unwrap();

        assert!(info.get("beta").is_none());
        assert!(!info.contains("beta"));
        assert_eq!(info.display("beta", "N/A"), "N/A");
        assert_eq!(info.display("trailingPE", "N/A"), "28.5");
        assert_eq!(info.len(), 2);
    }

    #[test]
    fn test_info_coercion_and_truthiness() {
        let mut info = TickerInfo::new();
        info.insert("totalDebt", "1200");
        info.insert("debtToEquity", 0.0);
        info.insert("sector", "");
        info.insert("longName", "Apple Inc.");

        assert_eq!(info.get_f64("totalDebt"), Some(1200.0));
        assert_eq!(info.get_f64("longName"), None);
        assert!(info.is_truthy("totalDebt"));
        assert!(!info.is_truthy("debtToEquity"));
        assert!(!info.is_truthy("sector"));
        assert!(!info.is_truthy("missing"));
        assert_eq!(info.get_str("longName"), Some("Apple Inc."));
        assert_eq!(info.display("longName", "N/A"), "Apple Inc.");
    }

    #[test]
    fn test_statement_orders_columns_most_recent_first() {
        let mut table = StatementTable::new(vec![
            date(2022, 9, 30),
            date(2024, 9, 30),
            date(2023, 9, 30),
        ]);
        table.insert_row(
            "Total Debt",
            vec![
                (date(2022, 9, 30), 120.0),
                (date(2024, 9, 30), 100.0),
                (date(2023, 9, 30), f64::NAN),
            ],
        );

        assert_eq!(table.periods()[0], date(2024, 9, 30));
        assert_eq!(table.value("Total Debt", 0), Some(100.0));
        assert_eq!(table.value("Total Debt", 1), None);
        assert_eq!(table.value("Total Debt", 2), Some(120.0));
        assert_eq!(table.value("Total Debt", 3), None);
        assert_eq!(table.value("Long Term Debt", 0), None);
        assert!(table.contains_row("Total Debt"));
        assert_eq!(table.row_labels().collect::<Vec<_>>(), vec!["Total Debt"]);
    }
}
