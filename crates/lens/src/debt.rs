//! Year-over-year debt comparison.
//!
//! Reads the two most recent columns of the balance sheet for total and
//! long-term debt and describes how each moved.

use std::fmt;

use lens_core::{MetricMap, StatementTable, format_large_number};

/// Balance sheet row holding total debt.
pub const TOTAL_DEBT_ROW: &str = "Total Debt";
/// Balance sheet row holding long-term debt.
pub const LONG_TERM_DEBT_ROW: &str = "Long Term Debt";

/// Direction and size of a change between two figures.
#[derive(Clone, Debug, PartialEq)]
pub enum DebtChange {
    /// The current figure is higher, by this amount.
    Increase(f64),
    /// The current figure is lower, by this (positive) amount.
    Decrease(f64),
    /// Both figures are equal.
    NoChange,
    /// The difference could not be computed.
    Failed(String),
}

impl fmt::Display for DebtChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase(amount) => write!(f, "Increase of {}", format_large_number(*amount)),
            Self::Decrease(amount) => write!(f, "Decrease of {}", format_large_number(*amount)),
            Self::NoChange => f.write_str("No change"),
            Self::Failed(reason) => write!(f, "Calculation error: {reason}"),
        }
    }
}

/// Describes the change from `prior` to `current`.
///
/// ```
/// use lens::debt::calculate_debt_change;
///
/// assert_eq!(calculate_debt_change(100.0, 150.0).to_string(), "Increase of 50.00");
/// assert_eq!(calculate_debt_change(150.0, 100.0).to_string(), "Decrease of 50.00");
/// assert_eq!(calculate_debt_change(100.0, 100.0).to_string(), "No change");
/// ```
#[must_use]
pub fn calculate_debt_change(prior: f64, current: f64) -> DebtChange {
    let delta = current - prior;
    if !delta.is_finite() {
        return DebtChange::Failed(format!(
            "difference between {prior} and {current} is not a number"
        ));
    }
    if delta > 0.0 {
        DebtChange::Increase(delta)
    } else if delta < 0.0 {
        DebtChange::Decrease(-delta)
    } else {
        DebtChange::NoChange
    }
}

/// A debt figure for the prior and the current period.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DebtSnapshot {
    /// Figure for the prior period (column 1).
    pub prior: Option<f64>,
    /// Figure for the current period (column 0).
    pub current: Option<f64>,
}

impl DebtSnapshot {
    /// Creates a snapshot from two optional figures.
    #[must_use]
    pub const fn new(prior: Option<f64>, current: Option<f64>) -> Self {
        Self { prior, current }
    }

    /// Reads the two most recent columns of a statement row.
    ///
    /// A missing row or column leaves the corresponding side empty.
    #[must_use]
    pub fn from_statement(statement: &StatementTable, row: &str) -> Self {
        Self {
            prior: statement.value(row, 1),
            current: statement.value(row, 0),
        }
    }

    /// Returns both figures if they are present and non-zero.
    #[must_use]
    pub fn pair(&self) -> Option<(f64, f64)> {
        let usable = |v: Option<f64>| v.filter(|v| *v != 0.0 && v.is_finite());
        Some((usable(self.prior)?, usable(self.current)?))
    }

    /// Returns the change from prior to current, if both figures are usable.
    #[must_use]
    pub fn change(&self) -> Option<DebtChange> {
        self.pair()
            .map(|(prior, current)| calculate_debt_change(prior, current))
    }
}

/// Builds the debt comparison section from an annual balance sheet.
///
/// Emits up to six entries; a debt line whose two latest figures are not
/// both available is left out.
#[must_use]
pub fn build_debt_comparison(balance_sheet: &StatementTable) -> MetricMap {
    let mut comparison = MetricMap::new();

    let total = DebtSnapshot::from_statement(balance_sheet, TOTAL_DEBT_ROW);
    if let Some((prior, current)) = total.pair() {
        comparison.insert("Total Debt Last Year", format_large_number(prior));
        comparison.insert("Total Debt This Year", format_large_number(current));
        comparison.insert(
            "Debt Change",
            calculate_debt_change(prior, current).to_string(),
        );
    }

    let long_term = DebtSnapshot::from_statement(balance_sheet, LONG_TERM_DEBT_ROW);
    if let Some((prior, current)) = long_term.pair() {
        comparison.insert("Long Term Debt Last Year", format_large_number(prior));
        comparison.insert("Long Term Debt This Year", format_large_number(current));
        comparison.insert(
            "Long Term Debt Change",
            calculate_debt_change(prior, current).to_string(),
        );
    }

    comparison
}
