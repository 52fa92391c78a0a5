//! History period definitions.
//!
//! This module defines [`HistoryPeriod`], the look-back window used when
//! fetching a ticker's price history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Look-back window for historical price data.
///
/// The string forms match the range vocabulary Yahoo Finance accepts
/// (`1d`, `5d`, `1mo`, ..., `ytd`, `max`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPeriod {
    /// One trading day.
    OneDay,
    /// Five trading days.
    FiveDays,
    /// One month.
    OneMonth,
    /// Three months.
    ThreeMonths,
    /// Six months.
    SixMonths,
    /// One year.
    #[default]
    OneYear,
    /// Two years.
    TwoYears,
    /// Five years.
    FiveYears,
    /// Ten years.
    TenYears,
    /// Since the start of the calendar year.
    YearToDate,
    /// Everything the provider has.
    Max,
}

impl HistoryPeriod {
    /// All periods, shortest first.
    pub const ALL: [Self; 11] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    /// Returns the vendor string for this period.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                DataError::InvalidParameter(format!(
                    "Unknown period: {s:?}. Supported: {}",
                    Self::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}
