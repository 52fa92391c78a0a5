//! Provider traits for fetching ticker data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`PriceDataProvider`] - Historical price series
//! - [`ReferenceDataProvider`] - The vendor's key-value info snapshot
//! - [`FundamentalDataProvider`] - Financial statements
//! - [`TickerProvider`] - Everything above, as one trait object

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{
    error::Result,
    period::HistoryPeriod,
    types::{StatementTable, Symbol, TickerInfo},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns the history periods supported by this provider.
    fn supported_periods(&self) -> &[HistoryPeriod];
}

/// Provider for historical prices.
#[async_trait]
pub trait PriceDataProvider: DataProvider {
    /// Fetches daily bars covering `period`, oldest first.
    ///
    /// Returns a DataFrame with columns: date, open, high, low, close,
    /// volume, adjusted_close.
    async fn fetch_history(&self, symbol: &Symbol, period: HistoryPeriod) -> Result<DataFrame>;
}

/// Provider for the vendor's info snapshot of a ticker.
#[async_trait]
pub trait ReferenceDataProvider: DataProvider {
    /// Fetches the flattened key-value info for a symbol.
    ///
    /// Keys follow the vendor's naming; fields the vendor has nothing for
    /// are simply absent.
    async fn fetch_info(&self, symbol: &Symbol) -> Result<TickerInfo>;
}

/// Provider for financial statements.
#[async_trait]
pub trait FundamentalDataProvider: DataProvider {
    /// Fetches the annual balance sheet for a symbol.
    ///
    /// Row labels are the vendor's line items in title case ("Total Debt",
    /// "Long Term Debt"); columns are fiscal year ends, most recent first.
    async fn fetch_balance_sheet(&self, symbol: &Symbol) -> Result<StatementTable>;
}

/// A provider that covers prices, info and statements.
///
/// Implemented automatically for every type implementing the three
/// capability traits.
pub trait TickerProvider:
    PriceDataProvider + ReferenceDataProvider + FundamentalDataProvider
{
}

impl<T> TickerProvider for T where
    T: PriceDataProvider + ReferenceDataProvider + FundamentalDataProvider
{
}
