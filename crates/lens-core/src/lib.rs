#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for tickerlens.
//!
//! This crate provides the foundational abstractions for working with ticker data:
//!
//! - [`PriceDataProvider`](provider::PriceDataProvider) - Historical prices
//! - [`ReferenceDataProvider`](provider::ReferenceDataProvider) - Vendor info snapshot
//! - [`FundamentalDataProvider`](provider::FundamentalDataProvider) - Financial statements
//! - [`format`] - Magnitude formatting of large figures
//! - [`exchange`] - Exchange code names

/// Error types for data operations.
pub mod error;
/// Exchange code lookup.
pub mod exchange;
/// Magnitude formatting.
pub mod format;
/// Ordered metric mappings.
pub mod metrics;
/// History period definitions.
pub mod period;
/// Provider traits for fetching ticker data.
pub mod provider;
/// Core data types (Symbol, TickerInfo, StatementTable).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use exchange::exchange_name;
pub use format::{UNAVAILABLE, format_large_number, format_magnitude, format_value};
pub use metrics::{MetricEntry, MetricMap};
pub use period::HistoryPeriod;
pub use provider::{
    DataProvider, FundamentalDataProvider, PriceDataProvider, ReferenceDataProvider,
    TickerProvider,
};
pub use types::{StatementTable, Symbol, TickerInfo};
