#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Ticker analysis for tickerlens.
//!
//! This crate re-exports the core types and the provider implementations,
//! and provides a [`TickerAnalyzer`] that turns a provider's raw data into
//! the profile, fundamentals and debt comparison sections.
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance provider for prices, info and statements
//!
//! # Example
//!
//! ```rust,ignore
//! use lens::{HistoryPeriod, Symbol, TickerAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> lens::Result<()> {
//!     let analyzer = TickerAnalyzer::yahoo()?;
//!     let symbol = Symbol::new("AAPL");
//!
//!     let snapshot = analyzer.fetch_ticker_data(&symbol, HistoryPeriod::OneYear).await?;
//!     println!("{}", snapshot.history.tail(Some(5)));
//!
//!     let debt = analyzer.fetch_debt_comparison(&symbol).await;
//!     for (label, entry) in debt.iter() {
//!         println!("{label}: {}", entry.as_value().unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use lens_core::*;

// Providers
#[cfg(feature = "yahoo")]
pub use lens_yahoo::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, YahooEndpoints, YahooProvider};

mod analyzer;
pub use analyzer::{TickerAnalyzer, TickerSnapshot};

pub mod debt;
pub use debt::{DebtChange, DebtSnapshot, build_debt_comparison, calculate_debt_change};

pub mod fundamentals;
pub use fundamentals::build_fundamentals;

pub mod profile;
pub use profile::build_profile;
