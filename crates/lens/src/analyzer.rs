//! Ticker analysis over a data provider.

use std::sync::Arc;

use polars::prelude::DataFrame;
use tracing::{debug, error, warn};

use lens_core::{
    DataError, HistoryPeriod, MetricMap, Result, Symbol, TickerInfo, TickerProvider,
};

use crate::{debt::build_debt_comparison, fundamentals::build_fundamentals};

/// Price history and info snapshot fetched for one ticker.
#[derive(Debug, Clone)]
pub struct TickerSnapshot {
    /// Daily bars over the requested period, oldest first.
    pub history: DataFrame,
    /// The vendor's info snapshot.
    pub info: TickerInfo,
}

/// Runs the ticker analyses against a single provider.
///
/// The `try_*` methods return the underlying error. Their counterparts log
/// the failure and hand back an empty mapping instead.
///
/// # Example
///
/// ```rust,ignore
/// use lens::{Symbol, TickerAnalyzer};
///
/// let analyzer = TickerAnalyzer::yahoo()?;
/// let fundamentals = analyzer.fetch_fundamental_data(&Symbol::new("AAPL")).await;
/// ```
#[derive(Clone)]
pub struct TickerAnalyzer {
    provider: Arc<dyn TickerProvider>,
}

impl std::fmt::Debug for TickerAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerAnalyzer")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl TickerAnalyzer {
    /// Creates an analyzer backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn TickerProvider>) -> Self {
        debug!(provider = provider.name(), "Using provider");
        Self { provider }
    }

    /// Creates an analyzer backed by Yahoo Finance with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[cfg(feature = "yahoo")]
    pub fn yahoo() -> Result<Self> {
        Ok(Self::new(Arc::new(lens_yahoo::YahooProvider::new()?)))
    }

    /// Returns the provider's name.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetches the price history over `period` and the info snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidParameter`] if the provider does not serve
    /// `period`, otherwise the first failure of either fetch.
    pub async fn fetch_ticker_data(
        &self,
        symbol: &Symbol,
        period: HistoryPeriod,
    ) -> Result<TickerSnapshot> {
        if !self.provider.supported_periods().contains(&period) {
            warn!(provider = self.provider.name(), period = %period, "Unsupported period");
            return Err(DataError::InvalidParameter(format!(
                "{} does not serve a {period} history",
                self.provider.name()
            )));
        }

        let history = self
            .provider
            .fetch_history(symbol, period)
            .await
            .inspect_err(|e| {
                warn!(
                    symbol = %symbol,
                    period = %period,
                    error = %e,
                    "Failed to fetch price history"
                );
            })?;
        let info = self.provider.fetch_info(symbol).await.inspect_err(|e| {
            warn!(symbol = %symbol, error = %e, "Failed to fetch ticker info");
        })?;

        Ok(TickerSnapshot { history, info })
    }

    /// Fetches the info snapshot and builds the fundamentals section.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or a computed field is not numeric.
    pub async fn try_fetch_fundamental_data(&self, symbol: &Symbol) -> Result<MetricMap> {
        let info = self.provider.fetch_info(symbol).await?;
        build_fundamentals(&info)
    }

    /// Like [`try_fetch_fundamental_data`](Self::try_fetch_fundamental_data),
    /// but logs any failure and returns an empty mapping.
    pub async fn fetch_fundamental_data(&self, symbol: &Symbol) -> MetricMap {
        self.try_fetch_fundamental_data(symbol)
            .await
            .unwrap_or_else(|e| {
                error!(symbol = %symbol, error = %e, "Error fetching fundamental data");
                MetricMap::new()
            })
    }

    /// Fetches the annual balance sheet and builds the debt comparison.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance sheet cannot be fetched.
    pub async fn try_fetch_debt_comparison(&self, symbol: &Symbol) -> Result<MetricMap> {
        let balance_sheet = self.provider.fetch_balance_sheet(symbol).await?;
        debug!(
            symbol = %symbol,
            periods = balance_sheet.periods().len(),
            "Fetched balance sheet"
        );
        Ok(build_debt_comparison(&balance_sheet))
    }

    /// Like [`try_fetch_debt_comparison`](Self::try_fetch_debt_comparison),
    /// but logs any failure and returns an empty mapping.
    pub async fn fetch_debt_comparison(&self, symbol: &Symbol) -> MetricMap {
        self.try_fetch_debt_comparison(symbol)
            .await
            .unwrap_or_else(|e| {
                error!(symbol = %symbol, error = %e, "Error fetching debt comparison");
                MetricMap::new()
            })
    }
}
