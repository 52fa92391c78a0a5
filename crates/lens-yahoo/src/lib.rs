#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance data provider.
//!
//! This crate provides a Yahoo Finance data provider that implements the
//! [`PriceDataProvider`], [`ReferenceDataProvider`] and
//! [`FundamentalDataProvider`] traits from `lens-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use lens_yahoo::YahooProvider;
//! use lens_core::{HistoryPeriod, PriceDataProvider, ReferenceDataProvider, Symbol};
//!
//! # async fn example() -> lens_core::Result<()> {
//! let provider = YahooProvider::new()?;
//! let symbol = Symbol::new("AAPL");
//!
//! let history = provider.fetch_history(&symbol, HistoryPeriod::OneYear).await?;
//! let info = provider.fetch_info(&symbol).await?;
//! println!("{} rows, P/E {}", history.height(), info.display("trailingPE", "n/a"));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lens_core::{
    DataError, DataProvider, FundamentalDataProvider, HistoryPeriod, PriceDataProvider,
    ReferenceDataProvider, Result, StatementTable, Symbol, TickerInfo,
};
use polars::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::debug;

/// Yahoo Finance chart API base URL.
const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance quote summary API base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance fundamentals timeseries API base URL.
const TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Page whose response sets the session cookie the crumb is tied to.
const COOKIE_URL: &str = "https://fc.yahoo.com";

/// Hands out the crumb that the quote summary API requires.
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";

/// Quote summary modules merged into one [`TickerInfo`], in merge order.
const QUOTE_SUMMARY_MODULES: [&str; 5] = [
    "assetProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "price",
];

/// Balance sheet line items requested from the timeseries API.
const BALANCE_SHEET_ITEMS: [&str; 8] = [
    "TotalDebt",
    "LongTermDebt",
    "CurrentDebt",
    "NetDebt",
    "TotalAssets",
    "TotalLiabilitiesNetMinorityInterest",
    "StockholdersEquity",
    "CashAndCashEquivalents",
];

/// Earliest fiscal year requested from the timeseries API.
const FIRST_STATEMENT_YEAR: i32 = 2016;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent for HTTP requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Base URLs of the Yahoo Finance APIs used by [`YahooProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YahooEndpoints {
    /// Chart API, used for price history.
    pub chart: String,
    /// Quote summary API, used for the info snapshot.
    pub quote_summary: String,
    /// Fundamentals timeseries API, used for the balance sheet.
    pub timeseries: String,
    /// Page that sets the session cookie.
    pub cookie: String,
    /// Crumb endpoint for the session cookie.
    pub crumb: String,
}

impl YahooEndpoints {
    /// Endpoints rooted at another host, keeping Yahoo's paths.
    ///
    /// Used to point the provider at a mock server.
    #[must_use]
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            chart: format!("{base}/v8/finance/chart"),
            quote_summary: format!("{base}/v10/finance/quoteSummary"),
            timeseries: format!("{base}/ws/fundamentals-timeseries/v1/finance/timeseries"),
            cookie: format!("{base}/fc"),
            crumb: format!("{base}/v1/test/getcrumb"),
        }
    }
}

impl Default for YahooEndpoints {
    fn default() -> Self {
        Self {
            chart: CHART_API_URL.to_string(),
            quote_summary: QUOTE_SUMMARY_URL.to_string(),
            timeseries: TIMESERIES_URL.to_string(),
            cookie: COOKIE_URL.to_string(),
            crumb: CRUMB_URL.to_string(),
        }
    }
}

/// Yahoo Finance data provider.
///
/// Implements [`PriceDataProvider`], [`ReferenceDataProvider`] and
/// [`FundamentalDataProvider`].
///
/// The quote summary API only answers requests that carry a session cookie
/// and the matching crumb. Both are fetched on the first info request and
/// reused by every clone of the provider.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::Client,
    endpoints: YahooEndpoints,
    crumb: Arc<OnceCell<String>>,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Yahoo Finance provider with a custom user agent and timeout.
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// The client needs a cookie store for the crumb to be accepted.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoints: YahooEndpoints::default(),
            crumb: Arc::new(OnceCell::new()),
        }
    }

    /// Replace the API endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: YahooEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Build the chart API URL for a symbol and period.
    fn build_chart_url(&self, symbol: &Symbol, period: HistoryPeriod) -> String {
        format!(
            "{}/{}?range={}&interval=1d&includeAdjustedClose=true",
            self.endpoints.chart,
            symbol.as_str(),
            period.as_str()
        )
    }

    /// Build the quote summary API URL for a symbol.
    fn build_quote_summary_url(&self, symbol: &Symbol, crumb: &str) -> Result<String> {
        let base = format!("{}/{}", self.endpoints.quote_summary, symbol.as_str());
        let modules = QUOTE_SUMMARY_MODULES.join(",");

        reqwest::Url::parse_with_params(&base, [("modules", modules.as_str()), ("crumb", crumb)])
            .map(String::from)
            .map_err(|e| DataError::InvalidParameter(format!("Bad quote summary URL: {e}")))
    }

    /// The session crumb, fetched on first use.
    async fn crumb(&self) -> Result<&str> {
        self.crumb
            .get_or_try_init(|| self.fetch_crumb())
            .await
            .map(String::as_str)
    }

    /// Open a session and ask for its crumb.
    async fn fetch_crumb(&self) -> Result<String> {
        // The cookie page answers with an error status but still sets the cookie.
        if let Err(e) = self.client.get(&self.endpoints.cookie).send().await {
            debug!(error = %e, "Yahoo cookie request failed");
        }

        let response = self
            .client
            .get(&self.endpoints.crumb)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(DataError::Network(format!(
                "HTTP {} while fetching the Yahoo crumb",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;
        let crumb = body.trim();

        if crumb.is_empty() || crumb.contains(['<', ' ', '\n']) {
            return Err(DataError::Network("Yahoo returned no crumb".to_string()));
        }

        debug!("Obtained Yahoo crumb");
        Ok(crumb.to_string())
    }

    /// Build the timeseries API URL for the annual balance sheet items.
    fn build_timeseries_url(&self, symbol: &Symbol, now: DateTime<Utc>) -> String {
        let types = BALANCE_SHEET_ITEMS
            .iter()
            .map(|item| format!("annual{item}"))
            .collect::<Vec<_>>()
            .join(",");

        let start_ts = Utc
            .with_ymd_and_hms(FIRST_STATEMENT_YEAR, 12, 31, 0, 0, 0)
            .single()
            .map_or(0, |dt| dt.timestamp());

        format!(
            "{}/{}?symbol={}&type={}&merge=false&padTimeSeries=true&period1={}&period2={}",
            self.endpoints.timeseries,
            symbol.as_str(),
            symbol.as_str(),
            types,
            start_ts,
            now.timestamp()
        )
    }

    /// Make a GET request and parse the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &Symbol) -> Result<T> {
        debug!("Yahoo request: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(DataError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supported_periods(&self) -> &[HistoryPeriod] {
        &HistoryPeriod::ALL
    }
}

#[async_trait]
impl PriceDataProvider for YahooProvider {
    async fn fetch_history(&self, symbol: &Symbol, period: HistoryPeriod) -> Result<DataFrame> {
        if symbol.is_empty() {
            return Err(DataError::InvalidParameter("Empty symbol".to_string()));
        }

        let url = self.build_chart_url(symbol, period);
        let response: ChartResponse = self.get_json(&url, symbol).await?;

        if let Some(error) = response.chart.error {
            return Err(api_error(symbol, error));
        }

        parse_chart_response(symbol, period, response)
    }
}

#[async_trait]
impl ReferenceDataProvider for YahooProvider {
    async fn fetch_info(&self, symbol: &Symbol) -> Result<TickerInfo> {
        if symbol.is_empty() {
            return Err(DataError::InvalidParameter("Empty symbol".to_string()));
        }

        let crumb = self.crumb().await?;
        let url = self.build_quote_summary_url(symbol, crumb)?;
        let response: QuoteSummaryResponse = self.get_json(&url, symbol).await?;

        if let Some(error) = response.quote_summary.error {
            return Err(api_error(symbol, error));
        }

        let modules = response
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        let info = flatten_quote_summary(modules);
        debug!(symbol = %symbol, fields = info.len(), "Fetched ticker info");
        Ok(info)
    }
}

#[async_trait]
impl FundamentalDataProvider for YahooProvider {
    async fn fetch_balance_sheet(&self, symbol: &Symbol) -> Result<StatementTable> {
        if symbol.is_empty() {
            return Err(DataError::InvalidParameter("Empty symbol".to_string()));
        }

        let url = self.build_timeseries_url(symbol, Utc::now());
        let response: TimeseriesResponse = self.get_json(&url, symbol).await?;

        if let Some(error) = response.timeseries.error {
            return Err(api_error(symbol, error));
        }

        let table = parse_timeseries(response.timeseries.result.unwrap_or_default());
        debug!(
            symbol = %symbol,
            rows = table.row_labels().count(),
            periods = table.periods().len(),
            "Fetched balance sheet"
        );
        Ok(table)
    }
}

/// Map an API-level error object to a [`DataError`].
fn api_error(symbol: &Symbol, error: ApiError) -> DataError {
    if error.code == "Not Found" {
        return DataError::SymbolNotFound(symbol.to_string());
    }
    DataError::Other(format!("{}: {}", error.code, error.description))
}

/// Parse a chart response into a DataFrame.
fn parse_chart_response(
    symbol: &Symbol,
    period: HistoryPeriod,
    response: ChartResponse,
) -> Result<DataFrame> {
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();

    if timestamps.is_empty() {
        return Err(DataError::DataNotAvailable {
            symbol: symbol.to_string(),
            what: format!("price history for {period}"),
        });
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::Parse("Missing quote data".to_string()))?;

    let adj_close = result
        .indicators
        .adjclose
        .and_then(|ac| ac.into_iter().next())
        .map(|ac| ac.adjclose)
        .unwrap_or_default();

    // Days since the epoch, in UTC
    let dates: Vec<i32> = timestamps
        .iter()
        .map(|&ts| ts.div_euclid(86_400) as i32)
        .collect();

    let adj_closes = if adj_close.len() == dates.len() {
        adj_close
    } else {
        quote.close.clone()
    };

    let date_col = Column::new("date".into(), dates)
        .cast(&DataType::Date)
        .map_err(|e| DataError::Other(e.to_string()))?;

    DataFrame::new(vec![
        date_col,
        Column::new("open".into(), quote.open),
        Column::new("high".into(), quote.high),
        Column::new("low".into(), quote.low),
        Column::new("close".into(), quote.close),
        Column::new("volume".into(), quote.volume),
        Column::new("adjusted_close".into(), adj_closes),
    ])
    .map_err(|e| DataError::Parse(e.to_string()))
}

/// Merge the quote summary modules into one flat info mapping.
///
/// `{raw, fmt}` objects are reduced to their raw value, empty objects are
/// dropped, and later modules win on key collisions.
fn flatten_quote_summary(mut modules: Map<String, Value>) -> TickerInfo {
    let mut info = TickerInfo::new();
    for module in QUOTE_SUMMARY_MODULES {
        let Some(Value::Object(fields)) = modules.remove(module) else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            if let Some(value) = unwrap_field(value) {
                info.insert(key, value);
            }
        }
    }
    info
}

fn unwrap_field(value: Value) -> Option<Value> {
    match value {
        Value::Object(obj) if obj.is_empty() => None,
        Value::Object(mut obj) => match obj.remove("raw") {
            Some(raw) => Some(raw),
            None => Some(obj.remove("fmt").unwrap_or(Value::Object(obj))),
        },
        other => Some(other),
    }
}

/// Build a statement table from the timeseries series, one row per line item.
fn parse_timeseries(series: Vec<TimeseriesSeries>) -> StatementTable {
    let mut rows: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();

    for mut s in series {
        let Some(kind) = s.meta.kind.first() else {
            continue;
        };
        let Some(Value::Array(points)) = s.values.remove(kind) else {
            continue;
        };

        let cells: Vec<(NaiveDate, f64)> = points
            .into_iter()
            .filter(|p| !p.is_null())
            .filter_map(|p| serde_json::from_value::<TimeseriesPoint>(p).ok())
            .filter_map(|p| {
                let date = NaiveDate::parse_from_str(&p.as_of_date, "%Y-%m-%d").ok()?;
                let value = p.reported_value?.raw?;
                Some((date, value))
            })
            .collect();

        if cells.is_empty() {
            continue;
        }

        let item = kind.strip_prefix("annual").unwrap_or(kind.as_str());
        rows.push((line_item_label(item), cells));
    }

    let periods = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().map(|(date, _)| *date))
        .collect();

    let mut table = StatementTable::new(periods);
    for (label, cells) in rows {
        table.insert_row(label, cells);
    }
    table
}

/// Turn a camel-case line item name into a title: `TotalDebt` → `Total Debt`.
fn line_item_label(item: &str) -> String {
    let mut label = String::with_capacity(item.len() + 4);
    let mut prev: Option<char> = None;
    for c in item.chars() {
        let after_word = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
        if c.is_ascii_uppercase() && after_word {
            label.push(' ');
        }
        label.push(c);
        prev = Some(c);
    }
    label
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

/// Chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

/// Quote Summary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<ApiError>,
}

/// Fundamentals timeseries API response.
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesResult,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    result: Option<Vec<TimeseriesSeries>>,
    error: Option<ApiError>,
}

/// One line item; the points live under a key named after `meta.type[0]`.
#[derive(Debug, Deserialize)]
struct TimeseriesSeries {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    kind: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeseriesPoint {
    as_of_date: String,
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: Option<f64>,
}
