//! `tickerlens`: prints the profile, recent prices, fundamentals and debt
//! comparison of a stock ticker.

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use lens::{HistoryPeriod, Symbol, TickerAnalyzer, YahooProvider, build_profile};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{AppConfig, LogFormat};

/// Fundamental and debt analysis of a stock ticker.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol, e.g. AAPL (prompted for when omitted)
    ticker: Option<String>,

    /// History period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd or max
    /// (prompted for when omitted)
    period: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let args = Args::parse();
    let config = AppConfig::from_env();

    if let Err(e) = run(args, &config).await {
        error!(error = %e, "tickerlens failed");
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(args: Args, config: &AppConfig) -> Result<()> {
    let provider = YahooProvider::with_settings(&config.user_agent, config.http_timeout)
        .context("building the Yahoo Finance client")?;
    let analyzer = TickerAnalyzer::new(Arc::new(provider));

    let stdin = io::stdin();
    let stdout = io::stdout();
    report(&analyzer, args, config, &mut stdin.lock(), &mut stdout.lock()).await
}

/// Asks for whatever `args` leaves out, then writes the report sections to
/// `out`. A bad period or a failed fetch prints [`render::NO_DATA`] instead.
async fn report(
    analyzer: &TickerAnalyzer,
    args: Args,
    config: &AppConfig,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "=== Ticker Analysis ===")?;
    let ticker = match args.ticker {
        Some(ticker) => ticker,
        None => prompt(input, out, "Enter the company ticker (e.g., AAPL): ")?,
    };
    let period = match args.period {
        Some(period) => period,
        None => prompt(
            input,
            out,
            &format!("Enter the analysis period (default: {}): ", config.default_period),
        )?,
    };

    let symbol = Symbol::new(ticker);
    writeln!(out, "Fetching data for {symbol}...")?;

    let Some(period) = resolve_period(&period, config.default_period) else {
        writeln!(out, "{}", render::NO_DATA)?;
        return Ok(());
    };

    let Ok(snapshot) = analyzer.fetch_ticker_data(&symbol, period).await else {
        writeln!(out, "{}", render::NO_DATA)?;
        return Ok(());
    };

    render::write_section(out, "Ticker Information", &build_profile(&snapshot.info))?;
    render::write_history(out, &snapshot.history, config.history_rows)?;

    let fundamentals = analyzer.fetch_fundamental_data(&symbol).await;
    render::write_section(out, "Fundamental Analysis", &fundamentals)?;

    let debt = analyzer.fetch_debt_comparison(&symbol).await;
    render::write_section(out, "Debt Comparison", &debt)?;

    out.flush()?;
    Ok(())
}

/// Prints `message` and reads one trimmed line of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, message: &str) -> Result<String> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("reading from stdin")?;
    Ok(line.trim().to_string())
}

/// Parses the period typed by the user, using `default` for empty input.
fn resolve_period(input: &str, default: HistoryPeriod) -> Option<HistoryPeriod> {
    if input.trim().is_empty() {
        return Some(default);
    }
    input
        .parse::<HistoryPeriod>()
        .inspect_err(|e| warn!(period = input, error = %e, "Unsupported period"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lens::{
        DataError, DataProvider, FundamentalDataProvider, PriceDataProvider,
        ReferenceDataProvider, StatementTable, TickerInfo,
    };
    use polars::prelude::{Column, DataFrame};

    /// Serves a fixed ticker, or fails every request when `fail` is set.
    #[derive(Debug)]
    struct MockProvider {
        fail: bool,
    }

    impl MockProvider {
        fn check(&self) -> lens::Result<()> {
            if self.fail {
                Err(DataError::Network("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl DataProvider for MockProvider {
        fn name(&self) -> &str {
            "Mock"
        }

        fn supported_periods(&self) -> &[HistoryPeriod] {
            &HistoryPeriod::ALL
        }
    }

    #[async_trait]
    impl PriceDataProvider for MockProvider {
        async fn fetch_history(&self, _: &Symbol, _: HistoryPeriod) -> lens::Result<DataFrame> {
            self.check()?;
            DataFrame::new(vec![Column::new("close".into(), [189.5, 191.25, 190.0])])
                .map_err(|e| DataError::Other(e.to_string()))
        }
    }

    #[async_trait]
    impl ReferenceDataProvider for MockProvider {
        async fn fetch_info(&self, symbol: &Symbol) -> lens::Result<TickerInfo> {
            self.check()?;
            let mut info = TickerInfo::new();
            info.insert("symbol", symbol.as_str());
            info.insert("longName", "Apple Inc.");
            info.insert("trailingPE", 28.5);
            Ok(info)
        }
    }

    #[async_trait]
    impl FundamentalDataProvider for MockProvider {
        async fn fetch_balance_sheet(&self, _: &Symbol) -> lens::Result<StatementTable> {
            self.check()?;
            Ok(StatementTable::default())
        }
    }

    async fn report_text(fail: bool, args: &[&str], stdin: &str) -> String {
        let analyzer = TickerAnalyzer::new(Arc::new(MockProvider { fail }));
        let args = Args::try_parse_from(args).unwrap();
        let mut input = io::Cursor::new(stdin.to_string());
        let mut out = Vec::new();

        report(&analyzer, args, &AppConfig::default(), &mut input, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn position(text: &str, needle: &str) -> usize {
        text.find(needle)
            .unwrap_or_else(|| panic!("{needle:?} missing from:\n{text}"))
    }

    #[tokio::test]
    async fn test_report_sections_in_order() {
        let text = report_text(false, &["tickerlens", "aapl", "5d"], "").await;

        let sections = [
            "=== Ticker Information ===",
            "=== Latest Historical Data ===",
            "=== Fundamental Analysis ===",
            "=== Debt Comparison ===",
        ];
        let offsets: Vec<usize> = sections.iter().map(|s| position(&text, s)).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{text}");
        assert!(text.contains("Fetching data for AAPL..."));
        assert!(text.contains("Apple Inc."));
        assert!(!text.contains(render::NO_DATA));
    }

    #[tokio::test]
    async fn test_report_prompts_for_missing_arguments() {
        let text = report_text(false, &["tickerlens"], " msft \n\n").await;

        assert!(text.contains("Enter the company ticker (e.g., AAPL): "));
        assert!(text.contains("Enter the analysis period (default: 1y): "));
        assert!(text.contains("Fetching data for MSFT..."));
        assert!(text.contains("=== Debt Comparison ==="));
    }

    #[tokio::test]
    async fn test_report_failed_fetch_prints_no_data() {
        let text = report_text(true, &["tickerlens", "aapl", "1y"], "").await;

        assert!(text.contains(render::NO_DATA));
        assert!(!text.contains("=== Ticker Information ==="));
    }

    #[tokio::test]
    async fn test_report_bad_period_prints_no_data() {
        let text = report_text(false, &["tickerlens", "aapl", "fortnight"], "").await;

        assert!(text.trim_end().ends_with(render::NO_DATA));
        assert!(!text.contains("=== Ticker Information ==="));
    }

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let mut input = io::Cursor::new("  msft \nignored\n");
        let mut out = Vec::new();

        let answer = prompt(&mut input, &mut out, "Ticker: ").unwrap();

        assert_eq!(answer, "msft");
        assert_eq!(String::from_utf8(out).unwrap(), "Ticker: ");
    }

    #[test]
    fn test_prompt_at_end_of_input() {
        let mut input = io::Cursor::new("");
        let answer = prompt(&mut input, &mut Vec::<u8>::new(), "Period: ").unwrap();
        assert!(answer.is_empty());
    }

    #[test]
    fn test_resolve_period() {
        assert_eq!(
            resolve_period("", HistoryPeriod::OneYear),
            Some(HistoryPeriod::OneYear)
        );
        assert_eq!(
            resolve_period("   ", HistoryPeriod::SixMonths),
            Some(HistoryPeriod::SixMonths)
        );
        assert_eq!(
            resolve_period("5D", HistoryPeriod::OneYear),
            Some(HistoryPeriod::FiveDays)
        );
        assert_eq!(resolve_period("fortnight", HistoryPeriod::OneYear), None);
    }

    #[test]
    fn test_args_are_optional() {
        let args = Args::try_parse_from(["tickerlens"]).unwrap();
        assert!(args.ticker.is_none() && args.period.is_none());

        let args = Args::try_parse_from(["tickerlens", "aapl", "6mo"]).unwrap();
        assert_eq!(args.ticker.as_deref(), Some("aapl"));
        assert_eq!(args.period.as_deref(), Some("6mo"));
    }
}
