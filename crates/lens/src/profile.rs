//! Company profile section.

use lens_core::{MetricMap, TickerInfo, exchange_name};

/// Text shown for a profile field the vendor did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Builds the company profile from a ticker's info snapshot.
///
/// Yields, in order: Symbol (prefixed with `$`), Name, Exchange, Sector,
/// Industry, Country and Currency. Known exchange codes are spelled out.
#[must_use]
pub fn build_profile(info: &TickerInfo) -> MetricMap {
    let mut profile = MetricMap::new();

    profile.insert("Symbol", format!("${}", info.display("symbol", NOT_AVAILABLE)));
    profile.insert("Name", info.display("longName", NOT_AVAILABLE));

    let exchange = match info.get_str("exchange") {
        Some(code) => exchange_name(code).to_string(),
        None => info.display("exchange", NOT_AVAILABLE),
    };
    profile.insert("Exchange", exchange);

    for (label, key) in [
        ("Sector", "sector"),
        ("Industry", "industry"),
        ("Country", "country"),
        ("Currency", "currency"),
    ] {
        profile.insert(label, info.display(key, NOT_AVAILABLE));
    }

    profile
}
