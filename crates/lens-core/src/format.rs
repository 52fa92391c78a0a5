//! Human-readable rendering of large figures.
//!
//! Figures are shortened with a `B`/`M`/`K` suffix and one decimal place;
//! smaller ones keep two decimals. Anything that is missing or cannot be read
//! as a number renders as [`UNAVAILABLE`].
//!
//! The thresholds compare the signed value, so negative figures never get a
//! suffix: `-5000.0` renders as `"-5000.00"`.

use serde_json::Value;

/// Text shown in place of a missing or non-numeric figure.
pub const UNAVAILABLE: &str = "unavailable";

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Formats a number with a magnitude suffix.
///
/// ```
/// use lens_core::format::format_large_number;
///
/// assert_eq!(format_large_number(1_500_000_000.0), "1.5B");
/// assert_eq!(format_large_number(2_500.0), "2.5K");
/// assert_eq!(format_large_number(999.0), "999.00");
/// ```
#[must_use]
pub fn format_large_number(value: f64) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }
    match value {
        v if v >= BILLION => format!("{:.1}B", v / BILLION),
        v if v >= MILLION => format!("{:.1}M", v / MILLION),
        v if v >= THOUSAND => format!("{:.1}K", v / THOUSAND),
        v => format!("{v:.2}"),
    }
}

/// Formats an optional number, using [`UNAVAILABLE`] for `None`.
#[must_use]
pub fn format_magnitude(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), format_large_number)
}

/// Formats an optional vendor value, coercing it to a number first.
#[must_use]
pub fn format_value(value: Option<&Value>) -> String {
    format_magnitude(value.and_then(coerce_f64))
}

/// Reads a vendor value as a finite number.
///
/// Numbers and numeric strings are accepted (surrounding whitespace is
/// ignored), booleans read as `1` or `0`. Everything else, including NaN and
/// infinities, yields `None`.
#[must_use]
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;
    n.is_finite().then_some(n)
}
