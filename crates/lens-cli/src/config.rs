//! Runtime settings read from the environment.

use std::{fmt::Display, str::FromStr, time::Duration};

use lens::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HistoryPeriod};
use tracing::warn;

const DEFAULT_PERIOD: &str = "TICKERLENS_DEFAULT_PERIOD";
const HISTORY_ROWS: &str = "TICKERLENS_HISTORY_ROWS";
const HTTP_TIMEOUT_SECS: &str = "TICKERLENS_HTTP_TIMEOUT_SECS";
const USER_AGENT: &str = "TICKERLENS_USER_AGENT";
const LOG_FORMAT: &str = "TICKERLENS_LOG_FORMAT";

/// How log lines are written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Reads `TICKERLENS_LOG_FORMAT`. Logging is not up yet, so a bad value
    /// silently falls back to text.
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup(LOG_FORMAT)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected text or json")),
        }
    }
}

/// Settings for one run of the tool.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AppConfig {
    /// Period used when the prompt is left empty.
    pub(crate) default_period: HistoryPeriod,
    /// Rows of price history printed.
    pub(crate) history_rows: usize,
    pub(crate) http_timeout: Duration,
    pub(crate) user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_period: HistoryPeriod::default(),
            history_rows: 5,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the settings from the process environment.
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Reads the settings through `lookup`.
    ///
    /// Unset or blank variables keep their default; values that do not parse
    /// are logged and replaced by the default.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            default_period: parse_or(
                lookup(DEFAULT_PERIOD),
                DEFAULT_PERIOD,
                defaults.default_period,
            ),
            history_rows: parse_or(lookup(HISTORY_ROWS), HISTORY_ROWS, defaults.history_rows),
            http_timeout: Duration::from_secs(parse_or(
                lookup(HTTP_TIMEOUT_SECS),
                HTTP_TIMEOUT_SECS,
                DEFAULT_TIMEOUT_SECS,
            )),
            user_agent: lookup(USER_AGENT).unwrap_or(defaults.user_agent),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!(variable = key, value = %raw, error = %e, fallback = %default, "Invalid setting");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars = env(vars);
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_period, HistoryPeriod::OneYear);
        assert_eq!(config.history_rows, 5);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (DEFAULT_PERIOD, "6mo"),
            (HISTORY_ROWS, "10"),
            (HTTP_TIMEOUT_SECS, " 5 "),
            (USER_AGENT, "tickerlens-test/1.0"),
        ]);

        assert_eq!(config.default_period, HistoryPeriod::SixMonths);
        assert_eq!(config.history_rows, 10);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tickerlens-test/1.0");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            (DEFAULT_PERIOD, "fortnight"),
            (HISTORY_ROWS, "-3"),
            (HTTP_TIMEOUT_SECS, "soon"),
        ]);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[(USER_AGENT, "   "), (DEFAULT_PERIOD, "")]);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.default_period, HistoryPeriod::OneYear);
    }

    #[test]
    fn test_log_format() {
        let format = |value: &str| {
            let vars = env(&[(LOG_FORMAT, value)]);
            LogFormat::from_lookup(|key| vars.get(key).cloned())
        };

        assert_eq!(format("json"), LogFormat::Json);
        assert_eq!(format(" JSON "), LogFormat::Json);
        assert_eq!(format("text"), LogFormat::Text);
        assert_eq!(format("xml"), LogFormat::Text);
        assert_eq!(LogFormat::from_lookup(|_| None), LogFormat::Text);
    }
}
