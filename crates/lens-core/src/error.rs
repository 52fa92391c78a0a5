//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers the failures that can occur
//! when fetching or interpreting vendor data for a ticker.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, timeouts, HTTP errors).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit reported by a provider. Requests are never retried.
    #[error("Rate limited by {provider}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider answered but had nothing for the symbol.
    #[error("Data not available for {symbol}: {what}")]
    DataNotAvailable {
        /// The symbol that was requested.
        symbol: String,
        /// The kind of data that was missing.
        what: String,
    },

    /// Error parsing or coercing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
