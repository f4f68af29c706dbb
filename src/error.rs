//! Error types for the crypto predictor

use crate::constants::FETCH_FAILED_MESSAGE;
use thiserror::Error;

/// Errors that can occur when fetching market data from a provider
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Creates a Status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// The message shown to the user.
    ///
    /// Every failure collapses to the same generic text; the detail only
    /// goes to the logs.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

/// Errors raised by a key-value store backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors returned by dashboard operations
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Currency code is not in the built-in catalog
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Alert target is not a positive finite number
    #[error("Invalid target price: {0}")]
    InvalidTargetPrice(f64),

    /// Market data refresh failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Preference storage could not be opened
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DashboardError {
    /// Creates an UnknownCurrency error
    pub fn unknown_currency(code: &str) -> Self {
        Self::UnknownCurrency(code.to_string())
    }
}
