//! Constants for the crypto predictor dashboard
//!
//! Defaults for everything tunable live here. `DashboardConfig` starts from
//! these values and only the handful of environment overrides documented in
//! `config.rs` can change them at runtime.

/// How often the dashboard refetches market data (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 120;

/// How long a notification stays visible before it expires (in milliseconds)
pub const NOTIFICATION_TTL_MS: u64 = 5000;

/// HTTP request timeout when fetching markets (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of coins requested per fetch (one page, market cap descending)
pub const MARKETS_PAGE_SIZE: u32 = 12;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for market listings
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-predictor/0.1.0";

/// Momentum multiplier applied when the 24h change is positive
pub const BULLISH_MOMENTUM: f64 = 1.1;

/// Momentum multiplier applied when the 24h change is flat or negative
pub const BEARISH_MOMENTUM: f64 = 0.9;

/// Message shown whenever a refresh fails, whatever the cause
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load cryptocurrency data";

/// Storage key for the favorite symbol list
pub const FAVORITES_KEY: &str = "cryptoFavorites";

/// Storage key for the preferred currency
pub const CURRENCY_KEY: &str = "preferredCurrency";

/// Storage key for pending price alerts
pub const ALERTS_KEY: &str = "priceAlerts";

/// Capacity of the dashboard event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
