//! # Crypto Predictor
//!
//! Dashboard core for tracking the top cryptocurrencies by market cap, with a
//! naive momentum-based price prediction for each one.
//!
//! ## This is NOT a forecasting library
//!
//! The "prediction" is the last 24h move extrapolated once more, scaled by a
//! fixed momentum multiplier (1.1 when rising, 0.9 otherwise). It exists to
//! give a dashboard something to show, not to trade on.
//!
//! ## Usage
//!
//! ```no_run
//! use crypto_predictor::{Dashboard, DashboardConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::from_config(DashboardConfig::from_env())?;
//! dashboard.start();
//!
//! dashboard.set_search_term("eth").await;
//! dashboard.add_alert("ETH", 4000.0).await?;
//!
//! let mut events = dashboard.subscribe();
//! while let Ok(event) = events.recv().await {
//!     println!("{}", event);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Dashboard::start()
//!     ↓
//! Refresh task (every 120s, generation-tagged)
//!     ↓
//! MarketDataProvider (CoinGecko /coins/markets)
//!     ↓
//! DashboardState.coins ──→ filtered_coins() (search + favorites)
//!     ↓
//! Alert evaluation ──→ NotificationQueue (5s expiry)
//!     ↓
//! DashboardEvent broadcast ──→ your front end
//! ```
//!
//! Preferences (currency, favorites, alerts) go through an injected
//! [`storage::KeyValueStore`], so the core runs the same against a file
//! directory, an in-memory map or a browser's local storage.

pub mod alerts;
pub mod config;
pub mod constants;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod notifications;
pub mod prediction;
pub mod provider;
pub mod providers;
pub mod share;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, RefreshOutcome};
pub use error::{DashboardError, FetchError, StorageError};
pub use metrics::ProviderMetrics;
pub use store::DashboardState;
pub use types::{
    Coin, Currency, CurrencyState, DashboardEvent, Notification, NotificationKind, PriceAlert,
};
