//! Provider abstraction for fetching market listings from external APIs

use crate::{
    error::FetchError,
    types::{Coin, CurrencyState},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// A provider returns the top coins by market capitalization, priced in the
/// requested currency, with predictions already computed.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of coins priced in `currency`
    ///
    /// Exactly one upstream request is made per call. Callers own any retry
    /// policy; the dashboard simply waits for its next refresh tick.
    ///
    /// # Arguments
    /// * `currency` - The currency prices are denominated in
    ///
    /// # Returns
    /// Coins in upstream order (market cap descending) or the fetch error
    async fn fetch_markets(&self, currency: &CurrencyState) -> Result<Vec<Coin>, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone)]
    enum MockResponse {
        Coins(Vec<Coin>),
        Status(u16),
    }

    /// Mock provider for testing
    ///
    /// Responses are keyed by currency code; an optional delay per code lets
    /// tests make one fetch finish after another.
    #[derive(Clone, Default)]
    pub struct MockProvider {
        responses: Arc<Mutex<HashMap<String, MockResponse>>>,
        delays: Arc<Mutex<HashMap<String, Duration>>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_coins(&self, currency_code: &str, coins: Vec<Coin>) {
            self.responses
                .lock()
                .unwrap()
                .insert(currency_code.to_string(), MockResponse::Coins(coins));
        }

        pub fn set_error(&self, currency_code: &str, status: u16) {
            self.responses
                .lock()
                .unwrap()
                .insert(currency_code.to_string(), MockResponse::Status(status));
        }

        pub fn set_delay(&self, currency_code: &str, delay: Duration) {
            self.delays
                .lock()
                .unwrap()
                .insert(currency_code.to_string(), delay);
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn fetch_markets(
            &self,
            currency: &CurrencyState,
        ) -> Result<Vec<Coin>, FetchError> {
            *self.call_count.lock().unwrap() += 1;

            let delay = self.delays.lock().unwrap().get(&currency.code).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let response = self.responses.lock().unwrap().get(&currency.code).cloned();
            match response {
                Some(MockResponse::Coins(coins)) => Ok(coins),
                Some(MockResponse::Status(status)) => {
                    Err(FetchError::status(status, "mock failure"))
                }
                None => Err(FetchError::parse(format!(
                    "no mock response for {}",
                    currency.code
                ))),
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
