//! CoinGecko market data provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, MARKETS_PAGE_SIZE, REQUEST_TIMEOUT_SECS,
        USER_AGENT,
    },
    error::FetchError,
    provider::MarketDataProvider,
    types::{Coin, CurrencyState},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// One record of the CoinGecko `/coins/markets` response
///
/// CoinGecko sends `null` for numbers it does not know yet (fresh listings,
/// paused markets); those are read as 0.
#[derive(Debug, Deserialize)]
struct CoinGeckoMarket {
    #[allow(dead_code)]
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    sparkline_in_7d: Option<CoinGeckoSparkline>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoSparkline {
    #[serde(default)]
    price: Vec<f64>,
}

impl From<CoinGeckoMarket> for Coin {
    fn from(market: CoinGeckoMarket) -> Self {
        Coin::new(
            market.name,
            market.symbol.to_uppercase(),
            market.current_price.unwrap_or_default(),
            market.price_change_percentage_24h.unwrap_or_default(),
            market.market_cap.unwrap_or_default(),
            market.total_volume.unwrap_or_default(),
            market.sparkline_in_7d.map(|s| s.price).unwrap_or_default(),
        )
    }
}

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against another base URL (proxy, pro endpoint)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: MARKETS_PAGE_SIZE,
        })
    }

    /// Overrides the number of coins requested per fetch
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builds the CoinGecko API URL for the markets listing
    fn build_url(&self, currency: &CurrencyState) -> String {
        format!(
            "{}{}?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=true",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            currency.code.to_lowercase(),
            self.page_size
        )
    }

    /// Parses the CoinGecko response body into coins, keeping upstream order
    fn parse_response(body: &str) -> Result<Vec<Coin>, FetchError> {
        let markets: Vec<CoinGeckoMarket> = serde_json::from_str(body).map_err(|e| {
            FetchError::parse(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, body
            ))
        })?;

        Ok(markets.into_iter().map(Coin::from).collect())
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, currency: &CurrencyState) -> Result<Vec<Coin>, FetchError> {
        let url = self.build_url(currency);
        tracing::debug!(url = %url, "Fetching markets from CoinGecko");

        let response = self.client.get(&url).send().await?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(FetchError::RateLimited);
        }

        // Check for other errors
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(FetchError::status(
                status,
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        let coins = Self::parse_response(&body)?;

        tracing::debug!(
            count = coins.len(),
            currency = %currency.code,
            "Successfully fetched markets from CoinGecko"
        );

        Ok(coins)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 100.0,
            "market_cap": 1285000000000,
            "total_volume": 28500000000,
            "price_change_percentage_24h": 5.0,
            "sparkline_in_7d": { "price": [95.0, 97.5, 100.0] }
        },
        {
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "current_price": 200.0,
            "market_cap": 415000000000,
            "total_volume": 12500000000,
            "price_change_percentage_24h": -10.0,
            "sparkline_in_7d": { "price": [] }
        }
    ]"#;

    #[test]
    fn test_build_url() {
        let provider = CoinGeckoProvider::with_base_url("http://localhost:8080/api/v3/").unwrap();
        let eur = CurrencyState {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };
        assert_eq!(
            provider.build_url(&eur),
            "http://localhost:8080/api/v3/coins/markets?vs_currency=eur&order=market_cap_desc&per_page=12&page=1&sparkline=true"
        );
    }

    #[test]
    fn test_parse_response() {
        let coins = CoinGeckoProvider::parse_response(SAMPLE).unwrap();
        assert_eq!(coins.len(), 2);

        let btc = &coins[0];
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.name, "Bitcoin");
        assert_eq!(btc.sparkline, vec![95.0, 97.5, 100.0]);
        assert!((btc.predicted_price - 105.5).abs() < 1e-9);

        let eth = &coins[1];
        assert_eq!(eth.symbol, "ETH");
        assert!((eth.predicted_price - 182.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_tolerates_nulls_and_missing_sparkline() {
        let body = r#"[{
            "id": "newcoin", "symbol": "new", "name": "New Coin",
            "current_price": 1.5, "market_cap": null, "total_volume": null,
            "price_change_percentage_24h": null
        }]"#;
        let coins = CoinGeckoProvider::parse_response(body).unwrap();
        assert_eq!(coins[0].market_cap, 0.0);
        assert_eq!(coins[0].change_24h, 0.0);
        assert_eq!(coins[0].predicted_price, 1.5);
        assert!(coins[0].sparkline.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = CoinGeckoProvider::parse_response(r#"{"status":{"error_code":429}}"#)
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
