//! In-memory view-model for the dashboard
//!
//! `DashboardState` is the single source of truth for everything a
//! presentation layer draws. Transitions are plain synchronous methods; the
//! filtered coin list is recomputed from inputs on every read and never
//! stored.

use crate::{
    constants::FETCH_FAILED_MESSAGE,
    types::{Coin, CurrencyState, PriceAlert},
};

/// Returns `favorites` with `symbol` added, or removed if already present
///
/// Applying the same toggle twice yields the original set.
pub fn toggle_favorite(favorites: &[String], symbol: &str) -> Vec<String> {
    if favorites.iter().any(|f| f == symbol) {
        favorites.iter().filter(|f| *f != symbol).cloned().collect()
    } else {
        let mut next = favorites.to_vec();
        next.push(symbol.to_string());
        next
    }
}

/// Case-insensitive match of `term` against a coin's name or symbol
fn matches_search(coin: &Coin, term_lower: &str) -> bool {
    coin.name.to_lowercase().contains(term_lower)
        || coin.symbol.to_lowercase().contains(term_lower)
}

/// Derives the visible coin list
///
/// Keeps coins whose name or symbol contains `search_term` (any case; an
/// empty term keeps everything), then, when `favorites_only` is set, only
/// those in `favorites`. Source order is preserved.
pub fn filter_coins(
    coins: &[Coin],
    search_term: &str,
    favorites_only: bool,
    favorites: &[String],
) -> Vec<Coin> {
    let term = search_term.to_lowercase();
    coins
        .iter()
        .filter(|coin| term.is_empty() || matches_search(coin, &term))
        .filter(|coin| !favorites_only || favorites.iter().any(|f| *f == coin.symbol))
        .cloned()
        .collect()
}

/// Snapshot of everything the dashboard shows
#[derive(Debug, Clone)]
pub struct DashboardState {
    coins: Vec<Coin>,
    search_term: String,
    favorites: Vec<String>,
    favorites_only: bool,
    currency: CurrencyState,
    alerts: Vec<PriceAlert>,
    error: Option<String>,
    loading: bool,
}

impl DashboardState {
    /// Creates a state from persisted preferences, with no coins loaded yet
    pub fn new(currency: CurrencyState, favorites: Vec<String>, alerts: Vec<PriceAlert>) -> Self {
        Self {
            coins: Vec::new(),
            search_term: String::new(),
            favorites,
            favorites_only: false,
            currency,
            alerts,
            error: None,
            loading: false,
        }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, symbol: &str) -> bool {
        self.favorites.iter().any(|f| f == symbol)
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn currency(&self) -> &CurrencyState {
        &self.currency
    }

    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    /// Banner text of the last failed refresh, if it has not been cleared
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The coins currently visible after search and favorites filtering
    pub fn filtered_coins(&self) -> Vec<Coin> {
        filter_coins(
            &self.coins,
            &self.search_term,
            self.favorites_only,
            &self.favorites,
        )
    }

    /// Text for an empty grid, or `None` if something is visible
    pub fn empty_state_message(&self) -> Option<&'static str> {
        if !self.filtered_coins().is_empty() {
            return None;
        }
        Some(if !self.search_term.is_empty() {
            "No cryptocurrencies found matching your search."
        } else if self.favorites_only {
            "No favorite cryptocurrencies yet. Click the star icon to add some!"
        } else {
            "No cryptocurrencies available."
        })
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the whole coin list and clears any error banner
    pub fn apply_coins(&mut self, coins: Vec<Coin>) {
        self.coins = coins;
        self.error = None;
    }

    /// Records a failed refresh; the previous coins stay visible
    pub fn apply_fetch_failure(&mut self) {
        self.error = Some(FETCH_FAILED_MESSAGE.to_string());
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.favorites_only = favorites_only;
    }

    /// Toggles `symbol` in the favorite set, returning the new set
    pub fn toggle_favorite(&mut self, symbol: &str) -> &[String] {
        self.favorites = toggle_favorite(&self.favorites, symbol);
        &self.favorites
    }

    /// Switches currency; returns false if it was already active
    pub fn set_currency(&mut self, currency: CurrencyState) -> bool {
        if self.currency == currency {
            return false;
        }
        self.currency = currency;
        true
    }

    pub fn push_alert(&mut self, alert: PriceAlert) {
        self.alerts.push(alert);
    }

    pub fn replace_alerts(&mut self, alerts: Vec<PriceAlert>) {
        self.alerts = alerts;
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(CurrencyState::default(), Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn coin(name: &str, symbol: &str) -> Coin {
        Coin::new(name, symbol, 1.0, 0.0, 0.0, 0.0, Vec::new())
    }

    fn sample() -> Vec<Coin> {
        vec![
            coin("Bitcoin", "BTC"),
            coin("Ethereum", "ETH"),
            coin("Ethereum Classic", "ETC"),
            coin("Dogecoin", "DOGE"),
        ]
    }

    fn symbols(coins: &[Coin]) -> Vec<&str> {
        coins.iter().map(|c| c.symbol.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_on_symbol() {
        let coins = vec![coin("Ethereum", "ETH"), coin("Bitcoin", "BTC")];
        for term in ["eth", "ETH", "eTh"] {
            let filtered = filter_coins(&coins, term, false, &[]);
            assert_eq!(symbols(&filtered), vec!["ETH"]);
        }
    }

    #[test]
    fn test_search_preserves_source_order() {
        let filtered = filter_coins(&sample(), "ether", false, &[]);
        assert_eq!(symbols(&filtered), vec!["ETH", "ETC"]);

        // Name-only hits keep their place too
        let filtered = filter_coins(&sample(), "coin", false, &[]);
        assert_eq!(symbols(&filtered), vec!["BTC", "DOGE"]);
    }

    #[test]
    fn test_favorites_only_intersects() {
        let favorites = vec!["DOGE".to_string(), "ETH".to_string()];
        let filtered = filter_coins(&sample(), "", true, &favorites);
        assert_eq!(symbols(&filtered), vec!["ETH", "DOGE"]);

        let filtered = filter_coins(&sample(), "eth", true, &favorites);
        assert_eq!(symbols(&filtered), vec!["ETH"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let favorites = vec!["ETC".to_string(), "ETH".to_string(), "BTC".to_string()];
        for (term, only) in [("", false), ("e", false), ("eth", true), ("x", true)] {
            let once = filter_coins(&sample(), term, only, &favorites);
            let twice = filter_coins(&once, term, only, &favorites);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_toggle_favorite_is_own_inverse() {
        fn as_set(favorites: &[String]) -> BTreeSet<&str> {
            favorites.iter().map(String::as_str).collect()
        }

        let start = vec!["BTC".to_string(), "ETH".to_string()];
        for symbol in ["BTC", "SOL"] {
            let toggled = toggle_favorite(&start, symbol);
            assert_ne!(as_set(&toggled), as_set(&start));
            let back = toggle_favorite(&toggled, symbol);
            assert_eq!(as_set(&back), as_set(&start));
            assert_eq!(back.len(), start.len());
        }
    }

    #[test]
    fn test_failure_keeps_coins_and_success_clears_error() {
        let mut state = DashboardState::default();
        state.apply_coins(sample());

        state.apply_fetch_failure();
        assert_eq!(state.coins().len(), 4);
        assert_eq!(state.error(), Some("Failed to load cryptocurrency data"));

        state.apply_coins(vec![coin("Solana", "SOL")]);
        assert!(state.error().is_none());
        assert_eq!(symbols(state.coins()), vec!["SOL"]);
    }

    #[test]
    fn test_empty_state_messages() {
        let mut state = DashboardState::default();
        assert_eq!(
            state.empty_state_message(),
            Some("No cryptocurrencies available.")
        );

        state.apply_coins(sample());
        assert_eq!(state.empty_state_message(), None);

        state.set_favorites_only(true);
        assert_eq!(
            state.empty_state_message(),
            Some("No favorite cryptocurrencies yet. Click the star icon to add some!")
        );

        state.set_search_term("xrp");
        assert_eq!(
            state.empty_state_message(),
            Some("No cryptocurrencies found matching your search.")
        );
    }

    #[test]
    fn test_set_currency_reports_change() {
        let mut state = DashboardState::default();
        assert!(!state.set_currency(CurrencyState::default()));
        let eur = CurrencyState {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };
        assert!(state.set_currency(eur.clone()));
        assert_eq!(state.currency(), &eur);
    }
}
