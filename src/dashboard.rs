//! Dashboard service
//!
//! Owns the view-model and everything that mutates it: the periodic refresh
//! task, alert evaluation after each fetch, the notification queue and the
//! persisted preferences.

use crate::{
    alerts,
    config::DashboardConfig,
    constants::{ALERTS_KEY, CURRENCY_KEY, EVENT_CHANNEL_CAPACITY, FAVORITES_KEY},
    currency,
    error::{DashboardError, FetchError, StorageError},
    metrics::{MetricsCollector, ProviderMetrics},
    notifications::NotificationQueue,
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    share::{self, SharePayload, ShareTarget},
    storage::{self, FileStore, KeyValueStore, MemoryStore},
    store::DashboardState,
    types::{Coin, CurrencyState, DashboardEvent, Notification, PriceAlert},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex as AsyncMutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The coin list was replaced
    Applied {
        coins: usize,
        alerts_triggered: usize,
    },
    /// A newer fetch was started, or the currency changed, meanwhile; this
    /// result was dropped
    Superseded,
}

struct DashboardInner {
    state: RwLock<DashboardState>,
    provider: Arc<dyn MarketDataProvider>,
    storage: Arc<dyn KeyValueStore>,
    notifications: NotificationQueue,
    metrics: MetricsCollector,
    events: broadcast::Sender<DashboardEvent>,
    /// Id of the most recently started fetch
    generation: AtomicU64,
    /// Orders preference writes; the `state` guard is released before a
    /// storage write starts
    persist_lock: AsyncMutex<()>,
    config: DashboardConfig,
}

impl DashboardInner {
    fn emit(&self, event: DashboardEvent) {
        tracing::trace!(event_type = event.event_type(), "{}", event);
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn persist(&self, key: &str, result: Result<(), StorageError>) {
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Failed to persist preference");
        }
    }

    /// Makes `next` the active currency, persisting and announcing it
    ///
    /// Returns false if it was already active.
    async fn activate_currency(&self, next: &CurrencyState) -> bool {
        let _writes = self.persist_lock.lock().await;
        if !self.state.write().await.set_currency(next.clone()) {
            return false;
        }

        self.persist(CURRENCY_KEY, storage::save_currency(self.storage.as_ref(), next));
        tracing::info!(currency = %next.code, "Currency changed");
        self.emit(DashboardEvent::currency_changed(next.clone()));
        true
    }

    /// Fetches coins for `currency` and folds the result into the state
    ///
    /// Completions from a fetch that is no longer the latest one are ignored,
    /// so a slow response can never overwrite a newer currency's data.
    async fn load_data(&self, currency: CurrencyState) -> Result<RefreshOutcome, FetchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.set_loading(true);

        let start = Instant::now();
        let result = self.provider.fetch_markets(&currency).await;

        match result {
            Ok(coins) => {
                self.metrics.record_success(start.elapsed()).await;
                self.apply_coins(generation, currency, coins).await
            }
            Err(e) => {
                self.metrics.record_failure(&e.to_string()).await;
                tracing::warn!(
                    error = %e,
                    currency = %currency.code,
                    provider = self.provider.provider_name(),
                    "Failed to fetch market data"
                );

                let mut state = self.state.write().await;
                if self.is_current(generation, &state, &currency) {
                    state.apply_fetch_failure();
                    state.set_loading(false);
                    drop(state);
                    self.emit(DashboardEvent::fetch_failed(&currency.code, e.to_string()));
                } else if self.is_latest(generation) {
                    state.set_loading(false);
                }
                Err(e)
            }
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        generation == self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64, state: &DashboardState, currency: &CurrencyState) -> bool {
        self.is_latest(generation) && state.currency() == currency
    }

    async fn apply_coins(
        &self,
        generation: u64,
        currency: CurrencyState,
        coins: Vec<Coin>,
    ) -> Result<RefreshOutcome, FetchError> {
        let count = coins.len();

        let writes = self.persist_lock.lock().await;
        let outcome = {
            let mut state = self.state.write().await;
            if !self.is_current(generation, &state, &currency) {
                // Nothing newer is in flight to clear the flag
                if self.is_latest(generation) {
                    state.set_loading(false);
                }
                tracing::debug!(
                    generation,
                    currency = %currency.code,
                    "Discarding superseded market data"
                );
                return Ok(RefreshOutcome::Superseded);
            }

            state.apply_coins(coins);
            state.set_loading(false);

            let outcome = alerts::evaluate(state.coins(), state.alerts(), state.currency());
            if outcome.any_triggered() {
                state.replace_alerts(outcome.pending.clone());
            }
            outcome
        };

        if outcome.any_triggered() {
            self.persist(
                ALERTS_KEY,
                storage::save_alerts(self.storage.as_ref(), &outcome.pending),
            );
        }
        drop(writes);

        tracing::info!(
            count,
            currency = %currency.code,
            alerts_triggered = outcome.triggered.len(),
            "Market data refreshed"
        );
        self.emit(DashboardEvent::coins_updated(&currency.code, count));

        let alerts_triggered = outcome.triggered.len();
        for alert in outcome.triggered {
            self.emit(DashboardEvent::alert_triggered(alert));
        }
        for notification in outcome.notifications {
            self.notifications.push(notification).await;
        }

        Ok(RefreshOutcome::Applied {
            coins: count,
            alerts_triggered,
        })
    }
}

/// Crypto market dashboard
///
/// The single owner of the view-model. Every user action and every fetch
/// completion goes through one of its methods; front ends read a
/// [`DashboardState`] snapshot and listen to [`DashboardEvent`]s.
///
/// # Example
/// ```no_run
/// use crypto_predictor::{Dashboard, DashboardConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = Dashboard::from_config(DashboardConfig::from_env())?;
/// dashboard.refresh_now().await?;
/// for coin in dashboard.filtered_coins().await {
///     println!("{}: {:.2} -> {:.2}", coin.symbol, coin.current_price, coin.predicted_price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    inner: Arc<DashboardInner>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    /// Creates a dashboard backed by CoinGecko and the configured storage
    ///
    /// Preferences are kept in memory unless `storage_dir` is set.
    pub fn from_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        let provider =
            CoinGeckoProvider::with_base_url(&config.api_url)?.with_page_size(config.page_size);

        let storage: Arc<dyn KeyValueStore> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(MemoryStore::new()),
        };

        Ok(Self::with_parts(Arc::new(provider), storage, config))
    }

    /// Creates a dashboard with a custom provider and storage
    ///
    /// Persisted currency, favorites and alerts are read once here.
    pub fn with_parts(
        provider: Arc<dyn MarketDataProvider>,
        storage: Arc<dyn KeyValueStore>,
        config: DashboardConfig,
    ) -> Self {
        let currency = storage::load_currency(storage.as_ref());
        let favorites = storage::load_favorites(storage.as_ref());
        let alerts = storage::load_alerts(storage.as_ref());

        tracing::debug!(
            currency = %currency.code,
            favorites = favorites.len(),
            alerts = alerts.len(),
            "Restored dashboard preferences"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let notifications = NotificationQueue::new(config.notification_ttl, events.clone());
        let metrics = MetricsCollector::new(provider.provider_name());

        Self {
            inner: Arc::new(DashboardInner {
                state: RwLock::new(DashboardState::new(currency, favorites, alerts)),
                provider,
                storage,
                notifications,
                metrics,
                events,
                generation: AtomicU64::new(0),
                persist_lock: AsyncMutex::new(()),
                config,
            }),
            refresh_task: Mutex::new(None),
        }
    }

    /// Starts the periodic refresh task
    ///
    /// The first fetch happens immediately, then once per refresh interval
    /// using whatever currency is active at that tick. Calling this twice is
    /// a no-op.
    pub fn start(&self) {
        let mut slot = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return;
        }

        let inner = self.inner.clone();
        // `interval` panics on a zero period
        let period = inner.config.refresh_interval.max(Duration::from_millis(1));

        *slot = Some(tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = period.as_secs(),
                provider = inner.provider.provider_name(),
                "Starting dashboard refresh task"
            );

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let currency = inner.state.read().await.currency().clone();
                // Failures are already logged and surfaced as the error banner
                let _ = inner.load_data(currency).await;
            }
        }));
    }

    /// Stops the refresh task and every pending notification timer
    pub fn shutdown(&self) {
        if let Some(task) = self
            .refresh_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            task.abort();
            tracing::info!("Dashboard refresh task stopped");
        }
        self.inner.notifications.cancel_timers();
    }

    /// Whether the refresh task is running
    pub fn is_running(&self) -> bool {
        self.refresh_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Fetches coins for `currency` right now
    ///
    /// `currency` becomes the active currency first, persisted and announced
    /// just like [`set_currency`](Self::set_currency), so a successful fetch
    /// always replaces the coin list. On failure the previous coins stay in
    /// place and the error banner is set; the error is also returned for
    /// callers that want details.
    pub async fn load_data(&self, currency: &CurrencyState) -> Result<RefreshOutcome, FetchError> {
        self.inner.activate_currency(currency).await;
        self.inner.load_data(currency.clone()).await
    }

    /// Fetches coins for the active currency right now
    pub async fn refresh_now(&self) -> Result<RefreshOutcome, FetchError> {
        let currency = self.currency().await;
        self.inner.load_data(currency).await
    }

    /// Subscribes to dashboard events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.events.subscribe()
    }

    /// Copy of the whole view-model
    pub async fn snapshot(&self) -> DashboardState {
        self.inner.state.read().await.clone()
    }

    /// Coins visible under the current search and favorites filter
    pub async fn filtered_coins(&self) -> Vec<Coin> {
        self.inner.state.read().await.filtered_coins()
    }

    pub async fn currency(&self) -> CurrencyState {
        self.inner.state.read().await.currency().clone()
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.inner.state.write().await.set_search_term(term);
    }

    pub async fn set_favorites_only(&self, favorites_only: bool) {
        self.inner.state.write().await.set_favorites_only(favorites_only);
    }

    /// Adds or removes `symbol` from favorites and persists the set
    ///
    /// Returns whether the symbol is a favorite afterwards.
    pub async fn toggle_favorite(&self, symbol: &str) -> bool {
        let _writes = self.inner.persist_lock.lock().await;
        let favorites = self.inner.state.write().await.toggle_favorite(symbol).to_vec();
        self.inner.persist(
            FAVORITES_KEY,
            storage::save_favorites(self.inner.storage.as_ref(), &favorites),
        );
        favorites.iter().any(|f| f == symbol)
    }

    /// Switches to the catalog currency `code` and refetches prices
    ///
    /// Prices are denominated per currency upstream, so nothing is rescaled
    /// locally. Returns `None` when `code` is already active.
    ///
    /// `Err(DashboardError::Fetch)` means the switch itself went through
    /// (persisted, `CurrencyChanged` emitted) and only the refetch failed;
    /// the error banner is set as for any failed refresh. Every other error
    /// leaves the currency unchanged.
    pub async fn set_currency(&self, code: &str) -> Result<Option<RefreshOutcome>, DashboardError> {
        let entry = currency::find(code).ok_or_else(|| DashboardError::unknown_currency(code))?;
        let next = CurrencyState::from(entry);

        if !self.inner.activate_currency(&next).await {
            return Ok(None);
        }
        Ok(Some(self.inner.load_data(next).await?))
    }

    /// Registers a one-shot alert for `symbol` at `target_price`
    pub async fn add_alert(&self, symbol: &str, target_price: f64) -> Result<PriceAlert, DashboardError> {
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(DashboardError::InvalidTargetPrice(target_price));
        }

        let alert = PriceAlert::new(symbol.trim().to_uppercase(), target_price);
        let message = {
            let _writes = self.inner.persist_lock.lock().await;
            let (pending, message) = {
                let mut state = self.inner.state.write().await;
                state.push_alert(alert.clone());
                (
                    state.alerts().to_vec(),
                    alerts::registered_message(&alert, state.currency()),
                )
            };
            self.inner.persist(
                ALERTS_KEY,
                storage::save_alerts(self.inner.storage.as_ref(), &pending),
            );
            message
        };

        tracing::info!(symbol = %alert.symbol, target_price, "Price alert registered");
        self.inner.notifications.push(Notification::success(message)).await;

        Ok(alert)
    }

    pub async fn alerts(&self) -> Vec<PriceAlert> {
        self.inner.state.read().await.alerts().to_vec()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.notifications.list().await
    }

    /// Dismisses a notification before it expires
    pub async fn dismiss_notification(&self, id: Uuid) -> bool {
        self.inner.notifications.dismiss(id).await
    }

    /// Shares the prediction for `symbol`, if it is loaded
    ///
    /// Best-effort: returns false when the coin is unknown or the target
    /// failed, without raising.
    pub async fn share_coin(&self, symbol: &str, target: &dyn ShareTarget, url: &str) -> bool {
        let payload = {
            let state = self.inner.state.read().await;
            match state.coins().iter().find(|c| c.symbol == symbol) {
                Some(coin) => SharePayload::for_coin(coin, state.currency(), url),
                None => return false,
            }
        };
        share::share_best_effort(target, &payload)
    }

    /// Returns the name of the market data provider
    pub fn provider_name(&self) -> &str {
        self.inner.provider.provider_name()
    }

    /// Fetch latency percentiles and success rate
    pub async fn provider_metrics(&self) -> ProviderMetrics {
        self.inner.metrics.get_metrics().await
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
