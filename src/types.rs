//! Types for the crypto predictor dashboard

use crate::prediction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Market snapshot of a single coin plus its derived prediction
///
/// Coins are rebuilt on every successful fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Display name (e.g. "Bitcoin")
    pub name: String,

    /// Upper-cased ticker, unique within a fetch
    pub symbol: String,

    /// Price in the active currency
    pub current_price: f64,

    /// Momentum extrapolation of `current_price`
    pub predicted_price: f64,

    /// 24h price change percentage
    pub change_24h: f64,

    /// Market capitalization in the active currency
    pub market_cap: f64,

    /// 24h traded volume in the active currency
    pub volume: f64,

    /// 7-day price samples, oldest first
    pub sparkline: Vec<f64>,
}

impl Coin {
    /// Create a coin, computing the predicted price from the 24h change
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        current_price: f64,
        change_24h: f64,
        market_cap: f64,
        volume: f64,
        sparkline: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            current_price,
            predicted_price: prediction::predicted_price(current_price, change_24h),
            change_24h,
            market_cap,
            volume,
            sparkline,
        }
    }

    /// Expected move from the current to the predicted price, in percent
    pub fn expected_change_pct(&self) -> f64 {
        prediction::expected_change_pct(self.current_price, self.predicted_price)
    }
}

/// Currency catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// ISO code, upper case
    pub code: &'static str,
    /// Human readable name
    pub name: &'static str,
    /// Display symbol
    pub symbol: &'static str,
}

/// The currency prices are requested and displayed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyState {
    pub code: String,
    pub symbol: String,
}

impl Default for CurrencyState {
    fn default() -> Self {
        Self {
            code: "USD".to_string(),
            symbol: "$".to_string(),
        }
    }
}

impl From<&Currency> for CurrencyState {
    fn from(currency: &Currency) -> Self {
        Self {
            code: currency.code.to_string(),
            symbol: currency.symbol.to_string(),
        }
    }
}

/// A pending one-shot price alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub symbol: String,
    pub target_price: f64,
}

impl PriceAlert {
    pub fn new(symbol: impl Into<String>, target_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            target_price,
        }
    }
}

/// Notification flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user action went through (e.g. an alert was registered)
    Success,
    /// Something needs attention (e.g. an alert fired)
    Warning,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification with a fresh id
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Warning)
    }
}

/// Events broadcast by the dashboard to its subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// A fetch completed and replaced the coin list
    CoinsUpdated {
        id: Uuid,
        currency: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fetch failed; the previous coin list is kept
    FetchFailed {
        id: Uuid,
        currency: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A price alert fired and was removed
    AlertTriggered {
        id: Uuid,
        alert: PriceAlert,
        timestamp: DateTime<Utc>,
    },

    /// The active currency changed
    CurrencyChanged {
        id: Uuid,
        currency: CurrencyState,
        timestamp: DateTime<Utc>,
    },

    /// A notification was queued
    NotificationAdded {
        id: Uuid,
        notification: Notification,
        timestamp: DateTime<Utc>,
    },

    /// A notification expired or was dismissed
    NotificationRemoved {
        id: Uuid,
        notification_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub fn coins_updated(currency: &str, count: usize) -> Self {
        Self::CoinsUpdated {
            id: Uuid::new_v4(),
            currency: currency.to_string(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn fetch_failed(currency: &str, error_message: impl Into<String>) -> Self {
        Self::FetchFailed {
            id: Uuid::new_v4(),
            currency: currency.to_string(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn alert_triggered(alert: PriceAlert) -> Self {
        Self::AlertTriggered {
            id: Uuid::new_v4(),
            alert,
            timestamp: Utc::now(),
        }
    }

    pub fn currency_changed(currency: CurrencyState) -> Self {
        Self::CurrencyChanged {
            id: Uuid::new_v4(),
            currency,
            timestamp: Utc::now(),
        }
    }

    pub fn notification_added(notification: Notification) -> Self {
        Self::NotificationAdded {
            id: Uuid::new_v4(),
            notification,
            timestamp: Utc::now(),
        }
    }

    pub fn notification_removed(notification_id: Uuid) -> Self {
        Self::NotificationRemoved {
            id: Uuid::new_v4(),
            notification_id,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::CoinsUpdated { id, .. } => *id,
            DashboardEvent::FetchFailed { id, .. } => *id,
            DashboardEvent::AlertTriggered { id, .. } => *id,
            DashboardEvent::CurrencyChanged { id, .. } => *id,
            DashboardEvent::NotificationAdded { id, .. } => *id,
            DashboardEvent::NotificationRemoved { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::CoinsUpdated { .. } => "COINS_UPDATED",
            DashboardEvent::FetchFailed { .. } => "FETCH_FAILED",
            DashboardEvent::AlertTriggered { .. } => "ALERT_TRIGGERED",
            DashboardEvent::CurrencyChanged { .. } => "CURRENCY_CHANGED",
            DashboardEvent::NotificationAdded { .. } => "NOTIFICATION_ADDED",
            DashboardEvent::NotificationRemoved { .. } => "NOTIFICATION_REMOVED",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardEvent::CoinsUpdated {
                currency, count, ..
            } => write!(f, "Loaded {} coins priced in {}", count, currency),
            DashboardEvent::FetchFailed {
                currency,
                error_message,
                ..
            } => write!(f, "Fetch failed for {}: {}", currency, error_message),
            DashboardEvent::AlertTriggered { alert, .. } => write!(
                f,
                "Alert triggered: {} at {}",
                alert.symbol, alert.target_price
            ),
            DashboardEvent::CurrencyChanged { currency, .. } => {
                write!(f, "Currency changed to {}", currency.code)
            }
            DashboardEvent::NotificationAdded { notification, .. } => {
                write!(f, "Notification: {}", notification.message)
            }
            DashboardEvent::NotificationRemoved {
                notification_id, ..
            } => write!(f, "Notification {} removed", notification_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_serializes_with_camel_case_keys() {
        let alert = PriceAlert::new("BTC", 90.0);
        let json = serde_json::to_string(&alert).unwrap();
        assert_eq!(json, r#"{"symbol":"BTC","targetPrice":90.0}"#);
    }

    #[test]
    fn test_event_tag() {
        let event = DashboardEvent::coins_updated("USD", 12);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "COINS_UPDATED");
        assert_eq!(event.event_type(), "COINS_UPDATED");
        assert_eq!(event.to_string(), "Loaded 12 coins priced in USD");
    }

    #[test]
    fn test_notification_ids_are_unique() {
        let a = Notification::success("one");
        let b = Notification::success("one");
        assert_ne!(a.id, b.id);
    }
}
