//! Price alert evaluation
//!
//! Alerts are one-shot: once the condition holds on a fresh refresh the alert
//! produces a warning notification and is dropped from the pending list.

use crate::types::{Coin, CurrencyState, Notification, PriceAlert};

/// Whether `alert` fires against the latest snapshot of its coin.
///
/// Fires when the price is at or above the target while rising, or at or
/// below it while falling. A flat 24h change never fires.
pub fn should_trigger(coin: &Coin, alert: &PriceAlert) -> bool {
    (coin.current_price >= alert.target_price && coin.change_24h > 0.0)
        || (coin.current_price <= alert.target_price && coin.change_24h < 0.0)
}

/// Result of one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct AlertOutcome {
    /// Alerts still waiting, in their original order
    pub pending: Vec<PriceAlert>,
    /// Alerts that fired on this pass
    pub triggered: Vec<PriceAlert>,
    /// One warning per triggered alert
    pub notifications: Vec<Notification>,
}

impl AlertOutcome {
    pub fn any_triggered(&self) -> bool {
        !self.triggered.is_empty()
    }
}

/// Evaluates every pending alert against `coins`
///
/// Alerts for symbols missing from `coins` stay pending.
pub fn evaluate(coins: &[Coin], alerts: &[PriceAlert], currency: &CurrencyState) -> AlertOutcome {
    let mut outcome = AlertOutcome::default();

    for alert in alerts {
        let fired = coins
            .iter()
            .find(|c| c.symbol == alert.symbol)
            .is_some_and(|coin| should_trigger(coin, alert));

        if fired {
            tracing::info!(
                symbol = %alert.symbol,
                target_price = alert.target_price,
                "Price alert triggered"
            );
            outcome
                .notifications
                .push(Notification::warning(triggered_message(alert, currency)));
            outcome.triggered.push(alert.clone());
        } else {
            outcome.pending.push(alert.clone());
        }
    }

    outcome
}

/// Warning text for a fired alert
pub fn triggered_message(alert: &PriceAlert, currency: &CurrencyState) -> String {
    format!(
        "{} has reached your target price of {}{}!",
        alert.symbol, currency.symbol, alert.target_price
    )
}

/// Confirmation text for a newly registered alert
pub fn registered_message(alert: &PriceAlert, currency: &CurrencyState) -> String {
    format!(
        "Price alert set for {} at {}{}",
        alert.symbol, currency.symbol, alert.target_price
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationKind;

    fn btc(price: f64, change: f64) -> Coin {
        Coin::new("Bitcoin", "BTC", price, change, 0.0, 0.0, Vec::new())
    }

    #[test]
    fn test_rising_above_target_triggers_and_removes() {
        let coins = vec![btc(100.0, 5.0)];
        let alerts = vec![PriceAlert::new("BTC", 90.0)];

        let outcome = evaluate(&coins, &alerts, &CurrencyState::default());

        assert!(outcome.pending.is_empty());
        assert_eq!(outcome.triggered, alerts);
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].kind, NotificationKind::Warning);
        assert_eq!(
            outcome.notifications[0].message,
            "BTC has reached your target price of $90!"
        );
    }

    #[test]
    fn test_flat_change_never_triggers() {
        let coins = vec![btc(100.0, 0.0)];
        for target in [90.0, 100.0, 110.0] {
            let alerts = vec![PriceAlert::new("BTC", target)];
            let outcome = evaluate(&coins, &alerts, &CurrencyState::default());
            assert!(!outcome.any_triggered());
            assert_eq!(outcome.pending, alerts);
        }
    }

    #[test]
    fn test_direction_must_match_side_of_target() {
        // Falling but still above target: waits
        assert!(!should_trigger(&btc(100.0, -3.0), &PriceAlert::new("BTC", 90.0)));
        // Falling to or through target: fires
        assert!(should_trigger(&btc(90.0, -3.0), &PriceAlert::new("BTC", 90.0)));
        assert!(should_trigger(&btc(80.0, -3.0), &PriceAlert::new("BTC", 90.0)));
        // Rising but still below target: waits
        assert!(!should_trigger(&btc(80.0, 3.0), &PriceAlert::new("BTC", 90.0)));
    }

    #[test]
    fn test_only_fired_alerts_are_removed() {
        let coins = vec![btc(100.0, 5.0)];
        let alerts = vec![
            PriceAlert::new("BTC", 150.0),
            PriceAlert::new("ETH", 1.0),
            PriceAlert::new("BTC", 95.0),
        ];

        let outcome = evaluate(&coins, &alerts, &CurrencyState::default());

        assert_eq!(outcome.triggered, vec![PriceAlert::new("BTC", 95.0)]);
        assert_eq!(
            outcome.pending,
            vec![PriceAlert::new("BTC", 150.0), PriceAlert::new("ETH", 1.0)]
        );
    }

    #[test]
    fn test_messages_use_currency_symbol() {
        let eur = CurrencyState {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };
        let alert = PriceAlert::new("ETH", 2500.5);
        assert_eq!(
            registered_message(&alert, &eur),
            "Price alert set for ETH at €2500.5"
        );
    }
}
