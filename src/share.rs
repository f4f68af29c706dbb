//! Shareable prediction summaries
//!
//! Sharing is best-effort: the dashboard hands the payload to whatever
//! `ShareTarget` the front end provides and only logs a failure.

use crate::types::{Coin, CurrencyState};

/// Title, body and link describing one coin's prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_coin(coin: &Coin, currency: &CurrencyState, url: impl Into<String>) -> Self {
        Self {
            title: format!("{} Price Prediction", coin.name),
            text: format!(
                "{} ({}) is currently at {}{} with a predicted price of {}{}",
                coin.name,
                coin.symbol,
                currency.symbol,
                format_amount(coin.current_price),
                currency.symbol,
                format_amount(coin.predicted_price)
            ),
            url: url.into(),
        }
    }

    /// Single block of text for clipboard-style targets
    pub fn to_clipboard_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.text, self.url)
    }
}

/// Somewhere a payload can be sent (system share sheet, clipboard, chat)
pub trait ShareTarget: Send + Sync {
    fn share(&self, payload: &SharePayload) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Shares `payload`, logging and swallowing any failure
pub fn share_best_effort(target: &dyn ShareTarget, payload: &SharePayload) -> bool {
    match target.share(payload) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(title = %payload.title, error = %e, "Error sharing prediction");
            false
        }
    }
}

/// Formats an amount with thousands separators and up to three decimals
///
/// `65432.1` becomes `65,432.1`; `0.123456` becomes `0.123`.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Clipboard(Mutex<Option<String>>);

    impl ShareTarget for Clipboard {
        fn share(
            &self,
            payload: &SharePayload,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            *self.0.lock().unwrap() = Some(payload.to_clipboard_text());
            Ok(())
        }
    }

    struct Broken;

    impl ShareTarget for Broken {
        fn share(&self, _: &SharePayload) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("share sheet dismissed".into())
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(65432.1), "65,432.1");
        assert_eq!(format_amount(1285000000000.0), "1,285,000,000,000");
        assert_eq!(format_amount(0.123456), "0.123");
        assert_eq!(format_amount(999.9999), "1,000");
        assert_eq!(format_amount(-1234.5), "-1,234.5");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_payload_text() {
        let coin = Coin::new("Bitcoin", "BTC", 100.0, 5.0, 0.0, 0.0, Vec::new());
        let payload = SharePayload::for_coin(&coin, &CurrencyState::default(), "https://example.org");
        assert_eq!(payload.title, "Bitcoin Price Prediction");
        assert_eq!(
            payload.text,
            "Bitcoin (BTC) is currently at $100 with a predicted price of $105.5"
        );
    }

    #[test]
    fn test_share_failures_are_swallowed() {
        let coin = Coin::new("Ethereum", "ETH", 10.0, -1.0, 0.0, 0.0, Vec::new());
        let payload = SharePayload::for_coin(&coin, &CurrencyState::default(), "");

        let clipboard = Clipboard(Mutex::new(None));
        assert!(share_best_effort(&clipboard, &payload));
        assert!(clipboard.0.lock().unwrap().as_ref().unwrap().starts_with("Ethereum Price Prediction\n"));

        assert!(!share_best_effort(&Broken, &payload));
    }
}
