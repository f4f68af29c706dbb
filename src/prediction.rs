//! Naive momentum prediction
//!
//! The "prediction" is a straight-line extrapolation of the last 24h move,
//! scaled up a little when the coin is rising and damped when it is not.

use crate::constants::{BEARISH_MOMENTUM, BULLISH_MOMENTUM};

/// Momentum multiplier for a given 24h change percentage
pub fn momentum(change_24h: f64) -> f64 {
    if change_24h > 0.0 {
        BULLISH_MOMENTUM
    } else {
        BEARISH_MOMENTUM
    }
}

/// Extrapolates the current price by the 24h change scaled by momentum
pub fn predicted_price(current_price: f64, change_24h: f64) -> f64 {
    current_price * (1.0 + (change_24h / 100.0) * momentum(change_24h))
}

/// Percentage move from `current` to `predicted`
///
/// Returns 0 for a zero current price instead of dividing by zero.
pub fn expected_change_pct(current: f64, predicted: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    (predicted - current) / current * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_positive_change_uses_bullish_momentum() {
        for (price, change) in [(100.0, 5.0), (65432.10, 2.5), (0.25, 0.01)] {
            let expected = price * (1.0 + change / 100.0 * 1.1);
            assert!(approx_eq(predicted_price(price, change), expected));
        }
    }

    #[test]
    fn test_flat_or_negative_change_uses_bearish_momentum() {
        for (price, change) in [(100.0, 0.0), (1.23, -0.5), (3456.78, -12.0)] {
            let expected = price * (1.0 + change / 100.0 * 0.9);
            assert!(approx_eq(predicted_price(price, change), expected));
        }
        assert_eq!(predicted_price(100.0, 0.0), 100.0);
    }

    #[test]
    fn test_expected_change_pct() {
        assert!(approx_eq(expected_change_pct(100.0, 105.5), 5.5));
        assert!(approx_eq(expected_change_pct(200.0, 190.0), -5.0));
        assert_eq!(expected_change_pct(0.0, 10.0), 0.0);
    }
}
