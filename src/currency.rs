//! Built-in currency catalog

use crate::types::{Currency, CurrencyState};

/// Currencies the dashboard can price coins in
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
    Currency { code: "INR", name: "Indian Rupee", symbol: "₹" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    Currency { code: "CHF", name: "Swiss Franc", symbol: "Fr" },
    Currency { code: "CNY", name: "Chinese Yuan", symbol: "¥" },
    Currency { code: "KRW", name: "South Korean Won", symbol: "₩" },
];

/// Get all catalog entries
pub fn all() -> &'static [Currency] {
    CURRENCIES
}

/// Looks up a currency by code, ignoring case
pub fn find(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// The currency used when nothing has been chosen yet
pub fn default_currency() -> CurrencyState {
    CurrencyState::default()
}
