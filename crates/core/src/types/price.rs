//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept exact through every calculation; rounding to the
//! currency's minor unit only happens in [`Price::display`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from an amount in dollars.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Create a price from an integer amount of minor units (e.g., cents).
    #[must_use]
    pub fn from_minor_units(minor: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(minor, 2), currency_code)
    }

    /// Format for display, rounded to two fractional digits (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::usd(Decimal::new(25, 0)).display(), "$25.00");
        assert_eq!(Price::usd(Decimal::new(19_995, 3)).display(), "$20.00");
        assert_eq!(Price::usd(Decimal::new(2_004, 3)).display(), "$2.00");
        assert_eq!(Price::usd(Decimal::new(2_005, 3)).display(), "$2.01");
    }

    #[test]
    fn test_from_minor_units() {
        let price = Price::from_minor_units(2499, CurrencyCode::USD);
        assert_eq!(price.amount, Decimal::new(2499, 2));
        assert_eq!(price.display(), "$24.99");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::EUR).display(), "€1.00");
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::GBP).display(), "£1.00");
    }
}
