//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation (cents) to avoid floating-point
//! precision issues that plague monetary calculations. All arithmetic is
//! checked: currency mismatches and overflow return `None` instead of
//! producing silently wrong totals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies. All two-decimal; conversion is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(cents: i64, currency: Currency) -> Self {
        Self { cents, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Convert to a decimal value for display purposes.
    pub fn to_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.to_decimal())
    }

    /// Add another value, `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.cents
            .checked_add(other.cents)
            .map(|c| Money::new(c, self.currency))
    }

    /// Subtract another value, `None` on currency mismatch or overflow.
    pub fn try_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.cents
            .checked_sub(other.cents)
            .map(|c| Money::new(c, self.currency))
    }

    /// Multiply by a scalar, `None` on overflow.
    pub fn try_mul(&self, factor: i64) -> Option<Money> {
        self.cents
            .checked_mul(factor)
            .map(|c| Money::new(c, self.currency))
    }

    /// Calculate a percentage of this amount, rounded to the nearest cent.
    pub fn percentage(&self, percent: f64) -> Money {
        let cents = (self.cents as f64 * percent / 100.0).round() as i64;
        Money::new(cents, self.currency)
    }

    /// The smaller of two same-currency amounts.
    pub fn min(&self, other: &Money) -> Money {
        if other.cents < self.cents {
            *other
        } else {
            *self
        }
    }

    /// Sum an iterator of values, `None` on mismatch or overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.cents, 4999);
        assert_eq!(m.display(), "$49.99");
    }

    #[test]
    fn test_checked_addition() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(500, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().cents, 1500);
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
        assert!(usd.try_sub(&eur).is_none());
    }

    #[test]
    fn test_overflow_is_none() {
        let m = Money::new(i64::MAX, Currency::USD);
        assert!(m.try_add(&Money::new(1, Currency::USD)).is_none());
        assert!(m.try_mul(2).is_none());
    }

    #[test]
    fn test_percentage_rounds_to_cent() {
        let m = Money::new(3600, Currency::USD);
        assert_eq!(m.percentage(8.0).cents, 288);

        let m = Money::new(999, Currency::USD);
        assert_eq!(m.percentage(10.0).cents, 100); // 99.9 rounds up
    }

    #[test]
    fn test_min() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(1500, Currency::USD);
        assert_eq!(a.min(&b).cents, 1000);
        assert_eq!(b.min(&a).cents, 1000);
    }

    #[test]
    fn test_try_sum() {
        let values = [
            Money::new(100, Currency::USD),
            Money::new(250, Currency::USD),
        ];
        let total = Money::try_sum(values.iter(), Currency::USD).unwrap();
        assert_eq!(total.cents, 350);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("gbp"), Some(Currency::GBP));
        assert_eq!(Currency::from_code("JPY"), None);
    }
}
