//! Price estimate shown before confirming a booking.
//!
//! The backend charges the real amount. This copy only has to quote the
//! same figure, so it follows the same tiering: a flat first hour, then a
//! fixed amount per extra half hour.

use std::fmt;

use serde::{Deserialize, Serialize};

const BASE_CENTS: i64 = 300;
const EXTRA_HALF_HOUR_CENTS: i64 = 150;
const FLAT_HALF_HOURS: i64 = 2;

/// Money in euro cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Price(i64);

impl Price {
    pub const fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parses a decimal amount such as `4.5`, `"4,50"` or `9`. Digits past
    /// the second decimal are rounded half up.
    pub fn parse_decimal(raw: &str) -> Option<Self> {
        let raw = raw.trim().replace(',', ".");
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.as_str()),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut fraction_digits = fraction.chars().map(|c| i64::from(c as u8 - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

        let cents = whole.checked_mul(100)? + tenths * 10 + hundredths + i64::from(round_up);
        Some(Price(if negative { -cents } else { cents }))
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => Self::parse_decimal(&number.to_string()),
            serde_json::Value::String(text) => Self::parse_decimal(text),
            _ => None,
        }
    }

    /// `4.50`
    pub fn as_euros_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} €", self.as_euros_string().replace('.', ","))
    }
}

/// Rounds to the nearest half hour, halves rounding up.
fn half_hour_units(duration_minutes: u32) -> i64 {
    (i64::from(duration_minutes) + 15) / 30
}

pub fn price(duration_minutes: u32) -> Price {
    let units = half_hour_units(duration_minutes);
    if units <= FLAT_HALF_HOURS {
        return Price(BASE_CENTS);
    }
    Price(BASE_CENTS + EXTRA_HALF_HOUR_CENTS * (units - FLAT_HALF_HOURS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(price(60), Price::from_cents(300));
        assert_eq!(price(90), Price::from_cents(450));
        assert_eq!(price(120), Price::from_cents(600));
        assert_eq!(price(150), Price::from_cents(750));
        assert_eq!(price(180), Price::from_cents(900));
        assert_eq!(price(45), Price::from_cents(300));
        assert_eq!(price(0), Price::from_cents(300));
    }

    #[test]
    fn rounding_to_nearest_half_hour() {
        // 74 min -> 2 units, 75 min -> 3 units
        assert_eq!(price(74), Price::from_cents(300));
        assert_eq!(price(75), Price::from_cents(450));
        assert_eq!(price(104), Price::from_cents(450));
        assert_eq!(price(105), Price::from_cents(600));
    }

    #[test]
    fn display() {
        assert_eq!(price(90).to_string(), "4,50 €");
        assert_eq!(price(180).as_euros_string(), "9.00");
        assert_eq!(Price::from_cents(-5).as_euros_string(), "-0.05");
    }

    #[test]
    fn parses_backend_amounts_without_floats() {
        assert_eq!(Price::parse_decimal("4.5"), Some(Price::from_cents(450)));
        assert_eq!(Price::parse_decimal("4,50"), Some(Price::from_cents(450)));
        assert_eq!(Price::parse_decimal("9"), Some(Price::from_cents(900)));
        assert_eq!(Price::parse_decimal(".5"), Some(Price::from_cents(50)));
        assert_eq!(Price::parse_decimal("0.105"), Some(Price::from_cents(11)));
        assert_eq!(Price::parse_decimal("abc"), None);
        assert_eq!(Price::parse_decimal(""), None);
        assert_eq!(Price::from_json(&serde_json::json!(7.5)), Some(Price::from_cents(750)));
        assert_eq!(Price::from_json(&serde_json::json!("3.00")), Some(Price::from_cents(300)));
        assert_eq!(Price::from_json(&serde_json::Value::Null), None);
    }
}
