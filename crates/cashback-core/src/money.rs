//! # Money Module
//!
//! Provides the `Money` type for purchase values, monthly totals and cashback.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, a purchase of 1000.01 can be stored as 1000.0099999...   │
//! │  and a monthly total that should be exactly 1000.00 can drift across   │
//! │  the 10% / 15% tier boundary.                                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    R$1000.00 = 100000 cents, compared exactly against tier limits      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashback_core::money::Money;
//!
//! let value = Money::from_cents(13_590);        // R$135.90
//! let parsed: Money = "135.9".parse().unwrap(); // same amount
//! assert_eq!(value, parsed);
//!
//! let total = value + Money::from_cents(500);
//! assert_eq!(total.cents(), 14_090);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction stays total; admission rejects non-positive values
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serialized as the raw cent count; wire types that carry
///   amounts in reais use [`decimal`] instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// let value = Money::from_cents(150_000); // R$1500.00
    /// assert_eq!(value.cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(1000, 1).cents(), 100_001);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a whole percentage and rounds to the nearest cent.
    ///
    /// ## Rounding
    /// `value × percent / 100` is computed on cents with half-up rounding
    /// (half away from zero for negative amounts), which is the same as
    /// rounding the decimal product to 2 places.
    ///
    /// ```text
    /// R$0.10 × 15% = 1.5 cents → 2 cents
    /// R$1000.01 × 15% = 15000.15 cents → 15000 cents
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// let value = Money::from_cents(100_000);
    /// assert_eq!(value.percentage(10).cents(), 10_000);
    /// assert_eq!(Money::from_cents(10).percentage(15).cents(), 2);
    /// ```
    pub fn percentage(&self, percent: u32) -> Money {
        // i128 keeps large totals from overflowing before the division
        let scaled = self.0 as i128 * percent as i128;
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal strings such as `"135.9"`, `"1000.01"` or `"1500"`.
///
/// A comma is accepted as the decimal separator. More than two fractional
/// digits is rejected rather than silently rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "value".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = match unsigned.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most 2 decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for amounts written in reais (`135.9`, `"1000,01"`, `1500`).
///
/// Use with `#[serde(with = "cashback_core::money::decimal")]`.
///
/// ## Accepted Input
/// ```text
/// 135.9      float   → 13590 cents (rounded to the nearest cent)
/// 1500       integer → 150000 cents (whole reais)
/// "1000.01"  string  → 100001 cents (Money::from_str)
/// ```
///
/// Output is always a JSON number in reais, e.g. `135.9`.
pub mod decimal {
    use super::Money;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    // Beyond 2^53 cents an f64 no longer holds every cent
    const MAX_FLOAT_CENTS: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.cents() as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an amount in reais, as a number or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom("amount too large"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            let v = i64::try_from(v).map_err(|_| E::custom("amount too large"))?;
            self.visit_i64(v)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            if !v.is_finite() {
                return Err(E::custom("amount must be a finite number"));
            }
            let cents = (v * 100.0).round();
            if cents.abs() > MAX_FLOAT_CENTS {
                return Err(E::custom("amount too large"));
            }
            Ok(Money::from_cents(cents as i64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            v.parse().map_err(E::custom)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `R$1500.00` (debugging and logs).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R${}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(13_590);
        assert_eq!(money.cents(), 13_590);
        assert_eq!(money.reais(), 135);
        assert_eq!(money.cents_part(), 90);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(100_001).to_string(), "R$1000.01");
        assert_eq!(Money::from_cents(500).to_string(), "R$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$5.50");
    }

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!("135.9".parse::<Money>().unwrap().cents(), 13_590);
        assert_eq!("1000.01".parse::<Money>().unwrap().cents(), 100_001);
        assert_eq!("1500".parse::<Money>().unwrap().cents(), 150_000);
        assert_eq!("1,99".parse::<Money>().unwrap().cents(), 199);
        assert_eq!("0.0".parse::<Money>().unwrap().cents(), 0);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-2.50".parse::<Money>().unwrap().cents(), -250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_percentage_rounding() {
        // R$1000.00 at 10% = R$100.00
        assert_eq!(Money::from_cents(100_000).percentage(10).cents(), 10_000);
        // R$1000.01 at 15% = 15000.15 cents → 15000
        assert_eq!(Money::from_cents(100_001).percentage(15).cents(), 15_000);
        // R$1500.01 at 20% = 30000.2 cents → 30000
        assert_eq!(Money::from_cents(150_001).percentage(20).cents(), 30_000);
        // exact half rounds up
        assert_eq!(Money::from_cents(10).percentage(15).cents(), 2);
        assert_eq!(Money::from_cents(-10).percentage(15).cents(), -2);
    }

    #[derive(Debug, serde::Deserialize, serde::Serialize)]
    struct Amount {
        #[serde(with = "decimal")]
        value: Money,
    }

    #[test]
    fn test_decimal_wire_format() {
        let read = |json: &str| serde_json::from_str::<Amount>(json).map(|a| a.value.cents());

        assert_eq!(read(r#"{"value": 135.9}"#).unwrap(), 13_590);
        assert_eq!(read(r#"{"value": 1000.01}"#).unwrap(), 100_001);
        assert_eq!(read(r#"{"value": 100}"#).unwrap(), 10_000);
        assert_eq!(read(r#"{"value": "1500,5"}"#).unwrap(), 150_050);
        assert_eq!(read(r#"{"value": -2.5}"#).unwrap(), -250);
        assert!(read(r#"{"value": "abc"}"#).is_err());
        assert!(read(r#"{"value": true}"#).is_err());
        assert!(read(r#"{"value": 1e300}"#).is_err());

        let json = serde_json::to_value(Amount {
            value: Money::from_cents(13_590),
        })
        .unwrap();
        assert_eq!(json["value"], 135.9);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let total: Money = [a, b, Money::from_cents(1)].into_iter().sum();
        assert_eq!(total.cents(), 1501);

        let mut running = Money::zero();
        running += a;
        assert!(running.is_positive());
        assert!(!running.is_zero());
    }
}
