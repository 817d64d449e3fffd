//! # Cashback Tier Engine
//!
//! Maps a reseller's monthly purchase total to a cashback percentage and
//! computes the cashback earned by each purchase.
//!
//! ## Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Monthly total (inclusive of the purchase itself)   │  Cashback        │
//! │  ─────────────────────────────────────────────────  │  ──────────────  │
//! │  total ≤ R$1000.00                                   │  10%             │
//! │  R$1000.00 < total ≤ R$1500.00                       │  15%             │
//! │  total > R$1500.00                                   │  20%             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here takes the monthly total as an argument. Fetching it
//! is the store's job; nothing is cached, so a purchase's cashback moves up
//! a tier when later purchases in the same month push the total past a limit.

use serde::Serialize;

use crate::money::Money;

/// Upper bound (inclusive) of the 10% tier.
pub const TIER_ONE_LIMIT: Money = Money::from_cents(100_000);

/// Upper bound (inclusive) of the 15% tier.
pub const TIER_TWO_LIMIT: Money = Money::from_cents(150_000);

/// Percentages paid by each tier, lowest first.
pub const TIER_PERCENTS: [u8; 3] = [10, 15, 20];

/// Returns the cashback percent for a monthly total.
///
/// ## Example
/// ```rust
/// use cashback_core::cashback::tier_percent;
/// use cashback_core::money::Money;
///
/// assert_eq!(tier_percent(Money::from_cents(100_000)), 10);
/// assert_eq!(tier_percent(Money::from_cents(100_001)), 15);
/// assert_eq!(tier_percent(Money::from_cents(150_000)), 15);
/// assert_eq!(tier_percent(Money::from_cents(150_001)), 20);
/// ```
pub fn tier_percent(total: Money) -> u8 {
    if total > TIER_TWO_LIMIT {
        TIER_PERCENTS[2]
    } else if total > TIER_ONE_LIMIT {
        TIER_PERCENTS[1]
    } else {
        TIER_PERCENTS[0]
    }
}

/// Cashback earned by a purchase: `value × percent / 100`, rounded to cents.
pub fn cashback_value(purchase_value: Money, percent: u8) -> Money {
    purchase_value.percentage(u32::from(percent))
}

/// Percent and amount earned by a single purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cashback {
    pub percent: u8,
    pub value: Money,
}

impl Cashback {
    /// Cashback for a purchase given its month's total.
    ///
    /// ## User Workflow
    /// ```text
    /// list_purchases(2021-10)
    ///      │
    ///      ▼
    /// store.sum_purchase_values(reseller, 2021-10) → R$1100.00
    ///      │
    ///      ▼
    /// Cashback::for_purchase(R$1100.00, R$1100.00) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// { percent: 15, value: R$165.00 }
    /// ```
    pub fn for_purchase(purchase_value: Money, monthly_total: Money) -> Cashback {
        let percent = tier_percent(monthly_total);
        Cashback {
            percent,
            value: cashback_value(purchase_value, percent),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_percent(Money::zero()), 10);
        assert_eq!(tier_percent(Money::from_cents(100)), 10);
        assert_eq!(tier_percent(Money::from_major_minor(1000, 0)), 10);
        assert_eq!(tier_percent(Money::from_major_minor(1000, 1)), 15);
        assert_eq!(tier_percent(Money::from_major_minor(1500, 0)), 15);
        assert_eq!(tier_percent(Money::from_major_minor(1500, 1)), 20);
        assert_eq!(tier_percent(Money::from_major_minor(1_000_000, 0)), 20);
    }

    #[test]
    fn test_tier_one_limit_purchase() {
        // Single purchase of R$1000.00 → 10%, R$100.00 back
        let value = Money::from_major_minor(1000, 0);
        let cashback = Cashback::for_purchase(value, value);
        assert_eq!(cashback.percent, 10);
        assert_eq!(cashback.value, Money::from_major_minor(100, 0));
    }

    #[test]
    fn test_cashback_values_per_tier() {
        assert_eq!(cashback_value(Money::from_cents(100), 10).cents(), 10);
        assert_eq!(cashback_value(Money::from_cents(110_000), 15).cents(), 16_500);
        assert_eq!(cashback_value(Money::from_cents(160_000), 20).cents(), 32_000);
        // R$1000.01 × 15% = R$150.0015 → R$150.00
        assert_eq!(cashback_value(Money::from_cents(100_001), 15).cents(), 15_000);
        // R$1500.01 × 20% = R$300.002 → R$300.00
        assert_eq!(cashback_value(Money::from_cents(150_001), 20).cents(), 30_000);
    }

    #[test]
    fn test_small_purchase_rides_monthly_total() {
        // A R$1.99 purchase in a month already above R$1500 earns 20%
        let cashback = Cashback::for_purchase(
            Money::from_cents(199),
            Money::from_cents(160_199),
        );
        assert_eq!(cashback.percent, 20);
        assert_eq!(cashback.value.cents(), 40); // 39.8 → 40
    }

    #[test]
    fn test_pure_and_repeatable() {
        let a = Cashback::for_purchase(Money::from_cents(4_999), Money::from_cents(120_000));
        let b = Cashback::for_purchase(Money::from_cents(4_999), Money::from_cents(120_000));
        assert_eq!(a, b);
    }
}
