//! # Money Module
//!
//! Provides `Money` (integer cents) and `Rate` (basis points).
//!
//! ## Cents vs Decimals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TWO NUMERIC WORLDS                                                     │
//! │                                                                         │
//! │  Ingredient costs are tiny and fractional:                              │
//! │    $20.00 per 1000 g  →  $0.02 per g  →  Decimal                        │
//! │    $35.00 per 24 pcs  →  $1.458333... →  Decimal                        │
//! │                                                                         │
//! │  Ledger totals are what the customer pays:                              │
//! │    Total Venta Bruto, Comision, Ganancia Neta  →  Money (i64 cents)     │
//! │                                                                         │
//! │  The bridge: Money::from_decimal rounds HALF AWAY FROM ZERO to cents    │
//! │    10.005 → 10.01     -10.005 → -10.01                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pantry_core::money::{Money, Rate};
//!
//! let price = Money::from_cents(4500); // $45.00
//! let card = Rate::from_bps(350).compound(Rate::from_bps(1600)); // 4.06%
//!
//! assert_eq!(card.bps(), 406);
//! assert_eq!(price.percentage(card).cents(), 183); // $1.827 → $1.83
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: losses are negative (net profit below zero)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: sums of absurd store values clamp at the
///   i64 bounds instead of panicking or wrapping
/// - **Derives**: full serde support for JSON output
///
/// ## Where Money is Used
/// ```text
/// PriceEntry.sale_price ──┬──► CartLine unit price ──► SaleLine.gross_total
///                         │
///                         └──► margin table ("$45.00")
///
/// SaleLine.subtotal ──► card commission ──► SaleLine.net_profit ──► dashboard
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use pantry_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Converts a decimal amount of currency into cents.
    ///
    /// Rounds half away from zero at the second decimal place. Values that do
    /// not fit in an `i64` of cents saturate.
    ///
    /// ```rust
    /// use pantry_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(10005, 3)).cents(), 1001); // 10.005
    /// assert_eq!(Money::from_decimal(Decimal::new(-10005, 3)).cents(), -1001);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|c| c.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|c| c.to_i64());
        match cents {
            Some(c) => Money(c),
            None => Money::saturated(amount.is_sign_negative()),
        }
    }

    const fn saturated(negative: bool) -> Self {
        if negative {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        }
    }

    /// Returns the value as a decimal amount of currency (`1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a whole quantity.
    ///
    /// ```rust
    /// use pantry_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a fractional quantity, rounding to cents.
    pub fn multiply_decimal(&self, qty: Decimal) -> Self {
        match self.to_decimal().checked_mul(qty) {
            Some(amount) => Money::from_decimal(amount),
            None => Money::saturated(self.0.is_negative() != qty.is_sign_negative()),
        }
    }

    /// Returns `rate` of this amount, rounded half away from zero.
    ///
    /// ## Implementation
    /// Integer math on i128: `(|amount| × bps + 5000) / 10000`, sign restored.
    ///
    /// ## Where It Is Used
    /// ```text
    /// Line gross: $90.00
    ///      │
    ///      ├── percentage(10% discount) ──► Descuento ($): $9.00
    ///      │
    ///      ▼
    /// Subtotal: $81.00
    ///      │
    ///      └── percentage(4.06% card)   ──► Comision ($): $3.29
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let signed = if self.0 < 0 { -magnitude } else { magnitude };
        i64::try_from(signed)
            .map(Money::from_cents)
            .unwrap_or(Money::saturated(self.0 < 0))
    }

    /// Returns this amount as a percentage of `whole` (`25.00` for a quarter).
    ///
    /// Zero when `whole` is zero.
    pub fn percent_of(&self, whole: Money) -> Decimal {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        (Decimal::from(self.0) * Decimal::ONE_HUNDRED / Decimal::from(whole.0))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$10.99` / `-$5.50`, no thousands grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// 350 bps = 3.5% card commission, 1600 bps = 16% VAT, 1000 bps = 10% discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const FULL: Rate = Rate(10_000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (`12.5` → 1250 bps).
    ///
    /// Rounded half away from zero to whole basis points; negative input
    /// clamps to zero.
    pub fn from_percentage(pct: Decimal) -> Self {
        if pct.is_sign_negative() {
            return Rate(0);
        }
        let bps = pct
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|b| b.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|b| b.to_u32());
        Rate(bps.unwrap_or(u32::MAX))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (`406` → `4.06`).
    #[inline]
    pub fn as_percentage(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2)
    }

    /// Returns the rate as a fraction (`406` → `0.0406`).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    /// Applies a surcharge rate on top of this one: `self × (1 + surcharge)`.
    ///
    /// The card commission is charged with VAT on top:
    /// `3.5% × (1 + 16%) = 4.06%`.
    pub fn compound(&self, surcharge: Rate) -> Rate {
        let bps = (self.0 as u128 * (10_000 + surcharge.0 as u128) + 5_000) / 10_000;
        Rate(u32::try_from(bps).unwrap_or(u32::MAX))
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Shows the rate as `4.06%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(123456)), "$1234.56");
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(10.005)).cents(), 1001);
        assert_eq!(Money::from_decimal(dec!(10.004)).cents(), 1000);
        assert_eq!(Money::from_decimal(dec!(-10.005)).cents(), -1001);
        assert_eq!(Money::from_decimal(dec!(0.125)).cents(), 13);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1099).to_decimal(), dec!(10.99));
        assert_eq!(Money::from_cents(-5).to_decimal(), dec!(-0.05));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));
        assert_eq!(max.multiply_quantity(2), max);
        assert_eq!(max * -2, Money::from_cents(i64::MIN));
        assert_eq!(-Money::from_cents(i64::MIN), max);

        let mut total = max;
        total += Money::from_cents(100);
        assert_eq!(total, max);
    }

    #[test]
    fn test_out_of_range_decimals_saturate() {
        assert_eq!(Money::from_decimal(Decimal::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_decimal(Decimal::MIN).cents(), i64::MIN);
        assert_eq!(Money::from_decimal(dec!(100000000000000000000)).cents(), i64::MAX);
        assert_eq!(Money::from_cents(100).multiply_decimal(Decimal::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_cents(-100).multiply_decimal(Decimal::MAX).cents(), i64::MIN);
        assert_eq!(Money::from_cents(i64::MAX).percentage(Rate::from_bps(u32::MAX)).cents(), i64::MAX);
        assert_eq!(Rate::from_percentage(Decimal::MAX).bps(), u32::MAX);
        assert_eq!(Rate::from_bps(u32::MAX).compound(Rate::from_bps(u32::MAX)).bps(), u32::MAX);
    }

    #[test]
    fn test_percentage() {
        let amount = Money::from_cents(9000);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).cents(), 900);

        // $45.00 × 4.06% = $1.827 → $1.83
        assert_eq!(Money::from_cents(4500).percentage(Rate::from_bps(406)).cents(), 183);

        // -$0.50 × 25% = -$0.125 → -$0.13
        assert_eq!(Money::from_cents(-50).percentage(Rate::from_bps(2500)).cents(), -13);
    }

    #[test]
    fn test_percent_of() {
        let part = Money::from_cents(2500);
        assert_eq!(part.percent_of(Money::from_cents(10000)), dec!(25));
        assert_eq!(part.percent_of(Money::zero()), Decimal::ZERO);
    }

    #[test]
    fn test_multiply_decimal() {
        let unit = Money::from_cents(1050);
        assert_eq!(unit.multiply_decimal(dec!(1.5)).cents(), 1575);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_card_rate_compounds_vat() {
        let card = Rate::from_bps(350).compound(Rate::from_bps(1600));
        assert_eq!(card.bps(), 406);
        assert_eq!(card.as_percentage(), dec!(4.06));
        assert_eq!(card.as_fraction(), dec!(0.0406));
        assert_eq!(card.to_string(), "4.06%");
    }

    #[test]
    fn test_rate_from_percentage() {
        assert_eq!(Rate::from_percentage(dec!(12.5)).bps(), 1250);
        assert_eq!(Rate::from_percentage(dec!(10)).bps(), 1000);
        assert_eq!(Rate::from_percentage(dec!(-3)).bps(), 0);
        assert_eq!(Rate::from_percentage(dec!(0.005)).bps(), 1);
    }
}
