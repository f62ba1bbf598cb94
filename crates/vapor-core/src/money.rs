//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The POS screen computes totals in JavaScript:                          │
//! │    150 * 1.05 = 157.50000000000003  ❌                                  │
//! │                                                                         │
//! │  Summing thousands of such values in a yearly report drifts.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "157.50000000000003" ──parse──► 15750 cents                         │
//! │    All sums happen on i64, the wire sees 157.5                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! JSON carries money as a decimal number in major units (`157.5`), which is
//! what the UI already renders with `toFixed(2)`. Incoming values may be a
//! JSON number or a numeric string; both go through [`Money::from_str`].
//!
//! ## Usage
//! ```rust
//! use vapor_core::money::Money;
//!
//! let price: Money = "15".parse().unwrap();
//! let line = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line.cents(), 4500);
//!
//! // Client float noise is rounded to the nearest cent
//! let total: Money = "157.50000000000003".parse().unwrap();
//! assert_eq!(total.cents(), 15750);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise / cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed; negatives are rejected by
///   validation, not by the type
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: decimal number on the wire, cents everywhere else
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use vapor_core::money::Money;
    ///
    /// let price = Money::from_cents(1550); // ₹15.50
    /// assert_eq!(price.cents(), 1550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Major units as a float, for the JSON wire only.
    ///
    /// Never do arithmetic on the result.
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Calculates tax using Bankers Rounding (round half to even).
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
    /// │    0.5 → 1, 1.5 → 2, 2.5 → 3, 3.5 → 4 (always up = +bias)         │
    /// │                                                                     │
    /// │  Bankers Rounding rounds 0.5 to nearest EVEN number:               │
    /// │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4 (alternates = no bias)      │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ```rust
    /// use vapor_core::money::Money;
    /// use vapor_core::types::TaxRate;
    ///
    /// let gst = TaxRate::from_bps(500); // 5%
    ///
    /// // ₹10.10 × 5% = ₹0.505 → ₹0.50 (half to even)
    /// assert_eq!(Money::from_cents(1010).calculate_tax(gst).cents(), 50);
    /// // ₹10.30 × 5% = ₹0.515 → ₹0.52 (half to even)
    /// assert_eq!(Money::from_cents(1030).calculate_tax(gst).cents(), 52);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps amount * bps from overflowing on large amounts
        let product = self.0 as i128 * rate.bps() as i128;
        let tax = div_round_half_even(product, 10_000);
        // only rates above 100% can leave the i64 range; saturate so a later
        // checked_add reports the overflow
        Money::from_cents(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ```rust
    /// use vapor_core::money::Money;
    ///
    /// let chai = Money::from_cents(1500);
    /// assert_eq!(chai.checked_multiply_quantity(4), Some(Money::from_cents(6000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    ///
    /// Sums over client-supplied amounts go through this, never through `+`.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

/// Integer division rounding ties to the even quotient.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder.abs() * 2;

    if twice > denominator || (twice == denominator && quotient % 2 != 0) {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Errors from parsing a decimal money string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("empty value")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    Invalid(String),

    #[error("value is too large")]
    Overflow,
}

/// Parses a decimal string (`"15"`, `"15.5"`, `"-3.25"`, `"1.5e2"`) into cents.
///
/// Digits beyond the second decimal place are rounded half to even.
impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        // "." and "-" alone are not amounts
        if !s.bytes().any(|b| b.is_ascii_digit()) {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }

        let parsed = if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)
        } else {
            Decimal::from_str(s)
        };
        let value = parsed.map_err(|_| MoneyParseError::Invalid(s.to_string()))?;

        value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or(MoneyParseError::Overflow)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyParseError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyParseError::Overflow))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        // Display prints the shortest string that round-trips, never NaN here
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable rupee amount, for logs and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
