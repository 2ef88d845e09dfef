//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Fixed-Point Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    650.0 / 2000.0 → 0.325 may be stored as 0.32499999...               │
//! │    so "round to cents" silently disagrees across platforms             │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    650 / 2000 = 0.325 exactly                                           │
//! │    round_half_even(0.325) = 0.32 on every machine                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listing prices may be in any currency with two minor digits. Unit prices
//! (price per gram, per piece…) are `Money` too, rounded to the same scale.
//!
//! ## Usage
//! ```rust
//! use pricewise_core::money::Money;
//! use pricewise_core::types::TaxRate;
//! use rust_decimal_macros::dec;
//!
//! let price = Money::from_minor(100_000); // 1000.00
//! let taxed = price.with_tax(TaxRate::from_fraction(dec!(0.10))).unwrap();
//! assert_eq!(taxed.to_string(), "1100.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::types::TaxRate;

/// Number of fractional digits every rounded monetary value carries.
pub const MONEY_SCALE: u32 = 2;

/// Rounds to two decimal places using round-half-to-even (Bankers Rounding).
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  BANKERS ROUNDING (Round Half to Even)                              │
/// │                                                                     │
/// │  Half-up always rounds 0.5 UP, causing systematic bias:            │
/// │    0.125 → 0.13, 0.135 → 0.14, 0.145 → 0.15                        │
/// │                                                                     │
/// │  Half-even rounds 0.5 to the nearest EVEN digit:                   │
/// │    0.125 → 0.12, 0.135 → 0.14, 0.145 → 0.14                        │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The result always carries exactly two fractional digits, so `280` comes
/// back as `280.00` and serializes the same way as an input typed with cents.
#[inline]
pub fn round_half_even(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount backed by a fixed-point decimal.
///
/// ## Where Money is Used
/// ```text
/// ProductListing.price ──► with_tax() ──► NormalizedProduct.final_price
///                                              │
///                                              ▼ per(quantity)
///                                         NormalizedProduct.unit_price
///                                              │
///                                              ▼
///                              ComparisonDetails.unit_price_a / _b
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero money value, at cent scale.
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Wraps a decimal amount as-is (no rounding).
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from minor units (cents).
    ///
    /// ```rust
    /// use pricewise_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1099).to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, MONEY_SCALE))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns this amount rounded half-to-even to two decimal places.
    #[inline]
    pub fn round_bankers(self) -> Money {
        Money(round_half_even(self.0))
    }

    /// The amount as entered when it has sub-cent digits (`10.015`),
    /// otherwise the usual two-digit form.
    pub fn to_exact_string(&self) -> String {
        if self.0.scale() > MONEY_SCALE {
            self.0.normalize().to_string()
        } else {
            self.to_string()
        }
    }

    /// Absolute distance between two amounts.
    #[inline]
    pub fn abs_diff(self, other: Money) -> Money {
        Money((self.0 - other.0).abs())
    }

    /// Adds tax at `rate` and rounds the result to cents.
    ///
    /// Returns `None` only if the multiplication overflows the decimal range.
    ///
    /// ## Example
    /// ```rust
    /// use pricewise_core::money::Money;
    /// use pricewise_core::types::TaxRate;
    /// use rust_decimal_macros::dec;
    ///
    /// let price = Money::from_minor(1000); // 10.00
    /// let taxed = price.with_tax(TaxRate::from_fraction(dec!(0.0825))).unwrap();
    /// // 10.00 × 1.0825 = 10.825 → 10.82 (half-even)
    /// assert_eq!(taxed, Money::from_minor(1082));
    /// ```
    pub fn with_tax(self, rate: TaxRate) -> Option<Money> {
        let multiplier = Decimal::ONE.checked_add(rate.fraction())?;
        self.0
            .checked_mul(multiplier)
            .map(|gross| Money(round_half_even(gross)))
    }

    /// Price of one unit when this amount buys `quantity` units, rounded
    /// to cents.
    ///
    /// A zero quantity yields zero rather than an error. Returns `None` only
    /// on decimal overflow.
    pub fn per(self, quantity: Decimal) -> Option<Money> {
        if quantity.is_zero() {
            return Some(Money::ZERO);
        }
        self.0
            .checked_div(quantity)
            .map(|each| Money(round_half_even(each)))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Always two fractional digits, rounded half-even, no currency symbol: the
/// engine does not know which currency the listing was priced in.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", round_half_even(self.0))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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
