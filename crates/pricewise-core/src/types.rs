//! # Domain Types
//!
//! Core domain types used throughout Pricewise.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                    DERIVED                  OUTPUT               │
//! │  ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐  │
//! │  │ ProductListing  │────►│ NormalizedProduct│────►│ComparisonResult │  │
//! │  │  name           │     │  final_price     │     │  product_a/_b   │  │
//! │  │  price          │     │  quantity        │     │  winner         │  │
//! │  │  quantity, unit │     │  unit_price      │     │  details        │  │
//! │  │  tax_included   │     └──────────────────┘     │  recommendations│  │
//! │  │  tax_rate       │                              └─────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   ProductSide   │   │     Winner      │       │
//! │  │  fraction 0..=1 │   │   A | B         │   │ ProductA|B|Tie  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every type here is created fresh per comparison and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::units::Unit;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a fraction: `0.10` means 10%.
///
/// Range checking (`0 ≤ rate ≤ 1`) is the validation layer's job, so a
/// `TaxRate` can hold an out-of-range value long enough to be rejected with
/// the offending number attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a fraction (`0.0825` = 8.25%).
    #[inline]
    pub const fn from_fraction(fraction: Decimal) -> Self {
        TaxRate(fraction)
    }

    /// Creates a tax rate from a percentage (`8.25` = 8.25%).
    #[inline]
    pub fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent / Decimal::ONE_HUNDRED)
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage with trailing zeros removed.
    pub fn percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// =============================================================================
// Product Side
// =============================================================================

/// Which of the two compared listings a value or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProductSide {
    A,
    B,
}

impl ProductSide {
    /// Human label used in traces and recommendations ("Product A").
    pub fn label(&self) -> &'static str {
        match self {
            ProductSide::A => "Product A",
            ProductSide::B => "Product B",
        }
    }
}

impl fmt::Display for ProductSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSide::A => write!(f, "A"),
            ProductSide::B => write!(f, "B"),
        }
    }
}

// =============================================================================
// Product Listing
// =============================================================================

/// One shelf listing supplied by the caller.
///
/// The caller (CLI, UI) is responsible for turning raw user input into this
/// type. Nothing here is checked at construction; `validate` does that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    /// Display name, 1-100 characters.
    pub name: String,

    /// Shelf price, `0 < price ≤ 999,999.99`.
    #[ts(as = "String")]
    pub price: Money,

    /// Package quantity in `unit`, `0 < quantity ≤ 99,999.99`.
    #[ts(as = "String")]
    pub quantity: Decimal,

    pub unit: Unit,

    /// Whether `price` already contains tax.
    pub tax_included: bool,

    /// Applied only when `tax_included` is false.
    #[ts(as = "String")]
    pub tax_rate: TaxRate,
}

impl ProductListing {
    /// Creates a tax-inclusive listing.
    pub fn new(name: impl Into<String>, price: Money, quantity: Decimal, unit: Unit) -> Self {
        ProductListing {
            name: name.into(),
            price,
            quantity,
            unit,
            tax_included: true,
            tax_rate: TaxRate::zero(),
        }
    }

    /// Marks the price as excluding tax at `rate`.
    pub fn with_tax_excluded(mut self, rate: TaxRate) -> Self {
        self.tax_included = false;
        self.tax_rate = rate;
        self
    }
}

// =============================================================================
// Normalized Product
// =============================================================================

/// A listing reduced to comparable numbers. Derived per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProduct {
    pub side: ProductSide,
    /// Tax-final price.
    pub final_price: Money,
    /// Quantity expressed in the comparison unit.
    pub quantity: Decimal,
    /// Unit the quantity is expressed in.
    pub unit: Unit,
    /// Price per one comparison unit, rounded half-even to cents.
    pub unit_price: Money,
    /// True when tax was added to the shelf price.
    pub tax_applied: bool,
}

// =============================================================================
// Winner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    ProductA,
    ProductB,
    /// Unit prices differ by less than the tie threshold.
    Tie,
}

impl Winner {
    /// The same outcome seen with A and B swapped.
    pub fn mirror(&self) -> Winner {
        match self {
            Winner::ProductA => Winner::ProductB,
            Winner::ProductB => Winner::ProductA,
            Winner::Tie => Winner::Tie,
        }
    }

    /// Winning side, or `None` for a tie.
    pub fn side(&self) -> Option<ProductSide> {
        match self {
            Winner::ProductA => Some(ProductSide::A),
            Winner::ProductB => Some(ProductSide::B),
            Winner::Tie => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::ProductA => write!(f, "Product A"),
            Winner::ProductB => write!(f, "Product B"),
            Winner::Tie => write!(f, "Tie"),
        }
    }
}

// =============================================================================
// Comparison Output
// =============================================================================

/// The numbers behind a verdict, plus the trace that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDetails {
    #[ts(as = "String")]
    pub unit_price_a: Money,
    #[ts(as = "String")]
    pub unit_price_b: Money,
    #[ts(as = "String")]
    pub absolute_difference: Money,
    /// Relative to the larger unit price, in `[0, 100)`.
    #[ts(as = "String")]
    pub percentage_difference: Decimal,
    /// Symbol of the unit both unit prices are expressed per ("kg", "g").
    pub common_unit_label: String,
    /// Ordered, human-readable derivation steps.
    pub calculation_trace: Vec<String>,
}

/// Immutable outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub product_a: ProductListing,
    pub product_b: ProductListing,
    pub winner: Winner,
    pub details: ComparisonDetails,
    pub recommendations: Vec<String>,
}

impl ComparisonResult {
    /// The listing on `side`.
    pub fn listing(&self, side: ProductSide) -> &ProductListing {
        match side {
            ProductSide::A => &self.product_a,
            ProductSide::B => &self.product_b,
        }
    }

    /// Unit price of the listing on `side`.
    pub fn unit_price(&self, side: ProductSide) -> Money {
        match side {
            ProductSide::A => self.details.unit_price_a,
            ProductSide::B => self.details.unit_price_b,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
