//! # Product Normalizer
//!
//! Turns a validated listing into numbers that can be compared directly.
//!
//! ```text
//! ProductListing ─┬─ tax_included? ── yes ──► final_price = price (exact)
//!                 │                └─ no ───► final_price = round(price × (1 + rate))
//!                 │
//!                 ├─ quantity × factor / comparison factor ──► quantity
//!                 │
//!                 └─ round(final_price ÷ quantity) ──────────► unit_price
//! ```
//!
//! Rounding is half-even to two decimal places throughout.

use rust_decimal::Decimal;

use crate::error::{ComparisonError, CoreResult};
use crate::money::Money;
use crate::types::{NormalizedProduct, ProductListing, ProductSide};
use crate::units::{self, Unit};

/// Tax-final price of a listing.
///
/// Tax-inclusive prices pass through untouched, with no rounding applied.
pub fn final_price(listing: &ProductListing) -> CoreResult<Money> {
    if listing.tax_included {
        return Ok(listing.price);
    }
    listing
        .price
        .with_tax(listing.tax_rate)
        .ok_or(ComparisonError::CalculationOverflow)
}

/// Listing quantity expressed in `target`.
///
/// `target` must share the listing unit's category; the engine guarantees
/// this by checking compatibility first.
pub fn comparison_quantity(listing: &ProductListing, target: Unit) -> CoreResult<Decimal> {
    if !units::are_compatible(listing.unit, target) {
        return Err(ComparisonError::IncompatibleUnits(listing.unit, target));
    }
    units::convert(listing.quantity, listing.unit, target).ok_or(ComparisonError::CalculationOverflow)
}

/// Price per one unit, rounded half-even. A zero quantity gives zero.
pub fn unit_price(final_price: Money, quantity: Decimal) -> CoreResult<Money> {
    final_price
        .per(quantity)
        .ok_or(ComparisonError::CalculationOverflow)
}

/// Normalizes one listing against the comparison unit.
pub fn normalize(
    listing: &ProductListing,
    side: ProductSide,
    target: Unit,
) -> CoreResult<NormalizedProduct> {
    let final_price = final_price(listing)?;
    let quantity = comparison_quantity(listing, target)?;
    let unit_price = unit_price(final_price, quantity)?;

    Ok(NormalizedProduct {
        side,
        final_price,
        quantity,
        unit: target,
        unit_price,
        tax_applied: !listing.tax_included,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
