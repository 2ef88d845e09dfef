//! # Comparison Engine
//!
//! Orchestrates one comparison from raw listings to an immutable result.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Validate ──► CheckUnitCompatibility ──► Normalize ──► DetermineWinner  │
//! │     │                  │                                     │          │
//! │     ▼                  ▼                                     ▼          │
//! │  ValidationError  IncompatibleUnits               ComputePercentage     │
//! │  (abort)          (abort)                                    │          │
//! │                                                              ▼          │
//! │                         Return ◄── BuildRecommendations ◄── BuildTrace  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is linear and never loops back. Only the first two stages can
//! fail; once normalization starts the result is always produced.
//!
//! ## Example
//! ```rust
//! use pricewise_core::{compare, Money, ProductListing, Unit, Winner};
//! use rust_decimal_macros::dec;
//!
//! let a = ProductListing::new("Rice 5kg", Money::from_minor(140_000), dec!(5), Unit::Kilogram);
//! let b = ProductListing::new("Rice 2kg", Money::from_minor(65_000), dec!(2), Unit::Kilogram);
//!
//! let result = compare(&a, &b).unwrap();
//! assert_eq!(result.winner, Winner::ProductA);
//! assert_eq!(result.details.unit_price_a.to_string(), "280.00");
//! assert_eq!(result.details.percentage_difference, dec!(13.85));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{ComparisonError, CoreResult};
use crate::money::{round_half_even, Money};
use crate::normalizer::normalize;
use crate::types::{
    ComparisonDetails, ComparisonResult, NormalizedProduct, ProductListing, ProductSide, Winner,
};
use crate::units::{self, Unit};
use crate::validation::validate;
use crate::{
    HIGH_PRICE_TIER, MAX_PERCENTAGE_DIFFERENCE, MODERATE_SAVINGS_PERCENT,
    QUANTITY_DISPARITY_RATIO, SIGNIFICANT_SAVINGS_PERCENT, TIE_THRESHOLD,
};

// =============================================================================
// Entry Point
// =============================================================================

/// Compares two listings and returns which is the better per-unit value.
///
/// ## Errors
/// - `ComparisonError::Validation` for the first listing rule violated
/// - `ComparisonError::IncompatibleUnits` when the units measure different
///   things (weight vs volume); no arithmetic runs in that case
///
/// The function is pure: identical inputs always give identical output, and
/// it is safe to call from any number of threads at once.
pub fn compare(
    product_a: &ProductListing,
    product_b: &ProductListing,
) -> CoreResult<ComparisonResult> {
    validate(product_a, product_b)?;

    if !units::are_compatible(product_a.unit, product_b.unit) {
        return Err(ComparisonError::IncompatibleUnits(product_a.unit, product_b.unit));
    }

    let unit = units::comparison_unit(product_a.unit, product_b.unit);
    let norm_a = normalize(product_a, ProductSide::A, unit)?;
    let norm_b = normalize(product_b, ProductSide::B, unit)?;

    let winner = determine_winner(norm_a.unit_price, norm_b.unit_price);
    let percentage = percentage_difference(norm_a.unit_price, norm_b.unit_price);

    let calculation_trace = build_trace(product_a, product_b, &norm_a, &norm_b, unit);
    let recommendations = build_recommendations(product_a, product_b, &norm_a, &norm_b, winner, percentage);

    debug!(
        %winner,
        unit_price_a = %norm_a.unit_price,
        unit_price_b = %norm_b.unit_price,
        unit = unit.symbol(),
        "comparison complete"
    );

    Ok(ComparisonResult {
        product_a: product_a.clone(),
        product_b: product_b.clone(),
        winner,
        details: ComparisonDetails {
            unit_price_a: norm_a.unit_price,
            unit_price_b: norm_b.unit_price,
            absolute_difference: norm_a.unit_price.abs_diff(norm_b.unit_price),
            percentage_difference: percentage,
            common_unit_label: unit.symbol().to_string(),
            calculation_trace,
        },
        recommendations,
    })
}

// =============================================================================
// Winner & Percentage
// =============================================================================

/// Tie when the unit prices differ by less than 0.01, otherwise the cheaper
/// side wins.
pub fn determine_winner(unit_price_a: Money, unit_price_b: Money) -> Winner {
    if unit_price_a.abs_diff(unit_price_b).amount() < TIE_THRESHOLD {
        Winner::Tie
    } else if unit_price_a < unit_price_b {
        Winner::ProductA
    } else {
        Winner::ProductB
    }
}

/// How much cheaper the lower unit price is, as a percentage of the higher.
///
/// Rounded half-even to two places. Zero when both prices are zero. Capped at
/// 99.99: both listings have a positive price, so a 100% gap only appears
/// when the cheaper unit price rounds down to 0.00.
pub fn percentage_difference(unit_price_a: Money, unit_price_b: Money) -> Decimal {
    let (max, min) = if unit_price_a >= unit_price_b {
        (unit_price_a.amount(), unit_price_b.amount())
    } else {
        (unit_price_b.amount(), unit_price_a.amount())
    };

    if max.is_zero() {
        return round_half_even(Decimal::ZERO);
    }

    let percentage = round_half_even((max - min) / max * Decimal::ONE_HUNDRED);
    percentage.min(MAX_PERCENTAGE_DIFFERENCE)
}

// =============================================================================
// Trace
// =============================================================================

/// Ordered derivation log: tax lines, unit line, then one division per side.
fn build_trace(
    product_a: &ProductListing,
    product_b: &ProductListing,
    norm_a: &NormalizedProduct,
    norm_b: &NormalizedProduct,
    unit: Unit,
) -> Vec<String> {
    let mut trace = Vec::with_capacity(5);

    for (listing, norm) in [(product_a, norm_a), (product_b, norm_b)] {
        if norm.tax_applied {
            trace.push(format!(
                "{}: added {} tax to {} → final price {}",
                norm.side.label(),
                listing.tax_rate,
                listing.price.to_exact_string(),
                norm.final_price
            ));
        }
    }

    if product_a.unit != product_b.unit {
        trace.push(format!(
            "Units differ ({} vs {}); converted both quantities to the common base unit {}",
            product_a.unit, product_b.unit, unit
        ));
    }

    for norm in [norm_a, norm_b] {
        trace.push(format!(
            "{}: {} ÷ {} = {} ({})",
            norm.side.label(),
            norm.final_price.to_exact_string(),
            norm.quantity.normalize(),
            norm.unit_price,
            unit
        ));
    }

    trace
}

// =============================================================================
// Recommendations
// =============================================================================

/// Advisory text, in order: headline, at most one savings tier, quantity
/// disparity, high price tier.
fn build_recommendations(
    product_a: &ProductListing,
    product_b: &ProductListing,
    norm_a: &NormalizedProduct,
    norm_b: &NormalizedProduct,
    winner: Winner,
    percentage: Decimal,
) -> Vec<String> {
    let unit = norm_a.unit;
    let mut notes = Vec::with_capacity(4);

    match winner {
        Winner::Tie => notes.push(format!(
            "Both products cost about the same per {} ({} vs {}); choose by preference.",
            unit, norm_a.unit_price, norm_b.unit_price
        )),
        Winner::ProductA | Winner::ProductB => {
            let (best, best_listing, other) = if winner == Winner::ProductA {
                (norm_a, product_a, norm_b)
            } else {
                (norm_b, product_b, norm_a)
            };
            notes.push(format!(
                "{} ({}) is the better value at {} per {} versus {}.",
                best.side.label(),
                best_listing.name.trim(),
                best.unit_price,
                unit,
                other.unit_price
            ));

            if percentage > SIGNIFICANT_SAVINGS_PERCENT {
                notes.push(format!(
                    "Significant savings: {} is {:.2}% cheaper per {}.",
                    best.side.label(),
                    percentage,
                    unit
                ));
            } else if percentage > MODERATE_SAVINGS_PERCENT {
                notes.push(format!(
                    "Moderate savings: {} is {:.2}% cheaper per {}.",
                    best.side.label(),
                    percentage,
                    unit
                ));
            }
        }
    }

    let larger = norm_a.quantity.max(norm_b.quantity);
    if !larger.is_zero()
        && (norm_a.quantity - norm_b.quantity).abs() / larger > QUANTITY_DISPARITY_RATIO
    {
        notes.push(format!(
            "Package sizes differ considerably ({} {} vs {} {}); buy the larger pack only if you will use it all.",
            norm_a.quantity.normalize(),
            unit,
            norm_b.quantity.normalize(),
            unit
        ));
    }

    let average = (norm_a.unit_price.amount() + norm_b.unit_price.amount()) / Decimal::TWO;
    if average > HIGH_PRICE_TIER {
        notes.push(format!(
            "Both unit prices are in a high price tier (average {} per {}); double-check the entered units and quantities.",
            Money::from_decimal(average).round_bankers(),
            unit
        ));
    }

    notes
}

// =============================================================================
// Unit Tests
// =============================================================================
