//! # pricewise-core: Pure Comparison Engine for Pricewise
//!
//! This crate is the **heart** of Pricewise. It decides which of two shelf
//! listings is the better per-unit value, using pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pricewise Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (apps/cli, or any UI)                    │   │
//! │  │    parse raw input ──► ProductListing × 2 ──► render result     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pricewise-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐   │   │
//! │  │   │  units   │  │ validation │  │ normalizer │  │  engine  │   │   │
//! │  │   │ registry │  │ fail-fast  │  │ tax, qty   │  │ compare  │   │   │
//! │  │   └──────────┘  └────────────┘  └────────────┘  └────┬─────┘   │   │
//! │  │                                                      │         │   │
//! │  │                                              ┌───────▼──────┐  │   │
//! │  │                                              │  enrichment  │  │   │
//! │  │                                              │ (decorator)  │  │   │
//! │  │                                              └──────────────┘  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit registry (categories, factors, parsing)
//! - [`money`] - Decimal-backed Money and half-even rounding
//! - [`types`] - Listings, normalized products, results
//! - [`validation`] - Fail-fast listing validation
//! - [`normalizer`] - Tax-final price and comparison-unit quantity
//! - [`engine`] - The `compare` pipeline
//! - [`enrichment`] - Optional price-history decorator
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, safe on any thread
//! 2. **No I/O**: history lookups are a trait the caller implements
//! 3. **Decimal Money**: `rust_decimal` everywhere, never `f64`
//! 4. **Explicit Errors**: closed enums, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pricewise_core::{compare, ComparisonError, Money, ProductListing, Unit};
//! use rust_decimal_macros::dec;
//!
//! let sugar = ProductListing::new("Sugar", Money::from_minor(300), dec!(500), Unit::Gram);
//! let milk = ProductListing::new("Milk", Money::from_minor(200), dec!(1), Unit::Liter);
//!
//! // Weight and volume never compare
//! assert_eq!(
//!     compare(&sugar, &milk),
//!     Err(ComparisonError::IncompatibleUnits(Unit::Gram, Unit::Liter))
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod enrichment;
pub mod error;
pub mod money;
pub mod normalizer;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::compare;
pub use enrichment::{
    enrich, generate_advanced_recommendations, EnrichedComparison, HistoricalInsights,
    PriceHistory, PriceHistorySource, PricePoint,
};
pub use error::{ComparisonError, CoreResult, HistoryError, ValidationError};
pub use money::Money;
pub use types::*;
pub use units::{Unit, UnitCategory};
pub use validation::validate;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted product name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Highest accepted shelf price.
pub const MAX_PRICE: Decimal = dec!(999999.99);

/// Highest accepted package quantity.
pub const MAX_QUANTITY: Decimal = dec!(99999.99);

/// Unit prices closer than this are a tie.
pub const TIE_THRESHOLD: Decimal = dec!(0.01);

/// Upper bound of `percentage_difference`, keeping it inside `[0, 100)`.
pub const MAX_PERCENTAGE_DIFFERENCE: Decimal = dec!(99.99);

/// Above this percentage difference the savings note says "significant".
pub const SIGNIFICANT_SAVINGS_PERCENT: Decimal = dec!(20);

/// Above this percentage difference the savings note says "moderate".
pub const MODERATE_SAVINGS_PERCENT: Decimal = dec!(10);

/// `|qA - qB| / max(qA, qB)` above this earns a package-size note.
pub const QUANTITY_DISPARITY_RATIO: Decimal = dec!(0.5);

/// Average unit price above this earns a "double-check your input" note.
pub const HIGH_PRICE_TIER: Decimal = dec!(1000);
