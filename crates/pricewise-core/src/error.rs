//! # Error Types
//!
//! Domain-specific error types for pricewise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricewise-core errors (this file)                                     │
//! │  ├── ValidationError  - A listing failed an input rule                 │
//! │  ├── ComparisonError  - compare() aborted (wraps ValidationError)      │
//! │  └── HistoryError     - Price history lookup failed (never fatal)      │
//! │                                                                         │
//! │  CLI errors (apps/cli)                                                 │
//! │  └── CliError         - What the terminal user sees                    │
//! │                                                                         │
//! │  Flow: ValidationError → ComparisonError → CliError → stderr           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Closed enums, matched exhaustively by callers
//! 2. Every variant names the side (A/B) and carries the offending value
//! 3. No retries: the engine is a pure function, retrying changes nothing

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;
use crate::types::ProductSide;
use crate::units::Unit;

// =============================================================================
// Validation Error
// =============================================================================

/// A listing failed an input rule.
///
/// Only the first failing rule is reported (name → price → quantity →
/// tax rate, Product A before Product B).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty or only whitespace.
    #[error("Product {0} name is required")]
    EmptyName(ProductSide),

    /// Name exceeds the character limit. Carries the length in characters.
    #[error("Product {0} name is {1} characters long; the limit is 100")]
    NameTooLong(ProductSide, usize),

    #[error("Product {0} price {1} must be greater than 0 and at most 999999.99")]
    InvalidPrice(ProductSide, Money),

    #[error("Product {0} quantity {1} must be greater than 0 and at most 99999.99")]
    InvalidQuantity(ProductSide, Decimal),

    /// Rate is outside `[0, 1]`. Carries the fraction as given.
    #[error("Product {0} tax rate {1} must be between 0 and 1")]
    InvalidTaxRate(ProductSide, Decimal),
}

impl ValidationError {
    /// Which listing failed.
    pub fn side(&self) -> ProductSide {
        match self {
            ValidationError::EmptyName(side)
            | ValidationError::NameTooLong(side, _)
            | ValidationError::InvalidPrice(side, _)
            | ValidationError::InvalidQuantity(side, _)
            | ValidationError::InvalidTaxRate(side, _) => *side,
        }
    }
}

// =============================================================================
// Comparison Error
// =============================================================================

/// Why `compare` produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Units belong to different categories (e.g. weight vs volume).
    ///
    /// Always terminal: no cross-category result is ever produced.
    #[error("Cannot compare {0} ({cat_a}) with {1} ({cat_b})", cat_a = .0.category(), cat_b = .1.category())]
    IncompatibleUnits(Unit, Unit),

    /// Decimal arithmetic overflowed. Unreachable for validated listings.
    #[error("Calculation overflowed the supported numeric range")]
    CalculationOverflow,

    /// Reserved; the normalizer maps a zero quantity to a zero unit price.
    #[error("Division by zero while computing a unit price")]
    DivisionByZero,
}

// =============================================================================
// History Error
// =============================================================================

/// A price history lookup failed. Enrichment degrades instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The history backend could not be reached or read.
    #[error("Price history unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with data we could not interpret.
    #[error("Malformed price history: {0}")]
    Malformed(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with ComparisonError.
pub type CoreResult<T> = Result<T, ComparisonError>;

// =============================================================================
// Unit Tests
// =============================================================================
