//! # Validation Module
//!
//! Rejects malformed listings before any arithmetic runs.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fail-Fast Validation                               │
//! │                                                                         │
//! │  Product A                         Product B                            │
//! │  ├── 1. name non-empty             ├── 5. name non-empty                │
//! │  ├── 2. name ≤ 100 chars           ├── 6. name ≤ 100 chars              │
//! │  ├── 3. 0 < price ≤ 999,999.99     ├── 7. 0 < price ≤ 999,999.99        │
//! │  ├── 4. 0 < quantity ≤ 99,999.99   ├── 8. 0 < quantity ≤ 99,999.99      │
//! │  └── 4b. 0 ≤ tax rate ≤ 1          └── 8b. 0 ≤ tax rate ≤ 1             │
//! │                                                                         │
//! │  The FIRST failing check is returned. Violations are not collected.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricewise_core::{validate, Money, ProductListing, Unit, ValidationError, ProductSide};
//! use rust_decimal_macros::dec;
//!
//! let a = ProductListing::new("Z", Money::ZERO, dec!(1), Unit::Gram);
//! let b = ProductListing::new("Y", Money::from_minor(100), dec!(1), Unit::Gram);
//!
//! assert_eq!(
//!     validate(&a, &b),
//!     Err(ValidationError::InvalidPrice(ProductSide::A, Money::ZERO))
//! );
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ProductListing, ProductSide, TaxRate};
use crate::{MAX_NAME_CHARS, MAX_PRICE, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates both listings, Product A first.
pub fn validate(product_a: &ProductListing, product_b: &ProductListing) -> ValidationResult<()> {
    validate_listing(product_a, ProductSide::A)?;
    validate_listing(product_b, ProductSide::B)
}

/// Validates one listing in fixed order: name → price → quantity → tax rate.
pub fn validate_listing(listing: &ProductListing, side: ProductSide) -> ValidationResult<()> {
    validate_product_name(&listing.name, side)?;
    validate_price(listing.price, side)?;
    validate_quantity(listing.quantity, side)?;
    validate_tax_rate(listing.tax_rate, side)
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters (Unicode scalar values, not bytes)
///
/// ```rust
/// use pricewise_core::validation::validate_product_name;
/// use pricewise_core::ProductSide;
///
/// assert!(validate_product_name("Basmati Rice 5kg", ProductSide::A).is_ok());
/// assert!(validate_product_name("   ", ProductSide::A).is_err());
/// ```
pub fn validate_product_name(name: &str, side: ProductSide) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName(side));
    }

    let chars = name.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong(side, chars));
    }

    Ok(())
}

/// Validates a shelf price: `0 < price ≤ 999,999.99`.
pub fn validate_price(price: Money, side: ProductSide) -> ValidationResult<()> {
    if !price.is_positive() || price.amount() > MAX_PRICE {
        return Err(ValidationError::InvalidPrice(side, price));
    }

    Ok(())
}

/// Validates a package quantity: `0 < quantity ≤ 99,999.99`.
pub fn validate_quantity(quantity: Decimal, side: ProductSide) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO || quantity > MAX_QUANTITY {
        return Err(ValidationError::InvalidQuantity(side, quantity));
    }

    Ok(())
}

/// Validates a tax rate fraction: `0 ≤ rate ≤ 1`.
///
/// Checked even for tax-inclusive listings, where the rate is otherwise
/// ignored.
pub fn validate_tax_rate(rate: TaxRate, side: ProductSide) -> ValidationResult<()> {
    let fraction = rate.fraction();
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ValidationError::InvalidTaxRate(side, fraction));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
