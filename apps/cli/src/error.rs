//! # CLI Error Types
//!
//! Everything that can go wrong between the shell and the engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Error                  Exit code   Example                             │
//! │  ─────────────────────  ─────────   ──────────────────────────────────  │
//! │  InvalidListing         2           "Rice:abc:5:kg" (price not numeric) │
//! │  Comparison             2           gram vs milliliter                  │
//! │  InvalidConfig / Toml   1           tax_rate = "lots"                   │
//! │  Io / Json              1           unreadable output pipe              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Engine errors are translated into a corrective hint here; the engine
//! itself only reports what went wrong.

use pricewise_core::{ComparisonError, ValidationError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A listing argument could not be parsed.
    #[error("Invalid listing '{input}': {reason}")]
    InvalidListing { input: String, reason: String },

    /// The engine rejected the listings.
    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    // =========================================================================
    // Output / System Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Comparison(err.into())
    }
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidListing { .. } | CliError::Comparison(_) => 2,
            CliError::InvalidConfig(_) | CliError::Toml(_) | CliError::Io(_) | CliError::Json(_) => 1,
        }
    }

    /// A corrective suggestion for the user, when one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::InvalidListing { .. } => {
                Some("listings look like NAME:PRICE:QUANTITY:UNIT[:TAX], e.g. \"Rice 5kg:1400:5:kg:incl\"")
            }
            CliError::Comparison(err) => Some(comparison_hint(err)),
            CliError::InvalidConfig(_) | CliError::Toml(_) => {
                Some("check the config file or PRICEWISE_* environment variables")
            }
            CliError::Io(_) | CliError::Json(_) => None,
        }
    }
}

fn comparison_hint(err: &ComparisonError) -> &'static str {
    match err {
        ComparisonError::Validation(ValidationError::EmptyName(_)) => "give each product a name",
        ComparisonError::Validation(ValidationError::NameTooLong(..)) => {
            "shorten the product name to 100 characters or fewer"
        }
        ComparisonError::Validation(ValidationError::InvalidPrice(..)) => {
            "enter a price above 0 and no more than 999999.99"
        }
        ComparisonError::Validation(ValidationError::InvalidQuantity(..)) => {
            "enter a quantity above 0 and no more than 99999.99"
        }
        ComparisonError::Validation(ValidationError::InvalidTaxRate(..)) => {
            "enter the tax rate as a fraction (0.08) or percentage (8%) between 0 and 100%"
        }
        ComparisonError::IncompatibleUnits(..) => {
            "both products must be measured the same way: weight, volume, or count (run `pricewise units`)"
        }
        ComparisonError::CalculationOverflow | ComparisonError::DivisionByZero => {
            "check that the price and quantity were entered correctly"
        }
    }
}
