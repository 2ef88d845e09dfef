//! # Listing Input Parser
//!
//! Turns a command-line argument into a [`ProductListing`].
//!
//! ## Syntax
//! ```text
//!   NAME:PRICE:QUANTITY:UNIT[:TAX]
//!
//!   "Rice 5kg:1400:5:kg"             tax handled by config defaults
//!   "Rice 5kg:1400:5:kg:incl"        price already includes tax
//!   "Widget:1000:1:piece:10%"        price excludes 10% tax
//!   "Widget:1000:1:piece:0.10"       same, as a fraction
//!   "Cola 2:1:1.85:2:L"              colons inside NAME are fine
//! ```
//!
//! Only syntax is checked here. Range rules (price > 0, rate ≤ 1, …) belong
//! to the engine's validation layer so every caller gets the same errors.

use pricewise_core::{Money, ProductListing, TaxRate, Unit};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::DefaultsConfig;
use crate::error::{CliError, CliResult};

/// How the TAX field (or its absence) treats the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaxSpec {
    Included,
    Excluded(TaxRate),
}

/// Parses `NAME:PRICE:QUANTITY:UNIT[:TAX]`.
pub fn parse_listing(raw: &str, defaults: &DefaultsConfig) -> CliResult<ProductListing> {
    let invalid = |reason: String| CliError::InvalidListing {
        input: raw.to_string(),
        reason,
    };

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 4 {
        return Err(invalid(
            "expected NAME:PRICE:QUANTITY:UNIT[:TAX]".to_string(),
        ));
    }

    // A trailing field that is a unit means TAX was omitted.
    let last = parts[parts.len() - 1];
    let (fields, tax_field) = if Unit::from_str(last).is_ok() {
        (&parts[..], None)
    } else if parts.len() >= 5 {
        (&parts[..parts.len() - 1], Some(last))
    } else {
        return Err(invalid(format!("unknown unit '{}'", last.trim())));
    };

    let n = fields.len();
    let name = fields[..n - 3].join(":");
    let price = parse_decimal(fields[n - 3]).ok_or_else(|| {
        invalid(format!("price '{}' is not a number", fields[n - 3].trim()))
    })?;
    let quantity = parse_decimal(fields[n - 2]).ok_or_else(|| {
        invalid(format!("quantity '{}' is not a number", fields[n - 2].trim()))
    })?;
    let unit = Unit::from_str(fields[n - 1]).map_err(|err| invalid(err.to_string()))?;

    let tax = match tax_field {
        Some(field) => parse_tax(field).map_err(invalid)?,
        None => default_tax(defaults),
    };

    let listing = ProductListing::new(name.trim(), Money::from_decimal(price), quantity, unit);
    Ok(match tax {
        TaxSpec::Included => listing,
        TaxSpec::Excluded(rate) => listing.with_tax_excluded(rate),
    })
}

fn default_tax(defaults: &DefaultsConfig) -> TaxSpec {
    if defaults.tax_included {
        TaxSpec::Included
    } else {
        TaxSpec::Excluded(TaxRate::from_fraction(defaults.tax_rate))
    }
}

/// Accepts `incl`, `included`, `inc`, a percentage (`8.25%`) or a fraction
/// (`0.0825`).
fn parse_tax(field: &str) -> Result<TaxSpec, String> {
    let field = field.trim();
    match field.to_lowercase().as_str() {
        "incl" | "inc" | "included" | "tax-included" => return Ok(TaxSpec::Included),
        _ => {}
    }

    if let Some(percent) = field.strip_suffix('%') {
        return parse_decimal(percent)
            .map(|p| TaxSpec::Excluded(TaxRate::from_percent(p)))
            .ok_or_else(|| format!("tax rate '{}' is not a percentage", field));
    }

    parse_decimal(field)
        .map(|f| TaxSpec::Excluded(TaxRate::from_fraction(f)))
        .ok_or_else(|| format!("tax field '{}' is neither 'incl' nor a rate", field))
}

/// Parses a decimal, tolerating surrounding whitespace, `_` separators and
/// `,` thousands separators.
///
/// A comma is only accepted between groups of exactly three integer digits
/// (`1,299.99`). Anything else, such as a decimal comma (`1,5`), is rejected
/// instead of being read as a different number.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.contains(',') && !has_valid_thousands_groups(trimmed) {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != '_' && *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

fn has_valid_thousands_groups(s: &str) -> bool {
    let unsigned = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return false;
    }

    let mut groups = integer.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()));
    first_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn defaults() -> DefaultsConfig {
        DefaultsConfig::default()
    }

    #[test]
    fn test_parse_minimal_listing() {
        let listing = parse_listing("Rice 5kg:1400:5:kg", &defaults()).unwrap();
        assert_eq!(listing.name, "Rice 5kg");
        assert_eq!(listing.price, Money::from_decimal(dec!(1400)));
        assert_eq!(listing.quantity, dec!(5));
        assert_eq!(listing.unit, Unit::Kilogram);
        assert!(listing.tax_included);
    }

    #[test]
    fn test_parse_tax_fields() {
        let l = parse_listing("W:1000:1:piece:10%", &defaults()).unwrap();
        assert!(!l.tax_included);
        assert_eq!(l.tax_rate.fraction(), dec!(0.10));

        let l = parse_listing("W:1000:1:piece:0.0825", &defaults()).unwrap();
        assert_eq!(l.tax_rate.fraction(), dec!(0.0825));

        let l = parse_listing("W:1000:1:piece:incl", &defaults()).unwrap();
        assert!(l.tax_included);
    }

    #[test]
    fn test_defaults_apply_when_tax_omitted() {
        let defaults = DefaultsConfig {
            tax_rate: dec!(0.08),
            tax_included: false,
        };
        let l = parse_listing("Soap:2.50:3:pcs", &defaults).unwrap();
        assert!(!l.tax_included);
        assert_eq!(l.tax_rate.fraction(), dec!(0.08));
    }

    #[test]
    fn test_name_may_contain_colons() {
        let l = parse_listing("Cola 2:1:1.85:2:L", &defaults()).unwrap();
        assert_eq!(l.name, "Cola 2:1");
        assert_eq!(l.unit, Unit::Liter);

        let l = parse_listing("Ratio 3:2 mix:4.00:250:g:5%", &defaults()).unwrap();
        assert_eq!(l.name, "Ratio 3:2 mix");
        assert_eq!(l.quantity, dec!(250));
    }

    #[test]
    fn test_digit_separators() {
        let l = parse_listing("TV:1,299.99:1:piece", &defaults()).unwrap();
        assert_eq!(l.price, Money::from_decimal(dec!(1299.99)));

        let l = parse_listing("Sofa:12,345,678:1:piece", &defaults()).unwrap();
        assert_eq!(l.price, Money::from_decimal(dec!(12345678)));

        let l = parse_listing("Flour:1_000:2:kg", &defaults()).unwrap();
        assert_eq!(l.price, Money::from_decimal(dec!(1000)));
    }

    #[test]
    fn test_decimal_comma_is_rejected() {
        let err = parse_listing("Milk:1,5:1:L", &defaults()).unwrap_err();
        assert!(err.to_string().contains("price '1,5' is not a number"));

        let err = parse_listing("Milk:2:1,25:L", &defaults()).unwrap_err();
        assert!(err.to_string().contains("quantity '1,25' is not a number"));

        assert!(parse_listing("X:1,2345:1:g", &defaults()).is_err());
        assert!(parse_listing("X:1.5,00:1:g", &defaults()).is_err());
        assert!(parse_listing("X:,500:1:g", &defaults()).is_err());
    }

    #[test]
    fn test_range_is_not_checked_here() {
        // Zero price parses; the engine rejects it.
        let l = parse_listing("Z:0:1:g", &defaults()).unwrap();
        assert!(l.price.is_zero());
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_listing("Rice:1400:kg", &defaults()).unwrap_err();
        assert!(err.to_string().contains("expected NAME:PRICE:QUANTITY:UNIT"));

        let err = parse_listing("Rice:abc:5:kg", &defaults()).unwrap_err();
        assert!(err.to_string().contains("price 'abc' is not a number"));

        let err = parse_listing("Rice:1400:five:kg", &defaults()).unwrap_err();
        assert!(err.to_string().contains("quantity 'five' is not a number"));

        let err = parse_listing("Rice:1400:5:stone", &defaults()).unwrap_err();
        assert!(err.to_string().contains("unknown unit 'stone'"));

        let err = parse_listing("Rice:1400:5:kg:lots", &defaults()).unwrap_err();
        assert!(err.to_string().contains("neither 'incl' nor a rate"));
    }
}
