//! # Output Rendering
//!
//! Text and JSON renderings of comparison results.
//!
//! ## Text Layout
//! ```text
//! Winner: Product A (Rice 5kg)
//!
//!   Product A  Rice 5kg      280.00 per kg
//!   Product B  Rice 2kg      325.00 per kg
//!   Difference               45.00 per kg (13.85%)
//!
//! Calculation:
//!   1. Product A: 1400.00 ÷ 5 = 280.00 (kg)
//!   2. Product B: 650.00 ÷ 2 = 325.00 (kg)
//!
//! Recommendations:
//!   - Product A (Rice 5kg) is the better value at 280.00 per kg versus 325.00.
//! ```

use pricewise_core::units::REGISTRY;
use pricewise_core::{EnrichedComparison, ProductSide, UnitCategory, Winner};
use serde_json::json;
use std::fmt::Write;

use crate::error::CliResult;

/// Human-readable report.
pub fn comparison_text(enriched: &EnrichedComparison) -> String {
    let result = &enriched.base;
    let details = &result.details;
    let unit = details.common_unit_label.as_str();
    let mut out = String::new();

    let headline = match result.winner.side() {
        Some(side) => format!("{} ({})", side.label(), result.listing(side).name.trim()),
        None => "Tie".to_string(),
    };
    let _ = writeln!(out, "Winner: {}", headline);
    let _ = writeln!(out);

    let name_width = result
        .product_a
        .name
        .trim()
        .chars()
        .count()
        .max(result.product_b.name.trim().chars().count());

    for side in [ProductSide::A, ProductSide::B] {
        let marker = if result.winner.side() == Some(side) { " ✓" } else { "" };
        let _ = writeln!(
            out,
            "  {}  {:<width$}  {:>12} per {}{}",
            side.label(),
            result.listing(side).name.trim(),
            result.unit_price(side).to_string(),
            unit,
            marker,
            width = name_width
        );
    }
    let _ = writeln!(
        out,
        "  Difference  {:<width$} {:>12} per {} ({:.2}%)",
        "",
        details.absolute_difference.to_string(),
        unit,
        details.percentage_difference,
        width = name_width
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Calculation:");
    for (i, step) in details.calculation_trace.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recommendations:");
    for note in enriched.recommendations() {
        let _ = writeln!(out, "  - {}", note);
    }

    out.trim_end().to_string()
}

/// The enriched result as pretty JSON.
pub fn comparison_json(enriched: &EnrichedComparison) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(enriched)?)
}

/// Confirmation that both listings passed validation.
pub fn validation_text() -> String {
    "Both listings are valid.".to_string()
}

pub fn validation_json() -> CliResult<String> {
    Ok(serde_json::to_string_pretty(&json!({ "valid": true }))?)
}

/// The unit registry grouped by category.
pub fn units_text() -> String {
    let mut out = String::new();
    for category in [UnitCategory::Weight, UnitCategory::Volume, UnitCategory::Count] {
        let base = category.base_unit();
        let _ = writeln!(out, "{} (base: {})", category, base.symbol());
        for spec in REGISTRY.iter().filter(|s| s.category == category) {
            let _ = writeln!(
                out,
                "  {:<6} = {} {}   aliases: {}",
                spec.symbol,
                spec.factor.normalize(),
                base.symbol(),
                spec.aliases.join(", ")
            );
        }
    }
    out.trim_end().to_string()
}

pub fn units_json() -> CliResult<String> {
    let units: Vec<_> = REGISTRY
        .iter()
        .map(|spec| {
            json!({
                "unit": spec.unit,
                "category": spec.category,
                "symbol": spec.symbol,
                "factor": spec.factor.normalize().to_string(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&units)?)
}

/// Short label for log lines.
pub fn winner_label(winner: Winner) -> &'static str {
    match winner {
        Winner::ProductA => "A",
        Winner::ProductB => "B",
        Winner::Tie => "tie",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricewise_core::{compare, Money, ProductListing, Unit};
    use rust_decimal_macros::dec;

    fn rice() -> EnrichedComparison {
        let a = ProductListing::new("Rice 5kg", Money::from_minor(140_000), dec!(5), Unit::Kilogram);
        let b = ProductListing::new("Rice 2kg", Money::from_minor(65_000), dec!(2), Unit::Kilogram);
        EnrichedComparison::unenriched(compare(&a, &b).unwrap())
    }

    #[test]
    fn test_text_report() {
        let text = comparison_text(&rice());
        assert!(text.starts_with("Winner: Product A (Rice 5kg)"));
        assert!(text.contains("280.00 per kg ✓"));
        assert!(text.contains("45.00 per kg (13.85%)"));
        assert!(text.contains("  1. Product A: 1400.00 ÷ 5 = 280.00 (kg)"));
        assert!(text.contains("  - Moderate savings: Product A is 13.85% cheaper per kg."));
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value = serde_json::from_str(&comparison_json(&rice()).unwrap()).unwrap();
        assert_eq!(json["base"]["winner"], "product_a");
        assert_eq!(json["base"]["details"]["unitPriceA"], "280.00");
        assert_eq!(json["base"]["details"]["percentageDifference"], "13.85");
        assert!(json["insights"].is_null());
    }

    #[test]
    fn test_units_listing() {
        let text = units_text();
        assert!(text.starts_with("weight (base: g)"));
        assert!(text.contains("kg     = 1000 g"));
        assert!(text.contains("volume (base: ml)"));
        assert!(text.contains("dozen  = 12 piece"));

        let json: serde_json::Value = serde_json::from_str(&units_json().unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), REGISTRY.len());
    }
}
