//! # Unit Registry
//!
//! Static table of every unit a listing can be priced in.
//!
//! ## Categories and Base Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category   Base unit    Members (factor to base)                       │
//! │  ─────────  ───────────  ─────────────────────────────────────────────  │
//! │  Weight     gram  (g)    mg 0.001 · kg 1000 · oz 28.3495 · lb 453.592   │
//! │  Volume     ml    (ml)   L 1000 · fl oz 29.5735 · cup 200 · gal 3785.41 │
//! │  Count      piece        pair 2 · dozen 12                              │
//! │                                                                         │
//! │  Comparison is only meaningful inside one category:                    │
//! │    kg ↔ lb ✅     cup ↔ L ✅     g ↔ ml ❌ (IncompatibleUnits)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Factors are fixed constants. Adding a unit means adding an enum variant
//! and a matching `REGISTRY` row; there is no runtime registration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// Unit Category
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Weight,
    Volume,
    Count,
}

impl UnitCategory {
    /// The unit every member of this category converts into.
    pub const fn base_unit(self) -> Unit {
        match self {
            UnitCategory::Weight => Unit::Gram,
            UnitCategory::Volume => Unit::Milliliter,
            UnitCategory::Count => Unit::Piece,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitCategory::Weight => write!(f, "weight"),
            UnitCategory::Volume => write!(f, "volume"),
            UnitCategory::Count => write!(f, "count"),
        }
    }
}

// =============================================================================
// Unit
// =============================================================================

/// A unit of measure a listing can be priced in.
///
/// Variant order must match `REGISTRY` row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    FluidOunce,
    Cup,
    Gallon,
    Piece,
    Pair,
    Dozen,
}

/// One row of the registry.
#[derive(Debug)]
pub struct UnitSpec {
    pub unit: Unit,
    pub category: UnitCategory,
    /// How many base units one of this unit is worth.
    pub factor: Decimal,
    /// Short display label.
    pub symbol: &'static str,
    /// Accepted spellings when parsing user input (lowercase).
    pub aliases: &'static [&'static str],
}

/// The registry table.
pub static REGISTRY: [UnitSpec; 13] = [
    UnitSpec {
        unit: Unit::Milligram,
        category: UnitCategory::Weight,
        factor: dec!(0.001),
        symbol: "mg",
        aliases: &["mg", "milligram", "milligrams"],
    },
    UnitSpec {
        unit: Unit::Gram,
        category: UnitCategory::Weight,
        factor: dec!(1),
        symbol: "g",
        aliases: &["g", "gr", "gram", "grams"],
    },
    UnitSpec {
        unit: Unit::Kilogram,
        category: UnitCategory::Weight,
        factor: dec!(1000),
        symbol: "kg",
        aliases: &["kg", "kilo", "kilos", "kilogram", "kilograms"],
    },
    UnitSpec {
        unit: Unit::Ounce,
        category: UnitCategory::Weight,
        factor: dec!(28.3495),
        symbol: "oz",
        aliases: &["oz", "ounce", "ounces"],
    },
    UnitSpec {
        unit: Unit::Pound,
        category: UnitCategory::Weight,
        factor: dec!(453.592),
        symbol: "lb",
        aliases: &["lb", "lbs", "pound", "pounds"],
    },
    UnitSpec {
        unit: Unit::Milliliter,
        category: UnitCategory::Volume,
        factor: dec!(1),
        symbol: "ml",
        aliases: &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
    },
    UnitSpec {
        unit: Unit::Liter,
        category: UnitCategory::Volume,
        factor: dec!(1000),
        symbol: "L",
        aliases: &["l", "liter", "liters", "litre", "litres"],
    },
    UnitSpec {
        unit: Unit::FluidOunce,
        category: UnitCategory::Volume,
        factor: dec!(29.5735),
        symbol: "fl oz",
        aliases: &["fl oz", "floz", "fl_oz", "fluid_ounce", "fluid ounce", "fluid ounces"],
    },
    UnitSpec {
        unit: Unit::Cup,
        category: UnitCategory::Volume,
        factor: dec!(200),
        symbol: "cup",
        aliases: &["cup", "cups"],
    },
    UnitSpec {
        unit: Unit::Gallon,
        category: UnitCategory::Volume,
        factor: dec!(3785.41),
        symbol: "gal",
        aliases: &["gal", "gallon", "gallons"],
    },
    UnitSpec {
        unit: Unit::Piece,
        category: UnitCategory::Count,
        factor: dec!(1),
        symbol: "piece",
        aliases: &["piece", "pieces", "pc", "pcs", "item", "items", "ea", "each"],
    },
    UnitSpec {
        unit: Unit::Pair,
        category: UnitCategory::Count,
        factor: dec!(2),
        symbol: "pair",
        aliases: &["pair", "pairs"],
    },
    UnitSpec {
        unit: Unit::Dozen,
        category: UnitCategory::Count,
        factor: dec!(12),
        symbol: "dozen",
        aliases: &["dozen", "dz"],
    },
];

impl Unit {
    /// Every unit, in registry order.
    pub const ALL: [Unit; 13] = [
        Unit::Milligram,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Liter,
        Unit::FluidOunce,
        Unit::Cup,
        Unit::Gallon,
        Unit::Piece,
        Unit::Pair,
        Unit::Dozen,
    ];

    pub fn all() -> impl Iterator<Item = Unit> {
        Unit::ALL.into_iter()
    }

    /// The registry row for this unit.
    #[inline]
    pub fn spec(self) -> &'static UnitSpec {
        &REGISTRY[self as usize]
    }

    #[inline]
    pub fn category(self) -> UnitCategory {
        self.spec().category
    }

    #[inline]
    pub fn factor(self) -> Decimal {
        self.spec().factor
    }

    #[inline]
    pub fn symbol(self) -> &'static str {
        self.spec().symbol
    }

    /// The base unit of this unit's category.
    #[inline]
    pub fn base_unit(self) -> Unit {
        self.category().base_unit()
    }

    #[inline]
    pub fn is_base(self) -> bool {
        self.base_unit() == self
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when a unit name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        REGISTRY
            .iter()
            .find(|spec| spec.aliases.contains(&wanted.as_str()))
            .map(|spec| spec.unit)
            .ok_or_else(|| UnknownUnit(s.trim().to_string()))
    }
}

// =============================================================================
// Registry Operations
// =============================================================================

/// Converts `quantity` of `unit` into the category base unit.
#[inline]
pub fn convert_to_base(unit: Unit, quantity: Decimal) -> Decimal {
    quantity * unit.factor()
}

/// True when both units belong to the same category.
#[inline]
pub fn are_compatible(a: Unit, b: Unit) -> bool {
    a.category() == b.category()
}

/// Display label of a category's base unit.
#[inline]
pub fn base_label(category: UnitCategory) -> &'static str {
    category.base_unit().symbol()
}

/// Converts between two units of the same category.
///
/// Returns `None` across categories or on decimal overflow. Converting a
/// unit into itself returns `quantity` untouched.
pub fn convert(quantity: Decimal, from: Unit, to: Unit) -> Option<Decimal> {
    if !are_compatible(from, to) {
        return None;
    }
    if from == to {
        return Some(quantity);
    }
    quantity
        .checked_mul(from.factor())?
        .checked_div(to.factor())
}

/// The unit two compatible listings are compared in.
///
/// Identical units stay as they are (per-kg prices for two kg listings);
/// anything else falls back to the category base unit.
pub fn comparison_unit(a: Unit, b: Unit) -> Unit {
    if a == b {
        a
    } else {
        a.category().base_unit()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_rows_match_discriminants() {
        for (index, spec) in REGISTRY.iter().enumerate() {
            assert_eq!(spec.unit as usize, index, "{:?} is out of order", spec.unit);
        }
    }

    #[test]
    fn test_every_category_base_has_factor_one() {
        for category in [UnitCategory::Weight, UnitCategory::Volume, UnitCategory::Count] {
            let base = category.base_unit();
            assert_eq!(base.factor(), Decimal::ONE);
            assert_eq!(base.category(), category);
            assert!(base.is_base());
        }
    }

    #[test]
    fn test_base_labels() {
        assert_eq!(base_label(UnitCategory::Weight), "g");
        assert_eq!(base_label(UnitCategory::Volume), "ml");
        assert_eq!(base_label(UnitCategory::Count), "piece");
    }

    #[test]
    fn test_convert_to_base() {
        assert_eq!(convert_to_base(Unit::Kilogram, dec!(5)), dec!(5000));
        assert_eq!(convert_to_base(Unit::Pound, dec!(2)), dec!(907.184));
        assert_eq!(convert_to_base(Unit::Cup, dec!(1.5)), dec!(300));
        assert_eq!(convert_to_base(Unit::Dozen, dec!(2)), dec!(24));
        assert_eq!(convert_to_base(Unit::Gram, dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_compatibility() {
        assert!(are_compatible(Unit::Kilogram, Unit::Pound));
        assert!(are_compatible(Unit::Cup, Unit::Liter));
        assert!(are_compatible(Unit::Piece, Unit::Dozen));
        assert!(!are_compatible(Unit::Gram, Unit::Milliliter));
        assert!(!are_compatible(Unit::Piece, Unit::Kilogram));
    }

    #[test]
    fn test_convert_between_units() {
        assert_eq!(convert(dec!(2), Unit::Liter, Unit::Milliliter), Some(dec!(2000)));
        assert_eq!(convert(dec!(500), Unit::Gram, Unit::Kilogram), Some(dec!(0.5)));
        assert_eq!(convert(dec!(3), Unit::Kilogram, Unit::Kilogram), Some(dec!(3)));
        assert_eq!(convert(dec!(1), Unit::Gram, Unit::Milliliter), None);
    }

    #[test]
    fn test_comparison_unit() {
        assert_eq!(comparison_unit(Unit::Kilogram, Unit::Kilogram), Unit::Kilogram);
        assert_eq!(comparison_unit(Unit::Kilogram, Unit::Pound), Unit::Gram);
        assert_eq!(comparison_unit(Unit::Liter, Unit::Cup), Unit::Milliliter);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("kg".parse::<Unit>().unwrap(), Unit::Kilogram);
        assert_eq!("Kilograms".parse::<Unit>().unwrap(), Unit::Kilogram);
        assert_eq!(" L ".parse::<Unit>().unwrap(), Unit::Liter);
        assert_eq!("fl oz".parse::<Unit>().unwrap(), Unit::FluidOunce);
        assert_eq!("pcs".parse::<Unit>().unwrap(), Unit::Piece);
        assert_eq!("parsec".parse::<Unit>(), Err(UnknownUnit("parsec".to_string())));
    }

    #[test]
    fn test_every_symbol_parses_back() {
        for unit in Unit::all() {
            assert_eq!(unit.symbol().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Unit::FluidOunce).unwrap(), "\"fluid_ounce\"");
        let unit: Unit = serde_json::from_str("\"kilogram\"").unwrap();
        assert_eq!(unit, Unit::Kilogram);
    }
}
