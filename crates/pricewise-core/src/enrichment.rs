//! # History Enrichment
//!
//! Decorates a finished [`ComparisonResult`] with advice drawn from past
//! prices. The base result is never modified; enrichment only appends.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  compare(a, b) ──► ComparisonResult (final, immutable)                 │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  enrich(base, source) ── price_history(name A) ──┐                      │
//! │                       └─ price_history(name B) ──┤                      │
//! │                                                  ▼                      │
//! │                 Ok  ──► derive_insights ──► generate_advanced_recs      │
//! │                 Err ──► warn! and return base untouched                 │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  EnrichedComparison { base, insights, extra }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The history backend is a trait so the core stays free of I/O; the CLI
//! supplies a file-backed implementation and bounds it with a timeout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::HistoryError;
use crate::money::{round_half_even, Money};
use crate::types::{ComparisonResult, ProductSide, Winner};

/// A unit price more than this factor above the historical average earns a
/// "wait for a better price" note.
const ABOVE_AVERAGE_FACTOR: Decimal = dec!(1.10);

// =============================================================================
// History Types
// =============================================================================

/// One observed unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricePoint {
    #[ts(as = "String")]
    pub observed_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub unit_price: Money,
    /// Unit symbol the price was recorded per ("kg", "g", "piece").
    pub unit_label: String,
}

/// All known observations for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceHistory {
    pub product_name: String,
    pub points: Vec<PricePoint>,
}

/// Source of historical prices, keyed by product name.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// `Ok(None)` means the product has no recorded history.
    async fn price_history(&self, product_name: &str) -> Result<Option<PriceHistory>, HistoryError>;
}

// =============================================================================
// Insights
// =============================================================================

/// Summary of the observations that match the comparison unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInsight {
    pub observations: usize,
    #[ts(as = "String")]
    pub average: Money,
    #[ts(as = "String")]
    pub lowest: Money,
    /// Most recent observation.
    #[ts(as = "String")]
    pub latest: Money,
}

impl HistoryInsight {
    /// Summarizes the points recorded per `unit_label`. Points in any other
    /// unit are ignored; `None` if nothing matches.
    pub fn from_history(history: &PriceHistory, unit_label: &str) -> Option<Self> {
        let points: Vec<&PricePoint> = history
            .points
            .iter()
            .filter(|p| p.unit_label.eq_ignore_ascii_case(unit_label))
            .collect();

        let lowest = points.iter().map(|p| p.unit_price).min()?;
        let latest = points.iter().max_by_key(|p| p.observed_at)?.unit_price;
        let total: Decimal = points.iter().map(|p| p.unit_price.amount()).sum();
        let average = round_half_even(total / Decimal::from(points.len()));

        Some(HistoryInsight {
            observations: points.len(),
            average: Money::from_decimal(average),
            lowest,
            latest,
        })
    }
}

/// Per-side insights. A side without usable history is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalInsights {
    pub product_a: Option<HistoryInsight>,
    pub product_b: Option<HistoryInsight>,
}

impl HistoricalInsights {
    pub fn for_side(&self, side: ProductSide) -> Option<&HistoryInsight> {
        match side {
            ProductSide::A => self.product_a.as_ref(),
            ProductSide::B => self.product_b.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.product_a.is_none() && self.product_b.is_none()
    }
}

/// Builds insights for both sides in the result's comparison unit.
pub fn derive_insights(
    result: &ComparisonResult,
    history_a: Option<&PriceHistory>,
    history_b: Option<&PriceHistory>,
) -> HistoricalInsights {
    let unit = result.details.common_unit_label.as_str();
    HistoricalInsights {
        product_a: history_a.and_then(|h| HistoryInsight::from_history(h, unit)),
        product_b: history_b.and_then(|h| HistoryInsight::from_history(h, unit)),
    }
}

// =============================================================================
// Advanced Recommendations
// =============================================================================

/// History-aware advice, in order: side A note, side B note, then a note when
/// the losing product has historically been cheaper than today's winner.
pub fn generate_advanced_recommendations(
    result: &ComparisonResult,
    insights: &HistoricalInsights,
) -> Vec<String> {
    let unit = result.details.common_unit_label.as_str();
    let mut notes = Vec::new();

    for side in [ProductSide::A, ProductSide::B] {
        let Some(insight) = insights.for_side(side) else {
            continue;
        };
        let current = result.unit_price(side);

        if current < insight.lowest {
            notes.push(format!(
                "{} is below its lowest recorded price ({} vs previous low {} per {}).",
                side.label(),
                current,
                insight.lowest,
                unit
            ));
        } else if insight.average.is_positive()
            && current.amount() > insight.average.amount() * ABOVE_AVERAGE_FACTOR
        {
            let above = round_half_even(
                (current.amount() - insight.average.amount()) / insight.average.amount()
                    * Decimal::ONE_HUNDRED,
            );
            notes.push(format!(
                "{} costs {:.2}% more per {} than its historical average of {}; consider waiting for a better price.",
                side.label(),
                above,
                unit,
                insight.average
            ));
        }
    }

    if let Some(winner) = result.winner.side() {
        let loser = match winner {
            ProductSide::A => ProductSide::B,
            ProductSide::B => ProductSide::A,
        };
        let winner_price = result.unit_price(winner);
        if let Some(insight) = insights.for_side(loser) {
            if insight.lowest < winner_price {
                notes.push(format!(
                    "{} has sold for as little as {} per {}, below {}'s current {}; it may be worth waiting for a discount.",
                    loser.label(),
                    insight.lowest,
                    unit,
                    winner.label(),
                    winner_price
                ));
            }
        }
    }

    notes
}

// =============================================================================
// Decorator
// =============================================================================

/// A base comparison plus history-derived advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedComparison {
    pub base: ComparisonResult,
    /// `None` when enrichment was skipped or failed.
    pub insights: Option<HistoricalInsights>,
    pub extra_recommendations: Vec<String>,
}

impl EnrichedComparison {
    /// Wraps a base result with no enrichment.
    pub fn unenriched(base: ComparisonResult) -> Self {
        EnrichedComparison {
            base,
            insights: None,
            extra_recommendations: Vec::new(),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.insights.is_some()
    }

    /// Base recommendations followed by the history-derived ones.
    pub fn recommendations(&self) -> impl Iterator<Item = &str> {
        self.base
            .recommendations
            .iter()
            .chain(self.extra_recommendations.iter())
            .map(String::as_str)
    }
}

/// Looks up both products' history and appends advice to `base`.
///
/// Never fails: a lookup error is logged and the base result comes back
/// unmodified.
pub async fn enrich<S>(base: ComparisonResult, source: &S) -> EnrichedComparison
where
    S: PriceHistorySource + ?Sized,
{
    match lookup_histories(&base, source).await {
        Ok((history_a, history_b)) => {
            let insights = derive_insights(&base, history_a.as_ref(), history_b.as_ref());
            let extra_recommendations = generate_advanced_recommendations(&base, &insights);
            debug!(extra = extra_recommendations.len(), "comparison enriched with price history");
            EnrichedComparison {
                base,
                insights: Some(insights),
                extra_recommendations,
            }
        }
        Err(err) => {
            warn!(error = %err, "price history lookup failed; returning base comparison");
            EnrichedComparison::unenriched(base)
        }
    }
}

async fn lookup_histories<S>(
    base: &ComparisonResult,
    source: &S,
) -> Result<(Option<PriceHistory>, Option<PriceHistory>), HistoryError>
where
    S: PriceHistorySource + ?Sized,
{
    let history_a = source.price_history(base.product_a.name.trim()).await?;
    let history_b = source.price_history(base.product_b.name.trim()).await?;
    Ok((history_a, history_b))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compare;
    use crate::types::ProductListing;
    use crate::units::Unit;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, PriceHistory>);

    #[async_trait]
    impl PriceHistorySource for MapSource {
        async fn price_history(&self, product_name: &str) -> Result<Option<PriceHistory>, HistoryError> {
            Ok(self.0.get(product_name).cloned())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PriceHistorySource for FailingSource {
        async fn price_history(&self, _product_name: &str) -> Result<Option<PriceHistory>, HistoryError> {
            Err(HistoryError::Unavailable("backend offline".to_string()))
        }
    }

    fn point(day: u32, price: Decimal, unit: &str) -> PricePoint {
        PricePoint {
            observed_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
            unit_price: Money::from_decimal(price),
            unit_label: unit.to_string(),
        }
    }

    fn history(name: &str, points: Vec<PricePoint>) -> PriceHistory {
        PriceHistory {
            product_name: name.to_string(),
            points,
        }
    }

    fn rice_result() -> ComparisonResult {
        let a = ProductListing::new("Rice 5kg", Money::from_minor(140_000), dec!(5), Unit::Kilogram);
        let b = ProductListing::new("Rice 2kg", Money::from_minor(65_000), dec!(2), Unit::Kilogram);
        compare(&a, &b).unwrap()
    }

    #[test]
    fn test_insight_ignores_other_units() {
        let h = history(
            "Rice 5kg",
            vec![
                point(1, dec!(300), "kg"),
                point(3, dec!(260), "kg"),
                point(2, dec!(0.25), "g"),
            ],
        );
        let insight = HistoryInsight::from_history(&h, "kg").unwrap();
        assert_eq!(insight.observations, 2);
        assert_eq!(insight.lowest, Money::from_decimal(dec!(260)));
        assert_eq!(insight.latest, Money::from_decimal(dec!(260)));
        assert_eq!(insight.average, Money::from_decimal(dec!(280)));

        assert!(HistoryInsight::from_history(&h, "piece").is_none());
    }

    #[test]
    fn test_new_low_note() {
        let result = rice_result();
        let insights = HistoricalInsights {
            product_a: HistoryInsight::from_history(
                &history("Rice 5kg", vec![point(1, dec!(290), "kg"), point(2, dec!(310), "kg")]),
                "kg",
            ),
            product_b: None,
        };
        let notes = generate_advanced_recommendations(&result, &insights);
        assert_eq!(
            notes,
            vec!["Product A is below its lowest recorded price (280.00 vs previous low 290.00 per kg).".to_string()]
        );
    }

    #[test]
    fn test_above_average_and_cheaper_loser_notes() {
        let result = rice_result();
        let insights = HistoricalInsights {
            product_a: None,
            product_b: HistoryInsight::from_history(
                &history("Rice 2kg", vec![point(1, dec!(270), "kg"), point(2, dec!(270), "kg")]),
                "kg",
            ),
        };
        let notes = generate_advanced_recommendations(&result, &insights);

        // 325 vs average 270 → 20.37% above
        assert_eq!(notes.len(), 2);
        assert_eq!(
            notes[0],
            "Product B costs 20.37% more per kg than its historical average of 270.00; consider waiting for a better price."
        );
        assert!(notes[1].starts_with("Product B has sold for as little as 270.00 per kg, below Product A's current 280.00"));
    }

    #[tokio::test]
    async fn test_enrich_appends_without_touching_base() {
        let base = rice_result();
        let mut map = HashMap::new();
        map.insert(
            "Rice 5kg".to_string(),
            history("Rice 5kg", vec![point(1, dec!(295), "kg")]),
        );
        let enriched = enrich(base.clone(), &MapSource(map)).await;

        assert_eq!(enriched.base, base);
        assert!(enriched.is_enriched());
        assert_eq!(enriched.extra_recommendations.len(), 1);
        assert_eq!(
            enriched.recommendations().count(),
            base.recommendations.len() + 1
        );
    }

    #[tokio::test]
    async fn test_enrich_with_no_history_adds_nothing() {
        let base = rice_result();
        let enriched = enrich(base.clone(), &MapSource(HashMap::new())).await;

        assert!(enriched.is_enriched());
        assert!(enriched.insights.as_ref().unwrap().is_empty());
        assert!(enriched.extra_recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_base() {
        let base = rice_result();
        let source: Box<dyn PriceHistorySource> = Box::new(FailingSource);
        let enriched = enrich(base.clone(), source.as_ref()).await;

        assert_eq!(enriched, EnrichedComparison::unenriched(base));
        assert!(!enriched.is_enriched());
    }

    #[test]
    fn test_tie_has_no_cross_note() {
        let a = ProductListing::new("X", Money::from_minor(10_000), dec!(1), Unit::Gram);
        let b = ProductListing::new("Y", Money::from_minor(10_000), dec!(1), Unit::Gram);
        let result = compare(&a, &b).unwrap();
        let insights = HistoricalInsights {
            product_a: None,
            product_b: HistoryInsight::from_history(&history("Y", vec![point(1, dec!(100), "g")]), "g"),
        };
        assert!(generate_advanced_recommendations(&result, &insights).is_empty());
    }
}
