//! # Pricewise CLI
//!
//! Shell front end for `pricewise-core`.
//!
//! ## Request Flow
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  clap args   │──►│ parse_listing│──►│   compare    │──►│    enrich    │
//! │  + config    │   │  (A and B)   │   │ (pure, sync) │   │ (timeout)    │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                                        ┌──────────────┐         │
//!                                        │ render text  │◄────────┘
//!                                        │   or JSON    │
//!                                        └──────────────┘
//! ```
//!
//! History enrichment is best effort. A missing file, bad JSON or a lookup
//! that outlives `history.timeout_ms` all fall back to the base comparison.

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod render;

use pricewise_core::{
    compare, enrich, validate, ComparisonResult, EnrichedComparison, PriceHistorySource,
};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CompareArgs};
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;
use crate::history::JsonHistoryFile;
use crate::input::parse_listing;

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// clean for piping JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,pricewise=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command and returns what should be printed to stdout.
pub async fn run(cli: Cli) -> CliResult<String> {
    let config = CliConfig::load(cli.config.clone())?;
    execute(cli, config).await
}

/// Runs one command against an already loaded configuration. `--config` on
/// `cli` is ignored; `--format` still wins over `config`.
pub async fn execute(cli: Cli, mut config: CliConfig) -> CliResult<String> {
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    match cli.command {
        Command::Compare(args) => run_compare(&config, args).await,
        Command::Validate { a, b } => {
            let a = parse_listing(&a, &config.defaults)?;
            let b = parse_listing(&b, &config.defaults)?;
            validate(&a, &b)?;
            match config.output.format {
                OutputFormat::Text => Ok(render::validation_text()),
                OutputFormat::Json => render::validation_json(),
            }
        }
        Command::Units => match config.output.format {
            OutputFormat::Text => Ok(render::units_text()),
            OutputFormat::Json => render::units_json(),
        },
    }
}

async fn run_compare(config: &CliConfig, args: CompareArgs) -> CliResult<String> {
    let a = parse_listing(&args.a, &config.defaults)?;
    let b = parse_listing(&args.b, &config.defaults)?;

    let result = compare(&a, &b)?;
    info!(
        winner = render::winner_label(result.winner),
        unit = %result.details.common_unit_label,
        "comparison complete"
    );

    let history_path = if args.no_history {
        None
    } else {
        args.history.or_else(|| config.history.path.clone())
    };

    let enriched = match history_path {
        Some(path) => {
            let source = JsonHistoryFile::new(path);
            let budget = Duration::from_millis(config.history.timeout_ms);
            enrich_with_timeout(result, &source, budget).await
        }
        None => EnrichedComparison::unenriched(result),
    };

    match config.output.format {
        OutputFormat::Text => Ok(render::comparison_text(&enriched)),
        OutputFormat::Json => render::comparison_json(&enriched),
    }
}

/// Enriches `result` from `source`, giving up after `budget`.
pub async fn enrich_with_timeout<S>(
    result: ComparisonResult,
    source: &S,
    budget: Duration,
) -> EnrichedComparison
where
    S: PriceHistorySource + ?Sized,
{
    match tokio::time::timeout(budget, enrich(result.clone(), source)).await {
        Ok(enriched) => enriched,
        Err(_) => {
            warn!(timeout_ms = budget.as_millis() as u64, "price history lookup timed out");
            EnrichedComparison::unenriched(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use async_trait::async_trait;
    use clap::Parser;
    use pricewise_core::{
        ComparisonError, HistoryError, Money, PriceHistory, ProductListing, Unit, ValidationError,
    };
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    const NO_CONFIG: &str = "/nonexistent/pricewise/pricewise.toml";

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pricewise", "--config", NO_CONFIG];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    /// Runs without reading the process environment.
    async fn run_hermetic(cli: Cli) -> CliResult<String> {
        let config = CliConfig::load_with(cli.config.clone(), |_| None)?;
        execute(cli, config).await
    }

    /// A history source that answers long after any reasonable budget.
    struct StalledSource;

    #[async_trait]
    impl PriceHistorySource for StalledSource {
        async fn price_history(&self, _product_name: &str) -> Result<Option<PriceHistory>, HistoryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
    }

    fn rice_result() -> ComparisonResult {
        let a = ProductListing::new("Rice 5kg", Money::from_decimal(dec!(1400)), dec!(5), Unit::Kilogram);
        let b = ProductListing::new("Rice 2kg", Money::from_decimal(dec!(650)), dec!(2), Unit::Kilogram);
        compare(&a, &b).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_history_degrades_to_base_result() {
        let base = rice_result();
        let enriched = enrich_with_timeout(base.clone(), &StalledSource, Duration::from_millis(500)).await;
        assert_eq!(enriched, EnrichedComparison::unenriched(base));
    }

    async fn write_history(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pricewise-run-{}-{}.json", name, std::process::id()));
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_compare_text() {
        let out = run_hermetic(cli(&["compare", "Rice 5kg:1400:5:kg", "Rice 2kg:650:2:kg", "--no-history"]))
            .await
            .unwrap();
        assert!(out.starts_with("Winner: Product A (Rice 5kg)"));
        assert!(out.contains("(13.85%)"));
    }

    #[tokio::test]
    async fn test_compare_json_with_tax() {
        let out = run_hermetic(cli(&[
            "--format",
            "json",
            "compare",
            "Widget:1000:1:piece:10%",
            "Widget:1050:1:piece:incl",
            "--no-history",
        ]))
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["base"]["winner"], "product_b");
        assert_eq!(json["base"]["details"]["unitPriceA"], "1100.00");
        assert_eq!(json["base"]["details"]["unitPriceB"], "1050.00");
    }

    #[tokio::test]
    async fn test_incompatible_units_error() {
        let err = run_hermetic(cli(&["compare", "Flour:2:500:g", "Milk:2:500:ml"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Comparison(ComparisonError::IncompatibleUnits(..))));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Cannot compare g (weight) with ml (volume)");
    }

    #[tokio::test]
    async fn test_validate_command() {
        let out = run_hermetic(cli(&["validate", "A:1:1:g", "B:2:1:kg"])).await.unwrap();
        assert_eq!(out, "Both listings are valid.");

        let err = run_hermetic(cli(&["validate", "A:1:1:g", "B:0:1:kg"])).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Comparison(ComparisonError::Validation(ValidationError::InvalidPrice(..)))
        ));
    }

    #[tokio::test]
    async fn test_units_command() {
        let out = run_hermetic(cli(&["units"])).await.unwrap();
        assert!(out.contains("weight (base: g)"));
        assert!(out.contains("count (base: piece)"));
    }

    #[tokio::test]
    async fn test_compare_with_history() {
        let path = write_history(
            "enriched",
            r#"{ "Rice 2kg": [
                { "observed_at": "2026-01-10T09:00:00Z", "unit_price": "270.00", "unit_label": "kg" }
            ] }"#,
        )
        .await;
        let history = path.to_string_lossy().to_string();

        let out = run_hermetic(cli(&[
            "--format",
            "json",
            "compare",
            "Rice 5kg:1400:5:kg",
            "Rice 2kg:650:2:kg",
            "--history",
            &history,
        ]))
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(!json["insights"].is_null());
        assert!(!json["extraRecommendations"].as_array().unwrap().is_empty());

        tokio::fs::remove_file(path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_history_falls_back() {
        let out = run_hermetic(cli(&[
            "--format",
            "json",
            "compare",
            "Rice 5kg:1400:5:kg",
            "Rice 2kg:650:2:kg",
            "--history",
            "/nonexistent/pricewise/history.json",
        ]))
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json["insights"].is_null());
        assert_eq!(json["base"]["winner"], "product_a");
    }
}
