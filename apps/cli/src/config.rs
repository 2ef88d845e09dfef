//! # CLI Configuration
//!
//! Defaults applied to listings that do not spell everything out, plus
//! output and history settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --format json, --history prices.json                               │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     PRICEWISE_TAX_RATE=0.08                                            │
//! │     PRICEWISE_FORMAT=json                                              │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/pricewise/pricewise.toml (Linux)                         │
//! │     ~/Library/Application Support/com.pricewise.pricewise/... (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     tax included, text output, no history                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricewise.toml
//! [defaults]
//! tax_rate = "0.08"     # applied when a listing omits its TAX field
//! tax_included = false  # ...and whether that price already has tax in it
//!
//! [output]
//! format = "text"       # text | json
//!
//! [history]
//! path = "/home/me/prices.json"
//! timeout_ms = 500
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Output Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// The full result as pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Tax treatment for listings that omit the TAX field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Fraction, e.g. "0.08". Stored as a string so TOML floats never touch it.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub tax_rate: Decimal,

    #[serde(default = "default_true")]
    pub tax_included: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            tax_rate: Decimal::ZERO,
            tax_included: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Where past prices come from and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// JSON price history file. No file, no enrichment.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Budget for the history lookup; the base comparison is printed
    /// regardless.
    #[serde(default = "default_history_timeout")]
    pub timeout_ms: u64,
}

fn default_history_timeout() -> u64 {
    500
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            path: None,
            timeout_ms: default_history_timeout(),
        }
    }
}

// =============================================================================
// Root Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pricewise.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`CliConfig::load`], reading overrides from `lookup` instead
    /// of the process environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file without applying overrides.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        let rate = self.defaults.tax_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(CliError::InvalidConfig(format!(
                "defaults.tax_rate must be a fraction between 0 and 1, got {}",
                rate
            )));
        }

        if self.history.timeout_ms == 0 {
            return Err(CliError::InvalidConfig(
                "history.timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and skipped.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("PRICEWISE_TAX_RATE") {
            match Decimal::from_str(rate.trim()) {
                Ok(parsed) => {
                    debug!(tax_rate = %parsed, "Overriding default tax rate from environment");
                    self.defaults.tax_rate = parsed;
                }
                Err(_) => warn!(value = %rate, "Ignoring unparseable PRICEWISE_TAX_RATE"),
            }
        }

        if let Some(included) = lookup("PRICEWISE_TAX_INCLUDED") {
            match included.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.defaults.tax_included = true,
                "0" | "false" | "no" => self.defaults.tax_included = false,
                _ => warn!(value = %included, "Ignoring unparseable PRICEWISE_TAX_INCLUDED"),
            }
        }

        if let Some(format) = lookup("PRICEWISE_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.output.format = parsed,
                Err(_) => warn!(value = %format, "Ignoring unknown PRICEWISE_FORMAT"),
            }
        }

        if let Some(path) = lookup("PRICEWISE_HISTORY_PATH") {
            debug!(path = %path, "Overriding history path from environment");
            self.history.path = Some(PathBuf::from(path));
        }

        if let Some(timeout) = lookup("PRICEWISE_HISTORY_TIMEOUT_MS") {
            match timeout.trim().parse::<u64>() {
                Ok(ms) => self.history.timeout_ms = ms,
                Err(_) => warn!(value = %timeout, "Ignoring unparseable PRICEWISE_HISTORY_TIMEOUT_MS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pricewise", "pricewise")
            .map(|dirs| dirs.config_dir().join("pricewise.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.defaults.tax_included);
        assert_eq!(config.defaults.tax_rate, Decimal::ZERO);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.history.timeout_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [defaults]
            tax_rate = "0.08"
            tax_included = false

            [output]
            format = "json"

            [history]
            path = "/tmp/prices.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.tax_rate, dec!(0.08));
        assert!(!config.defaults.tax_included);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.history.path, Some(PathBuf::from("/tmp/prices.json")));
        assert_eq!(config.history.timeout_ms, 500);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = CliConfig::default();
        config.defaults.tax_rate = dec!(1.5);
        assert!(config.validate().is_err());

        config.defaults.tax_rate = dec!(0.2);
        config.history.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRICEWISE_TAX_RATE", "0.0825"),
            ("PRICEWISE_TAX_INCLUDED", "no"),
            ("PRICEWISE_FORMAT", "JSON"),
            ("PRICEWISE_HISTORY_PATH", "/var/lib/prices.json"),
            ("PRICEWISE_HISTORY_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();

        let mut config = CliConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.defaults.tax_rate, dec!(0.0825));
        assert!(!config.defaults.tax_included);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.history.path, Some(PathBuf::from("/var/lib/prices.json")));
        assert_eq!(config.history.timeout_ms, 250);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = CliConfig::default();
        config.apply_overrides(|key| match key {
            "PRICEWISE_TAX_RATE" => Some("lots".to_string()),
            "PRICEWISE_FORMAT" => Some("yaml".to_string()),
            "PRICEWISE_HISTORY_TIMEOUT_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("pricewise-config-that-does-not-exist.toml");
        let config = CliConfig::load_with(Some(path.clone()), |_| None).unwrap();
        assert_eq!(config, CliConfig::default());

        let config = CliConfig::load_with(Some(path), |key| {
            (key == "PRICEWISE_FORMAT").then(|| "json".to_string())
        })
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_toml_round_trip_keeps_string_rate() {
        let mut config = CliConfig::default();
        config.defaults.tax_rate = dec!(0.05);
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("tax_rate = \"0.05\""));
    }
}
