//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Compare two product listings by price per unit.
#[derive(Debug, Parser)]
#[command(name = "pricewise", version)]
pub struct Cli {
    /// Path to a pricewise.toml config file.
    #[arg(long, global = true, env = "PRICEWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format; overrides the config file and PRICEWISE_FORMAT.
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare two listings and recommend the better value.
    Compare(CompareArgs),

    /// Check two listings without comparing them.
    Validate {
        /// First listing, NAME:PRICE:QUANTITY:UNIT[:TAX]
        a: String,
        /// Second listing, NAME:PRICE:QUANTITY:UNIT[:TAX]
        b: String,
    },

    /// List supported units and their conversion factors.
    Units,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First listing, NAME:PRICE:QUANTITY:UNIT[:TAX]
    pub a: String,

    /// Second listing, NAME:PRICE:QUANTITY:UNIT[:TAX]
    pub b: String,

    /// JSON price history file used to enrich the recommendations.
    #[arg(long, conflicts_with = "no_history")]
    pub history: Option<PathBuf>,

    /// Skip price history even if one is configured.
    #[arg(long)]
    pub no_history: bool,
}
