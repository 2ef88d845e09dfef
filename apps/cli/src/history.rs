//! # File-backed Price History
//!
//! A [`PriceHistorySource`] that reads a local JSON file:
//!
//! ```json
//! {
//!   "Rice 5kg": [
//!     { "observed_at": "2026-03-01T12:00:00Z", "unit_price": "295.00", "unit_label": "kg" }
//!   ]
//! }
//! ```
//!
//! The file is read on every lookup so edits are picked up without a restart.
//! Product names match case-insensitively after trimming.

use async_trait::async_trait;
use pricewise_core::{HistoryError, PriceHistory, PriceHistorySource, PricePoint};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Price history stored as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonHistoryFile {
    path: PathBuf,
}

impl JsonHistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonHistoryFile { path: path.into() }
    }

    async fn read_all(&self) -> Result<HashMap<String, Vec<PricePoint>>, HistoryError> {
        // Reads of FIFOs and devices can block forever on the blocking pool.
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            HistoryError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(HistoryError::Unavailable(format!(
                "{}: not a regular file",
                self.path.display()
            )));
        }

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HistoryError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| HistoryError::Malformed(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl PriceHistorySource for JsonHistoryFile {
    async fn price_history(&self, product_name: &str) -> Result<Option<PriceHistory>, HistoryError> {
        let wanted = product_name.trim();
        let entries = self.read_all().await?;

        let found = entries
            .into_iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(name, points)| PriceHistory {
                product_name: name,
                points,
            });

        debug!(product = wanted, found = found.is_some(), "price history lookup");
        Ok(found)
    }
}
