//! Persisted running total of completion spend.
//!
//! The ledger is a single text file holding one decimal number. Every update
//! reads the current value, adds the new cost and writes the sum back. Updates
//! from this process go through one async mutex, so concurrent letter jobs
//! never lose each other's spend. Nothing coordinates separate processes
//! sharing the same file: the last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cost ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cost ledger {path} does not hold a number: {contents:?}")]
    Corrupt { path: PathBuf, contents: String },

    #[error("refusing to record invalid cost {0}")]
    InvalidCost(f64),
}

pub struct CostLedger {
    path: PathBuf,
    writer: Mutex<()>,
}

impl CostLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current total in USD. An absent or empty file counts as 0.
    pub async fn total(&self) -> Result<f64, LedgerError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0.0),
            Err(e) => return Err(e.into()),
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| LedgerError::Corrupt {
                path: self.path.clone(),
                contents: trimmed.to_string(),
            })
    }

    /// Adds `cost` to the persisted total and returns the new total.
    ///
    /// Costs must be finite and non-negative so the total never decreases.
    pub async fn record(&self, cost: f64) -> Result<f64, LedgerError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(LedgerError::InvalidCost(cost));
        }

        let _guard = self.writer.lock().await;

        let current = self.total().await?;
        let updated = current + cost;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a concurrent reader never sees a half-written number.
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, updated.to_string()).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(
            "Cost ledger {}: {current:.6} + {cost:.6} = {updated:.6}",
            self.path.display()
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_absent_file_starts_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CostLedger::new(dir.path().join("costTracking.txt"));
        assert_eq!(ledger.total().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_record_accumulates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costTracking.txt");
        let ledger = CostLedger::new(&path);

        ledger.record(0.06).await.unwrap();
        let total = ledger.record(0.06).await.unwrap();
        assert!((total - 0.12).abs() < 1e-12);

        let on_disk: f64 = std::fs::read_to_string(&path)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert!((on_disk - 0.12).abs() < 1e-12);

        // A fresh handle on the same file sees the persisted value.
        let reopened = CostLedger::new(&path);
        assert!((reopened.total().await.unwrap() - 0.12).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_existing_value_is_continued() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost.txt");
        std::fs::write(&path, "1.5\n").unwrap();
        let ledger = CostLedger::new(&path);
        let total = ledger.record(0.25).await.unwrap();
        assert!((total - 1.75).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost.txt");
        std::fs::write(&path, "lots of money").unwrap();
        let ledger = CostLedger::new(&path);
        assert!(matches!(
            ledger.total().await,
            Err(LedgerError::Corrupt { .. })
        ));
        assert!(ledger.record(0.1).await.is_err());
        // The bad contents are left alone for a human to inspect.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "lots of money");
    }

    #[tokio::test]
    async fn test_negative_and_nan_costs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CostLedger::new(dir.path().join("cost.txt"));
        assert!(matches!(
            ledger.record(-0.01).await,
            Err(LedgerError::InvalidCost(_))
        ));
        assert!(ledger.record(f64::NAN).await.is_err());
        assert_eq!(ledger.total().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cost.txt");
        let ledger = CostLedger::new(&path);
        ledger.record(0.5).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_records_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(CostLedger::new(dir.path().join("cost.txt")));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.record(0.25).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!((ledger.total().await.unwrap() - 5.0).abs() < 1e-9);
    }
}
