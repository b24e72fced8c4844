//! Snapshot provider port
//!
//! The engine consumes periodic snapshots; where they come from
//! (exchange fan-out, caches, files) is an adapter concern. Acquisition
//! policy - retries, rate limits, exchange fallback - lives entirely on
//! the adapter side of this trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::MarketSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no snapshot available for symbol '{0}'")]
    NotFound(String),
}

/// Source of market snapshots, one per symbol per call
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<MarketSnapshot, SnapshotError>;
}
