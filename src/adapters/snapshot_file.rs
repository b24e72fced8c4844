//! File-backed snapshot source
//!
//! Reads a `MarketSnapshot` from a JSON file. The only snapshot source
//! shipped with the engine; live acquisition belongs to an external
//! collaborator implementing the same port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::MarketSnapshot;
use crate::ports::{SnapshotError, SnapshotProvider};

pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Load the snapshot regardless of which symbol it carries
    pub async fn load(&self) -> Result<MarketSnapshot, SnapshotError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot: MarketSnapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotSource {
    async fn fetch(&self, symbol: &str) -> Result<MarketSnapshot, SnapshotError> {
        let snapshot = self.load().await?;
        if !snapshot.symbol.eq_ignore_ascii_case(symbol) {
            return Err(SnapshotError::NotFound(symbol.to_string()));
        }
        Ok(snapshot)
    }
}
