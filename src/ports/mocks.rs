//! Test doubles for the ports layer
//!
//! A hand-rolled recording provider for tests that care about call
//! patterns, plus a mockall mock for expectation-style tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::market_data::{SnapshotError, SnapshotProvider};
use crate::domain::MarketSnapshot;

/// Mock snapshot provider that records calls and serves canned snapshots
#[derive(Default)]
pub struct MockSnapshots {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<HashMap<String, MarketSnapshot>>>,
}

impl MockSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a snapshot for a given symbol
    pub fn with_snapshot(self, symbol: &str, snapshot: MarketSnapshot) -> Self {
        self.responses.lock().unwrap().insert(symbol.to_string(), snapshot);
        self
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotProvider for MockSnapshots {
    async fn fetch(&self, symbol: &str) -> Result<MarketSnapshot, SnapshotError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound(symbol.to_string()))
    }
}

#[cfg(test)]
mockall::mock! {
    pub SnapshotSource {}

    #[async_trait]
    impl SnapshotProvider for SnapshotSource {
        async fn fetch(&self, symbol: &str) -> Result<MarketSnapshot, SnapshotError>;
    }
}
