//! Analysis Engine
//!
//! Wires the detector suite, the aggregator and a clock into the
//! one-call pipeline: snapshot in, decision (and sizing) out. Holds no
//! mutable state; a single engine serves any number of symbols
//! concurrently.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Decision, MarketSnapshot, Recommendation, Verdict};
use crate::ensemble::EnsembleAggregator;
use crate::detectors::DetectorSuite;
use crate::ports::Clock;
use crate::sizing::RiskAccount;

pub struct AnalysisEngine {
    suite: DetectorSuite,
    aggregator: EnsembleAggregator,
    clock: Arc<dyn Clock>,
    account: RiskAccount,
}

impl AnalysisEngine {
    pub fn new(
        suite: DetectorSuite,
        aggregator: EnsembleAggregator,
        clock: Arc<dyn Clock>,
        account: RiskAccount,
    ) -> Self {
        Self { suite, aggregator, clock, account }
    }

    /// Build the standard engine from a validated configuration
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let suite = DetectorSuite::standard(
            config.detectors.clone(),
            config.ensemble.weights.clone(),
        );
        let aggregator = EnsembleAggregator::new(config.ensemble.clone());
        Self::new(suite, aggregator, clock, config.risk)
    }

    /// Raw per-detector verdicts for a snapshot, in registration order
    pub fn run_detectors(&self, snapshot: &MarketSnapshot) -> Vec<Verdict> {
        self.suite.run_all(snapshot)
    }

    /// Full pipeline: detectors, aggregation, levels
    pub fn analyze(&self, snapshot: &MarketSnapshot) -> Decision {
        let verdicts = self.suite.run_all(snapshot);
        let hour = self.clock.local_hour();
        tracing::debug!(symbol = %snapshot.symbol, hour, "analyzing snapshot");
        self.aggregator.decide(&verdicts, snapshot, hour)
    }

    /// Pipeline plus position sizing against the risk account
    pub fn recommend(&self, snapshot: &MarketSnapshot) -> Recommendation {
        let decision = self.analyze(snapshot);
        let sizing = decision.levels.as_ref().map(|levels| self.account.size_for(levels));
        Recommendation { decision, sizing }
    }
}
