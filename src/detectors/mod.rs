//! Detector Suite - seven independent technical-analysis detectors
//!
//! Each detector is stateless and maps `(snapshot, params)` to exactly
//! one verdict. The suite evaluates all of them in fixed registration
//! order; ordering only affects the explain payload, never the scoring
//! outcome. A detector fault never aborts the suite: `evaluate` converts
//! insufficient history and computation faults into a neutral, score-0
//! verdict carrying the fault reason.
//!
//! Detectors are registered explicitly as a fixed set of trait objects;
//! there is no name-keyed dispatch anywhere.

pub mod correlation_break;
pub mod momentum_breakout;
pub mod orderbook_sweep;
pub mod rsi_momentum;
pub mod volatility_squeeze;
pub mod volume_spike;
pub mod vwap_pullback;

pub use correlation_break::CorrelationBreak;
pub use momentum_breakout::MomentumBreakout;
pub use orderbook_sweep::OrderbookSweep;
pub use rsi_momentum::RsiMomentum;
pub use volatility_squeeze::VolatilitySqueeze;
pub use volume_spike::VolumeSpike;
pub use vwap_pullback::VwapPullback;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DetectorFamily, MarketSnapshot, Verdict};

/// Faults a detector can raise internally. Both variants are absorbed at
/// the suite boundary and surface only as a neutral verdict's reason.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    #[error("insufficient history: need {needed} bars, have {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("computation fault: {0}")]
    Computation(String),
}

/// Tunables shared by the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Trailing 15m bars forming the breakout range
    pub breakout_lookback: usize,
    /// Minimum percent above the range high to call a breakout
    pub min_breakout_pct: f64,
    /// Volume multiple over the range mean required for confirmation
    pub breakout_volume_factor: f64,
    /// Volume z-score required for breakout confirmation
    pub breakout_volume_z: f64,

    /// Trailing 1m bars for the VWAP pullback window
    pub vwap_window: usize,
    /// Maximum percent above VWAP still counted as a pullback
    pub vwap_proximity_pct: f64,
    /// Bars of volume history for the pullback volume filter
    pub pullback_volume_window: usize,
    /// Volume multiple over recent average required for a pullback entry
    pub pullback_volume_factor: f64,

    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    /// Band-width percentile at or below which a squeeze is flagged
    pub squeeze_percentile: usize,
    /// Volume z-score required to confirm a squeeze breakout
    pub squeeze_volume_z: f64,

    /// Order-book levels per side considered for imbalance
    pub book_depth: usize,
    /// Absolute imbalance beyond which a sweep verdict fires
    pub imbalance_threshold: f64,

    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,

    /// Trailing 15m bars for volume statistics
    pub volume_lookback: usize,
    /// Volume z-score that qualifies as a spike
    pub volume_spike_z: f64,

    /// Recent 1h returns compared against full history
    pub regime_recent_window: usize,
    /// Recent/historical volatility ratio that flags a regime break
    pub regime_break_ratio: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            breakout_lookback: 20,
            min_breakout_pct: 0.5,
            breakout_volume_factor: 1.5,
            breakout_volume_z: 1.0,
            vwap_window: 50,
            vwap_proximity_pct: 0.2,
            pullback_volume_window: 10,
            pullback_volume_factor: 1.2,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            squeeze_percentile: 10,
            squeeze_volume_z: 0.5,
            book_depth: 3,
            imbalance_threshold: 0.3,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_lookback: 20,
            volume_spike_z: 2.0,
            regime_recent_window: 5,
            regime_break_ratio: 2.0,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.breakout_lookback < 5 {
            return Err(format!("breakout_lookback must be >= 5, got {}", self.breakout_lookback));
        }
        if self.min_breakout_pct <= 0.0 {
            return Err(format!("min_breakout_pct must be > 0, got {}", self.min_breakout_pct));
        }
        if self.vwap_window < 10 {
            return Err(format!("vwap_window must be >= 10, got {}", self.vwap_window));
        }
        if self.bollinger_period < 5 {
            return Err(format!("bollinger_period must be >= 5, got {}", self.bollinger_period));
        }
        if self.squeeze_percentile == 0 || self.squeeze_percentile > 50 {
            return Err(format!(
                "squeeze_percentile must be 1-50, got {}",
                self.squeeze_percentile
            ));
        }
        if self.book_depth == 0 {
            return Err("book_depth must be >= 1".to_string());
        }
        if self.imbalance_threshold <= 0.0 || self.imbalance_threshold >= 1.0 {
            return Err(format!(
                "imbalance_threshold must be in (0, 1), got {}",
                self.imbalance_threshold
            ));
        }
        if self.rsi_period < 2 {
            return Err(format!("rsi_period must be >= 2, got {}", self.rsi_period));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(format!(
                "rsi_oversold {} must be below rsi_overbought {}",
                self.rsi_oversold, self.rsi_overbought
            ));
        }
        if self.volume_spike_z <= 0.0 {
            return Err(format!("volume_spike_z must be > 0, got {}", self.volume_spike_z));
        }
        if self.regime_recent_window < 2 {
            return Err(format!(
                "regime_recent_window must be >= 2, got {}",
                self.regime_recent_window
            ));
        }
        if self.regime_break_ratio <= 1.0 {
            return Err(format!(
                "regime_break_ratio must be > 1, got {}",
                self.regime_break_ratio
            ));
        }
        Ok(())
    }
}

/// One detector of the suite
pub trait Detector: Send + Sync {
    /// Stable identifier, also the key into the weight table
    fn name(&self) -> &'static str;

    fn family(&self) -> DetectorFamily;

    /// Raw detection; may fail on short or degenerate input
    fn detect(&self, snapshot: &MarketSnapshot, params: &DetectorParams)
        -> Result<Verdict, DetectorError>;

    /// Fault barrier: a failing detector degrades to a neutral verdict
    /// carrying the fault reason instead of aborting the batch
    fn evaluate(&self, snapshot: &MarketSnapshot, params: &DetectorParams) -> Verdict {
        match self.detect(snapshot, params) {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::debug!(detector = self.name(), %err, "detector degraded to neutral");
                Verdict::neutral(self.name(), self.family(), err.to_string())
            }
        }
    }
}

/// The fixed seven-detector ensemble
pub struct DetectorSuite {
    detectors: Vec<Box<dyn Detector>>,
    params: DetectorParams,
    weights: HashMap<String, f64>,
}

impl DetectorSuite {
    /// Standard suite in its fixed registration order. `weights` maps
    /// detector names to aggregation weights; unknown names default to 1.0.
    pub fn standard(params: DetectorParams, weights: HashMap<String, f64>) -> Self {
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(MomentumBreakout),
            Box::new(VwapPullback),
            Box::new(VolatilitySqueeze),
            Box::new(OrderbookSweep),
            Box::new(RsiMomentum),
            Box::new(VolumeSpike),
            Box::new(CorrelationBreak),
        ];
        Self { detectors, params, weights }
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Evaluate every detector against the snapshot and attach its
    /// configured aggregation weight. Always returns one verdict per
    /// registered detector, in registration order.
    pub fn run_all(&self, snapshot: &MarketSnapshot) -> Vec<Verdict> {
        self.detectors
            .iter()
            .map(|detector| {
                let mut verdict = detector.evaluate(snapshot, &self.params);
                verdict.weight =
                    self.weights.get(detector.name()).copied().unwrap_or(1.0);
                tracing::debug!(
                    detector = detector.name(),
                    direction = %verdict.direction,
                    score = verdict.score,
                    "verdict"
                );
                verdict
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_params_are_valid() {
        assert!(DetectorParams::default().validate().is_ok());
    }

    #[test]
    fn test_param_validation_catches_bad_thresholds() {
        let mut params = DetectorParams::default();
        params.imbalance_threshold = 1.5;
        assert!(params.validate().is_err());

        let mut params = DetectorParams::default();
        params.rsi_oversold = 80.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_suite_registration_order_is_fixed() {
        let suite = DetectorSuite::standard(DetectorParams::default(), HashMap::new());
        assert_eq!(
            suite.names(),
            vec![
                "momentum_breakout",
                "vwap_pullback",
                "volatility_squeeze",
                "orderbook_sweep",
                "rsi_momentum",
                "volume_spike",
                "correlation_break",
            ]
        );
    }

    #[test]
    fn test_empty_snapshot_degrades_every_detector() {
        let suite = DetectorSuite::standard(DetectorParams::default(), HashMap::new());
        let snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());

        let verdicts = suite.run_all(&snapshot);
        assert_eq!(verdicts.len(), suite.len());
        for verdict in &verdicts {
            assert_eq!(verdict.direction, crate::domain::Direction::Neutral);
            assert_eq!(verdict.score, 0.0);
            assert!(!verdict.reason.is_empty());
        }
    }

    #[test]
    fn test_suite_attaches_configured_weights() {
        let mut weights = HashMap::new();
        weights.insert("volume_spike".to_string(), 2.5);

        let suite = DetectorSuite::standard(DetectorParams::default(), weights);
        let snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());
        let verdicts = suite.run_all(&snapshot);

        let spike = verdicts.iter().find(|v| v.detector == "volume_spike").unwrap();
        assert_eq!(spike.weight, 2.5);
        let other = verdicts.iter().find(|v| v.detector == "rsi_momentum").unwrap();
        assert_eq!(other.weight, 1.0);
    }
}
