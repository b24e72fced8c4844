//! Detector verdicts
//!
//! Each detector maps a snapshot to exactly one `Verdict`: a direction, a
//! score in [0, 100], a human-readable reason, and optional numeric
//! metadata consumed downstream (e.g. breakout extremes for entry
//! placement). Score 0 conventionally pairs with a neutral direction, but
//! nothing enforces that; the aggregator treats the two independently.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Directional read of a single detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl Direction {
    /// The opposing direction; neutral opposes itself
    pub fn opposite(&self) -> Self {
        match self {
            Self::Long => Self::Short,
            Self::Short => Self::Long,
            Self::Neutral => Self::Neutral,
        }
    }

    pub fn is_directional(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Detector family, used for the confluence bonus and target expansion.
///
/// Agreement that spans families is worth more than agreement inside one:
/// two momentum detectors nodding at each other is one observation, a
/// momentum detector plus an order-flow detector is two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorFamily {
    Momentum,
    MeanReversion,
    Volatility,
    Volume,
    OrderFlow,
}

impl fmt::Display for DetectorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Momentum => write!(f, "momentum"),
            Self::MeanReversion => write!(f, "mean_reversion"),
            Self::Volatility => write!(f, "volatility"),
            Self::Volume => write!(f, "volume"),
            Self::OrderFlow => write!(f, "order_flow"),
        }
    }
}

/// One detector's read of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Detector name (stable identifier, also the weight-table key)
    pub detector: String,
    pub family: DetectorFamily,
    pub direction: Direction,
    /// Signal strength in [0, 100]
    pub score: f64,
    /// Aggregation weight attached by the suite (1.0 unless configured)
    pub weight: f64,
    pub reason: String,
    /// Numeric side-channel for downstream consumers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, f64>,
}

impl Verdict {
    pub fn new(
        detector: &str,
        family: DetectorFamily,
        direction: Direction,
        score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            detector: detector.to_string(),
            family,
            direction,
            score: score.clamp(0.0, 100.0),
            weight: 1.0,
            reason: reason.into(),
            metadata: HashMap::new(),
        }
    }

    /// Neutral, score-0 verdict; the degraded form every detector falls
    /// back to on insufficient data or an internal fault
    pub fn neutral(detector: &str, family: DetectorFamily, reason: impl Into<String>) -> Self {
        Self::new(detector, family, Direction::Neutral, 0.0, reason)
    }

    pub fn with_metadata(mut self, key: &str, value: f64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }
}
