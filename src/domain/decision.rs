//! Decision value types
//!
//! One `Decision` is produced per analysis pass. It is immutable, fully
//! populated even on NO_TRADE, and never persisted: the explain payload
//! carries everything a reader needs to reconstruct why the ensemble
//! voted the way it did.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::verdict::{Direction, Verdict};

/// Final call of the ensemble for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeCall {
    Long,
    Short,
    NoTrade,
}

impl fmt::Display for TradeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
            Self::NoTrade => write!(f, "NO_TRADE"),
        }
    }
}

/// Agreement tally over material verdicts (directional and above the
/// configured score floor). Exact LONG/SHORT ties carry no majority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgreementStats {
    pub long_count: usize,
    pub short_count: usize,
    /// Verdicts that did not qualify as material
    pub neutral_count: usize,
    /// `Neutral` when there is no majority (all quiet, or an exact tie)
    pub majority_direction: Direction,
    pub majority_count: usize,
    /// majority / total directional; 0 when nothing is directional
    pub agreement_ratio: f64,
}

/// Entry, stop and target for a directional decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// |take_profit - entry| / |entry - stop_loss|, rounded to 2 decimals
    pub risk_reward: f64,
}

/// Trade size derived from the risk account and the levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizing {
    pub size: f64,
    pub max_loss: f64,
}

/// Full audit trail attached to every decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explain {
    /// Per-detector breakdown in suite registration order
    pub verdicts: Vec<Verdict>,
    pub agreement: AgreementStats,
    /// Meta-score before rounding into `confidence`
    pub raw_meta_score: f64,
    /// Name of the matched trading session, if any
    pub session: Option<String>,
    pub time_multiplier: f64,
    /// Itemized reasons a trade was not taken; empty on a trade
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<String>,
}

/// The ensemble's answer for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub symbol: String,
    pub direction: TradeCall,
    /// Rounded meta-score, 0-100
    pub confidence: u32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<TradeLevels>,
    pub explain: Explain,
}

impl Decision {
    pub fn is_trade(&self) -> bool {
        !matches!(self.direction, TradeCall::NoTrade)
    }
}

/// Decision plus sizing, the engine's outermost product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<PositionSizing>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::DetectorFamily;

    fn no_trade_decision() -> Decision {
        Decision {
            symbol: "BTC-USDT".into(),
            direction: TradeCall::NoTrade,
            confidence: 0,
            reason: "no trading signal: no directional majority".into(),
            levels: None,
            explain: Explain {
                verdicts: vec![Verdict::neutral(
                    "volume_spike",
                    DetectorFamily::Volume,
                    "insufficient history",
                )],
                agreement: AgreementStats {
                    long_count: 0,
                    short_count: 0,
                    neutral_count: 1,
                    majority_direction: Direction::Neutral,
                    majority_count: 0,
                    agreement_ratio: 0.0,
                },
                raw_meta_score: 0.0,
                session: None,
                time_multiplier: 1.0,
                rejections: vec!["no directional majority".into()],
            },
        }
    }

    #[test]
    fn test_no_trade_is_fully_populated() {
        let d = no_trade_decision();
        assert!(!d.is_trade());
        assert!(!d.explain.verdicts.is_empty());
        assert!(!d.explain.rejections.is_empty());
    }

    #[test]
    fn test_decision_serializes_without_levels() {
        let d = no_trade_decision();
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("\"levels\""));
        assert!(json.contains("NO_TRADE"));

        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back.direction, TradeCall::NoTrade);
    }

    #[test]
    fn test_trade_call_display() {
        assert_eq!(TradeCall::Long.to_string(), "LONG");
        assert_eq!(TradeCall::NoTrade.to_string(), "NO_TRADE");
    }
}
