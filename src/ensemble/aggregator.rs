//! Ensemble aggregator
//!
//! Turns the verdict list into agreement statistics, a meta-score, and
//! the final trade/no-trade decision. The aggregator never trusts a
//! single detector: it counts material agreement, weights the agreeing
//! scores, credits confluence across detector families, and scales by
//! the time-of-day session before comparing against the confidence
//! floor. Its configuration is immutable after construction.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::time_of_day::{SessionSchedule, TradingSession};
use crate::domain::{
    AgreementStats, Decision, Direction, Explain, MarketSnapshot, TradeCall, Verdict,
};
use crate::levels::LevelsGenerator;

/// Score a directional verdict must exceed to count as material.
/// Deliberately independent of each detector's own neutrality call.
pub const DEFAULT_MATERIAL_SCORE_FLOOR: f64 = 40.0;

/// Confluence bonus per distinct family beyond the first, and its cap
const FAMILY_BONUS_POINTS: f64 = 5.0;
const FAMILY_BONUS_CAP: f64 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Meta-score a trade must reach, 0-100
    pub min_confidence: f64,
    /// Material detectors that must agree before anything trades
    pub min_detector_agreement: usize,
    /// Material-verdict score floor
    pub material_score_floor: f64,
    /// Per-detector aggregation weights; unnamed detectors weigh 1.0
    pub weights: HashMap<String, f64>,
    /// Named hour ranges scaling the meta-score
    pub sessions: Vec<TradingSession>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            min_detector_agreement: 2,
            material_score_floor: DEFAULT_MATERIAL_SCORE_FLOOR,
            weights: HashMap::new(),
            sessions: Vec::new(),
        }
    }
}

impl EnsembleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(format!("min_confidence must be 0-100, got {}", self.min_confidence));
        }
        if self.min_detector_agreement == 0 {
            return Err("min_detector_agreement must be >= 1".to_string());
        }
        if !(0.0..=100.0).contains(&self.material_score_floor) {
            return Err(format!(
                "material_score_floor must be 0-100, got {}",
                self.material_score_floor
            ));
        }
        for (name, weight) in &self.weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(format!("weight for '{name}' must be > 0, got {weight}"));
            }
        }
        for session in &self.sessions {
            session.validate()?;
        }
        Ok(())
    }
}

pub struct EnsembleAggregator {
    config: EnsembleConfig,
    schedule: SessionSchedule,
    levels: LevelsGenerator,
}

impl EnsembleAggregator {
    pub fn new(config: EnsembleConfig) -> Self {
        let schedule = SessionSchedule::new(config.sessions.clone());
        Self { config, schedule, levels: LevelsGenerator::default() }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    fn is_material(&self, verdict: &Verdict) -> bool {
        verdict.direction.is_directional() && verdict.score > self.config.material_score_floor
    }

    /// Tally material verdicts. An exact LONG/SHORT tie carries no
    /// majority: deterministic and independent of suite order.
    pub fn compute_agreement(&self, verdicts: &[Verdict]) -> AgreementStats {
        let mut long_count = 0;
        let mut short_count = 0;
        let mut neutral_count = 0;
        for verdict in verdicts {
            if !self.is_material(verdict) {
                neutral_count += 1;
                continue;
            }
            match verdict.direction {
                Direction::Long => long_count += 1,
                Direction::Short => short_count += 1,
                Direction::Neutral => neutral_count += 1,
            }
        }

        let (majority_direction, majority_count) = if long_count > short_count {
            (Direction::Long, long_count)
        } else if short_count > long_count {
            (Direction::Short, short_count)
        } else {
            (Direction::Neutral, 0)
        };

        let total_directional = long_count + short_count;
        let agreement_ratio = if total_directional > 0 && majority_count > 0 {
            majority_count as f64 / total_directional as f64
        } else {
            0.0
        };

        AgreementStats {
            long_count,
            short_count,
            neutral_count,
            majority_direction,
            majority_count,
            agreement_ratio,
        }
    }

    /// Weighted mean of the agreeing scores, plus the confluence bonus,
    /// scaled by the session multiplier and clamped to [0, 100].
    /// Returns 0 outright when agreement is below the configured floor.
    pub fn compute_meta_score(
        &self,
        verdicts: &[Verdict],
        agreement: &AgreementStats,
        multiplier: f64,
    ) -> f64 {
        if agreement.majority_count < self.config.min_detector_agreement
            || !agreement.majority_direction.is_directional()
        {
            return 0.0;
        }

        let agreeing: Vec<&Verdict> = verdicts
            .iter()
            .filter(|v| self.is_material(v) && v.direction == agreement.majority_direction)
            .collect();

        let weight_sum: f64 = agreeing.iter().map(|v| v.weight).sum();
        if weight_sum <= 0.0 {
            return 0.0;
        }
        let weighted_mean: f64 =
            agreeing.iter().map(|v| v.score * v.weight).sum::<f64>() / weight_sum;

        let families: HashSet<_> = agreeing.iter().map(|v| v.family).collect();
        let confluence_bonus =
            (FAMILY_BONUS_POINTS * (families.len().saturating_sub(1)) as f64)
                .min(FAMILY_BONUS_CAP);

        ((weighted_mean + confluence_bonus) * multiplier).clamp(0.0, 100.0)
    }

    /// The full decision for one snapshot at the given local hour. Every
    /// decision, trade or not, carries the complete explain payload.
    pub fn decide(&self, verdicts: &[Verdict], snapshot: &MarketSnapshot, hour: u32) -> Decision {
        let agreement = self.compute_agreement(verdicts);
        let (multiplier, session) = self.schedule.multiplier_for(hour);
        let meta_score = self.compute_meta_score(verdicts, &agreement, multiplier);

        let mut rejections = Vec::new();
        if !agreement.majority_direction.is_directional() {
            rejections.push("no directional majority among material verdicts".to_string());
        }
        if agreement.majority_count < self.config.min_detector_agreement {
            rejections.push(format!(
                "{} agreeing detectors below required {}",
                agreement.majority_count, self.config.min_detector_agreement
            ));
        }
        if meta_score < self.config.min_confidence {
            rejections.push(format!(
                "meta score {:.1} below minimum confidence {:.1}",
                meta_score, self.config.min_confidence
            ));
        }

        let explain = Explain {
            verdicts: verdicts.to_vec(),
            agreement,
            raw_meta_score: meta_score,
            session: session.map(str::to_string),
            time_multiplier: multiplier,
            rejections: rejections.clone(),
        };

        if !rejections.is_empty() {
            tracing::debug!(symbol = %snapshot.symbol, "no trade: {}", rejections.join("; "));
            return Decision {
                symbol: snapshot.symbol.clone(),
                direction: TradeCall::NoTrade,
                confidence: meta_score.round() as u32,
                reason: format!("no trading signal: {}", rejections.join("; ")),
                levels: None,
                explain,
            };
        }

        let direction = agreement.majority_direction;
        let agreeing: Vec<&Verdict> = verdicts
            .iter()
            .filter(|v| self.is_material(v) && v.direction == direction)
            .collect();
        let levels = self.levels.generate(direction, snapshot, &agreeing);

        let call = match direction {
            Direction::Long => TradeCall::Long,
            Direction::Short => TradeCall::Short,
            Direction::Neutral => TradeCall::NoTrade,
        };
        tracing::info!(
            symbol = %snapshot.symbol,
            direction = %call,
            confidence = meta_score.round(),
            "trade signal"
        );

        Decision {
            symbol: snapshot.symbol.clone(),
            direction: call,
            confidence: meta_score.round() as u32,
            reason: format!(
                "{} consensus: {}/{} material detectors agree, meta score {:.1}",
                call,
                agreement.majority_count,
                agreement.long_count + agreement.short_count,
                meta_score
            ),
            levels: Some(levels),
            explain,
        }
    }
}
