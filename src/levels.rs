//! Trade level generation
//!
//! Derives entry/stop/target from the decision direction and
//! multi-timeframe volatility. Risk is an ATR fraction of price; the
//! target is a multiple of risk, widened when strong momentum or volume
//! agreement suggests the move has legs. Thin 15m history falls back to
//! a fixed percent band.

use crate::domain::{
    DetectorFamily, Direction, MarketSnapshot, Timeframe, TradeLevels, Verdict,
};
use crate::indicators::atr;

/// Timeframes blended into the volatility estimate
const ATR_TIMEFRAMES: [Timeframe; 3] = [Timeframe::M15, Timeframe::H1, Timeframe::H4];

/// Bars a timeframe needs before its ATR joins the blend
const ATR_MIN_BARS: usize = 15;

/// 15m bars below which the fixed fallback band is used
const MIN_PRIMARY_BARS: usize = 10;

#[derive(Debug, Clone)]
pub struct LevelsConfig {
    pub atr_period: usize,
    /// Stop distance as a multiple of the blended ATR fraction
    pub stop_atr_mult: f64,
    /// Target distance as a multiple of risk
    pub target_rr: f64,
    /// Verdict score past which momentum/volume agreement widens the target
    pub strong_score: f64,
    /// Target widening applied on strong agreement
    pub target_expansion: f64,
    /// Entry nudge toward a reported breakout extreme
    pub entry_nudge: f64,
    /// Risk band when 15m history is too thin for ATR
    pub fallback_risk_pct: f64,
    /// Target multiple on the fallback band
    pub fallback_rr: f64,
    /// ATR fraction of price assumed when no timeframe qualifies
    pub default_atr_fraction: f64,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            stop_atr_mult: 0.8,
            target_rr: 1.5,
            strong_score: 70.0,
            target_expansion: 1.1,
            entry_nudge: 0.001,
            fallback_risk_pct: 0.02,
            fallback_rr: 1.8,
            default_atr_fraction: 0.02,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelsGenerator {
    config: LevelsConfig,
}

impl LevelsGenerator {
    pub fn new(config: LevelsConfig) -> Self {
        Self { config }
    }

    /// Levels for a directional decision. `agreeing` are the verdicts
    /// that voted with the majority; breakout metadata among them nudges
    /// the entry, strong momentum/volume scores widen the target.
    pub fn generate(
        &self,
        direction: Direction,
        snapshot: &MarketSnapshot,
        agreeing: &[&Verdict],
    ) -> TradeLevels {
        let price = snapshot.last_price();
        if !(price > 0.0) || !price.is_finite() {
            return TradeLevels { entry: 0.0, stop_loss: 0.0, take_profit: 0.0, risk_reward: 0.0 };
        }

        if snapshot.candles(Timeframe::M15).len() < MIN_PRIMARY_BARS {
            return self.fallback(direction, price);
        }

        let atr_fraction = self.blended_atr_fraction(snapshot, price);
        let entry = self.entry_price(direction, price, agreeing);
        let risk = self.config.stop_atr_mult * atr_fraction * price;

        let strong_agreement = agreeing.iter().any(|v| {
            v.score > self.config.strong_score
                && matches!(v.family, DetectorFamily::Momentum | DetectorFamily::Volume)
        });
        let target_mult = if strong_agreement {
            self.config.target_rr * self.config.target_expansion
        } else {
            self.config.target_rr
        };

        let (stop_loss, take_profit) = match direction {
            Direction::Short => (entry + risk, entry - target_mult * risk),
            _ => (entry - risk, entry + target_mult * risk),
        };

        TradeLevels {
            entry,
            stop_loss,
            take_profit,
            risk_reward: round2((take_profit - entry).abs() / risk),
        }
    }

    /// Mean ATR fraction across timeframes with enough history,
    /// defaulting when none qualify
    fn blended_atr_fraction(&self, snapshot: &MarketSnapshot, price: f64) -> f64 {
        let fractions: Vec<f64> = ATR_TIMEFRAMES
            .iter()
            .filter_map(|&tf| {
                let candles = snapshot.candles(tf);
                if candles.len() < ATR_MIN_BARS {
                    return None;
                }
                let value = atr(candles, self.config.atr_period);
                if value > 0.0 { Some(value / price) } else { None }
            })
            .collect();

        if fractions.is_empty() {
            self.config.default_atr_fraction
        } else {
            fractions.iter().sum::<f64>() / fractions.len() as f64
        }
    }

    /// Entry defaults to the current price, nudged toward a momentum
    /// detector's reported range extreme when that metadata is present
    fn entry_price(&self, direction: Direction, price: f64, agreeing: &[&Verdict]) -> f64 {
        let momentum = agreeing.iter().find(|v| {
            v.family == DetectorFamily::Momentum
                && v.metadata_value("recent_high").is_some()
                && v.metadata_value("recent_low").is_some()
        });
        if momentum.is_none() {
            return price;
        }

        match direction {
            Direction::Short => price * (1.0 - self.config.entry_nudge),
            _ => price * (1.0 + self.config.entry_nudge),
        }
    }

    fn fallback(&self, direction: Direction, price: f64) -> TradeLevels {
        let risk = self.config.fallback_risk_pct * price;
        let (stop_loss, take_profit) = match direction {
            Direction::Short => (price + risk, price - self.config.fallback_rr * risk),
            _ => (price - risk, price + self.config.fallback_rr * risk),
        };
        TradeLevels {
            entry: price,
            stop_loss,
            take_profit,
            risk_reward: round2(self.config.fallback_rr),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
