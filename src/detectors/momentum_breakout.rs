//! Momentum breakout detector
//!
//! Watches the trailing 15m range: a close of the current bar beyond the
//! range extreme, confirmed by a volume z-score and a volume multiple
//! over the range mean, reads as a breakout (long) or breakdown (short).
//! The range extremes are exported as metadata so the levels generator
//! can bias the entry toward them.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::stats;

const NAME: &str = "momentum_breakout";

/// Fraction of the range low below which a close counts as a breakdown
const BREAKDOWN_TOLERANCE: f64 = 0.99;

pub struct MomentumBreakout;

impl Detector for MomentumBreakout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn family(&self) -> DetectorFamily {
        DetectorFamily::Momentum
    }

    fn detect(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectorParams,
    ) -> Result<Verdict, DetectorError> {
        let bars = snapshot.candles(Timeframe::M15);
        let needed = params.breakout_lookback + 1;
        if bars.len() < needed {
            return Err(DetectorError::InsufficientData { needed, got: bars.len() });
        }

        let current = bars[bars.len() - 1];
        let window = &bars[bars.len() - 1 - params.breakout_lookback..bars.len() - 1];

        let resistance = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let support = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        if !(resistance > 0.0) || !(support > 0.0) {
            return Err(DetectorError::Computation(format!(
                "degenerate range: high {resistance}, low {support}"
            )));
        }

        let volumes: Vec<f64> = window.iter().map(|c| c.volume).collect();
        let volume_ma = stats::mean(&volumes);
        let volume_z = stats::z_score(current.volume, &volumes);
        let volume_confirmed = volume_z > params.breakout_volume_z
            && current.volume > volume_ma * params.breakout_volume_factor;

        let breakout_level = resistance * (1.0 + params.min_breakout_pct / 100.0);
        if current.high >= breakout_level && volume_confirmed {
            let breakout_pct = (current.high / resistance - 1.0) * 100.0;
            let volume_strength_pct = (current.volume / volume_ma - 1.0) * 100.0;
            let score = ((breakout_pct * 0.6 + volume_strength_pct * 0.4) * 2.0).min(100.0);
            return Ok(Verdict::new(
                NAME,
                DetectorFamily::Momentum,
                Direction::Long,
                score,
                format!(
                    "breakout {:.2}% above {}-bar high {:.4} on {:.1}x volume",
                    breakout_pct,
                    params.breakout_lookback,
                    resistance,
                    current.volume / volume_ma
                ),
            )
            .with_metadata("recent_high", resistance)
            .with_metadata("recent_low", support)
            .with_metadata("volume_z", volume_z));
        }

        if current.close < support * BREAKDOWN_TOLERANCE && volume_confirmed {
            let breakdown_pct = (1.0 - current.close / support) * 100.0;
            let score = (breakdown_pct * 1.5).min(100.0);
            return Ok(Verdict::new(
                NAME,
                DetectorFamily::Momentum,
                Direction::Short,
                score,
                format!(
                    "breakdown {:.2}% below {}-bar low {:.4} on elevated volume",
                    breakdown_pct, params.breakout_lookback, support
                ),
            )
            .with_metadata("recent_high", resistance)
            .with_metadata("recent_low", support)
            .with_metadata("volume_z", volume_z));
        }

        Ok(Verdict::neutral(
            NAME,
            DetectorFamily::Momentum,
            "no confirmed breakout of the trailing range",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::Candle;

    /// Bars oscillating inside [99.5, 100.5] with alternating volume so
    /// the volume z-score has variance to work with
    fn range_bars(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let wiggle = if i % 2 == 0 { 0.2 } else { -0.2 };
                let volume = if i % 2 == 0 { 900.0 } else { 1100.0 };
                Candle::new(
                    Utc::now(),
                    100.0,
                    100.5 + wiggle * 0.1,
                    99.5,
                    100.0 + wiggle,
                    volume,
                )
            })
            .collect()
    }

    fn snapshot_with(bars: Vec<Candle>) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());
        snapshot.candles.insert(Timeframe::M15, bars);
        snapshot
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let snapshot = snapshot_with(range_bars(10));
        let result = MomentumBreakout.detect(&snapshot, &DetectorParams::default());
        assert!(matches!(result, Err(DetectorError::InsufficientData { .. })));
    }

    #[test]
    fn test_breakout_with_volume_goes_long() {
        let mut bars = range_bars(24);
        // final high 2% above the trailing 20-bar range on 2x volume
        bars.push(Candle::new(Utc::now(), 100.4, 102.6, 100.2, 102.5, 2000.0));
        let snapshot = snapshot_with(bars);

        let verdict = MomentumBreakout
            .detect(&snapshot, &DetectorParams::default())
            .unwrap();
        assert_eq!(verdict.direction, Direction::Long);
        assert!(verdict.score > 0.0);
        assert!(verdict.metadata_value("recent_high").is_some());
        assert!(verdict.metadata_value("volume_z").unwrap() > 1.0);
    }

    #[test]
    fn test_breakout_without_volume_stays_neutral() {
        let mut bars = range_bars(24);
        // same price spike but average volume
        bars.push(Candle::new(Utc::now(), 100.4, 102.6, 100.2, 102.5, 1000.0));
        let snapshot = snapshot_with(bars);

        let verdict = MomentumBreakout
            .detect(&snapshot, &DetectorParams::default())
            .unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_breakdown_goes_short() {
        let mut bars = range_bars(24);
        // close well under the range low on heavy volume
        bars.push(Candle::new(Utc::now(), 99.6, 99.7, 96.0, 96.2, 2500.0));
        let snapshot = snapshot_with(bars);

        let verdict = MomentumBreakout
            .detect(&snapshot, &DetectorParams::default())
            .unwrap();
        assert_eq!(verdict.direction, Direction::Short);
        assert!(verdict.score > 0.0);
        assert!(verdict.metadata_value("recent_low").is_some());
    }

    #[test]
    fn test_quiet_range_is_neutral() {
        let snapshot = snapshot_with(range_bars(30));
        let verdict = MomentumBreakout
            .detect(&snapshot, &DetectorParams::default())
            .unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
    }
}
