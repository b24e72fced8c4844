//! VWAP pullback detector
//!
//! Long-only by design: looks for price holding just above the 1m VWAP
//! with a bullish reversal bar and a volume pickup. There is no short
//! counterpart; a fade below VWAP is a different trade this detector
//! deliberately does not take.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::{stats, vwap};

const NAME: &str = "vwap_pullback";

/// Score weights: proximity to VWAP, volume pickup, reversal strength
const PROXIMITY_POINTS: f64 = 40.0;
const VOLUME_POINTS: f64 = 30.0;
const REVERSAL_POINTS: f64 = 30.0;

/// Volume ratio at which the volume component maxes out
const VOLUME_RATIO_CEILING: f64 = 2.0;

/// Reversal strength (bps of the bar body) that maxes the component
const REVERSAL_BPS_CEILING: f64 = 50.0;

pub struct VwapPullback;

impl Detector for VwapPullback {
    fn name(&self) -> &'static str {
        NAME
    }

    fn family(&self) -> DetectorFamily {
        DetectorFamily::MeanReversion
    }

    fn detect(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectorParams,
    ) -> Result<Verdict, DetectorError> {
        let bars = snapshot.candles(Timeframe::M1);
        let needed = params.vwap_window.max(params.pullback_volume_window + 1);
        if bars.len() < needed {
            return Err(DetectorError::InsufficientData { needed, got: bars.len() });
        }

        let window = &bars[bars.len() - params.vwap_window..];
        let anchor = vwap(window);
        if anchor <= 0.0 {
            return Err(DetectorError::Computation("degenerate vwap window".to_string()));
        }

        let current = bars[bars.len() - 1];
        let price = current.close;

        if price <= anchor {
            return Ok(Verdict::neutral(NAME, DetectorFamily::MeanReversion, "price below vwap"));
        }

        let distance_pct = (price - anchor) / anchor * 100.0;
        if distance_pct > params.vwap_proximity_pct {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::MeanReversion,
                format!("price {distance_pct:.2}% above vwap, outside pullback band"),
            ));
        }

        let bullish_reversal = current.is_bullish() && current.close > current.midpoint();
        if !bullish_reversal {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::MeanReversion,
                "no bullish reversal bar at vwap",
            ));
        }

        let prior_volumes: Vec<f64> = bars
            [bars.len() - 1 - params.pullback_volume_window..bars.len() - 1]
            .iter()
            .map(|c| c.volume)
            .collect();
        let avg_volume = stats::mean(&prior_volumes);
        if avg_volume <= 0.0 {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::MeanReversion,
                "no recent volume to confirm against",
            ));
        }
        let volume_ratio = current.volume / avg_volume;
        if volume_ratio <= params.pullback_volume_factor {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::MeanReversion,
                format!("volume {volume_ratio:.2}x below pullback threshold"),
            ));
        }

        let proximity = (1.0 - distance_pct / params.vwap_proximity_pct).clamp(0.0, 1.0);
        let volume_strength = ((volume_ratio - params.pullback_volume_factor)
            / (VOLUME_RATIO_CEILING - params.pullback_volume_factor))
            .clamp(0.0, 1.0);
        let reversal_bps = if current.open > 0.0 {
            (current.close - current.open) / current.open * 10_000.0
        } else {
            0.0
        };
        let reversal_strength = (reversal_bps / REVERSAL_BPS_CEILING).clamp(0.0, 1.0);

        let score = (proximity * PROXIMITY_POINTS
            + volume_strength * VOLUME_POINTS
            + reversal_strength * REVERSAL_POINTS)
            .min(100.0);

        Ok(Verdict::new(
            NAME,
            DetectorFamily::MeanReversion,
            Direction::Long,
            score,
            format!(
                "bullish reclaim {distance_pct:.3}% above vwap on {volume_ratio:.2}x volume, \
                 body {reversal_bps:.0} bps"
            ),
        )
        .with_metadata("vwap", anchor)
        .with_metadata("distance_pct", distance_pct)
        .with_metadata("volume_ratio", volume_ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::Candle;

    /// Flat 1m tape around `price` with mild volume noise
    fn tape(price: f64, count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let volume = if i % 2 == 0 { 95.0 } else { 105.0 };
                Candle::new(Utc::now(), price, price * 1.0005, price * 0.9995, price, volume)
            })
            .collect()
    }

    fn snapshot_with(bars: Vec<Candle>) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new("ETH-USDT", Utc::now());
        snapshot.candles.insert(Timeframe::M1, bars);
        snapshot
    }

    #[test]
    fn test_short_tape_is_insufficient() {
        let snapshot = snapshot_with(tape(100.0, 20));
        let result = VwapPullback.detect(&snapshot, &DetectorParams::default());
        assert!(matches!(result, Err(DetectorError::InsufficientData { .. })));
    }

    #[test]
    fn test_reclaim_with_volume_goes_long() {
        let mut bars = tape(100.0, 60);
        // bullish bar closing just above vwap (~100) in its upper half, 2x volume
        bars.push(Candle::new(Utc::now(), 99.95, 100.16, 99.9, 100.15, 220.0));
        let snapshot = snapshot_with(bars);

        let verdict = VwapPullback.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Long);
        assert!(verdict.score > 0.0);
        assert!(verdict.metadata_value("vwap").is_some());
    }

    #[test]
    fn test_price_below_vwap_is_neutral() {
        let mut bars = tape(100.0, 60);
        bars.push(Candle::new(Utc::now(), 99.6, 99.7, 99.4, 99.5, 300.0));
        let snapshot = snapshot_with(bars);

        let verdict = VwapPullback.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
    }

    #[test]
    fn test_extended_price_is_not_a_pullback() {
        let mut bars = tape(100.0, 60);
        // 1% above vwap is far outside the 0.2% band
        bars.push(Candle::new(Utc::now(), 100.9, 101.1, 100.8, 101.0, 300.0));
        let snapshot = snapshot_with(bars);

        let verdict = VwapPullback.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
        assert!(verdict.reason.contains("outside pullback band"));
    }

    #[test]
    fn test_weak_volume_is_neutral() {
        let mut bars = tape(100.0, 60);
        // right shape, but volume at the recent average
        bars.push(Candle::new(Utc::now(), 99.95, 100.16, 99.9, 100.15, 100.0));
        let snapshot = snapshot_with(bars);

        let verdict = VwapPullback.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
    }

    #[test]
    fn test_bearish_bar_is_neutral() {
        let mut bars = tape(100.0, 60);
        // close below open near vwap
        bars.push(Candle::new(Utc::now(), 100.2, 100.25, 100.0, 100.05, 250.0));
        let snapshot = snapshot_with(bars);

        let verdict = VwapPullback.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
    }
}
