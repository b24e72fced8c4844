//! Volatility squeeze detector
//!
//! Tracks Bollinger band width on the 15m series against its own
//! history. A current width at or below the configured percentile of
//! that history is a squeeze; a squeeze plus a band pierce plus a volume
//! pickup reads as the expansion starting, long through the upper band
//! or short through the lower.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::{bollinger, stats};

const NAME: &str = "volatility_squeeze";

/// Minimum width observations before the percentile is meaningful
const MIN_WIDTH_HISTORY: usize = 10;

/// Volume z-score at which the volume component maxes out
const VOLUME_Z_CEILING: f64 = 3.0;

const BASE_POINTS: f64 = 30.0;
const DEPTH_POINTS: f64 = 40.0;
const VOLUME_POINTS: f64 = 30.0;

pub struct VolatilitySqueeze;

impl Detector for VolatilitySqueeze {
    fn name(&self) -> &'static str {
        NAME
    }

    fn family(&self) -> DetectorFamily {
        DetectorFamily::Volatility
    }

    fn detect(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectorParams,
    ) -> Result<Verdict, DetectorError> {
        let bars = snapshot.candles(Timeframe::M15);
        let closes = snapshot.closes(Timeframe::M15);
        // the current bar is judged against bands formed before it
        let needed = params.bollinger_period + MIN_WIDTH_HISTORY + 1;
        if closes.len() < needed {
            return Err(DetectorError::InsufficientData { needed, got: closes.len() });
        }
        let history = &closes[..closes.len() - 1];

        // band-width history across the whole series, one value per window
        let mut widths = Vec::with_capacity(history.len() - params.bollinger_period + 1);
        for end in params.bollinger_period..=history.len() {
            if let Some(bands) =
                bollinger(&history[..end], params.bollinger_period, params.bollinger_std_dev)
            {
                widths.push(bands.width());
            }
        }
        let current_width = *widths.last().ok_or_else(|| {
            DetectorError::Computation("empty band-width history".to_string())
        })?;
        let squeeze_floor = stats::percentile(&widths, params.squeeze_percentile);

        if current_width > squeeze_floor {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volatility,
                format!(
                    "band width {:.5} above the p{} squeeze floor {:.5}",
                    current_width, params.squeeze_percentile, squeeze_floor
                ),
            ));
        }

        let bands = bollinger(history, params.bollinger_period, params.bollinger_std_dev)
            .ok_or_else(|| DetectorError::Computation("bollinger window vanished".to_string()))?;
        let last_close = closes[closes.len() - 1];

        let direction = if last_close > bands.upper {
            Direction::Long
        } else if last_close < bands.lower {
            Direction::Short
        } else {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volatility,
                "squeeze without a band breach",
            ));
        };

        let current = bars[bars.len() - 1];
        let lookback = params.volume_lookback.min(bars.len() - 1);
        let prior_volumes: Vec<f64> = bars[bars.len() - 1 - lookback..bars.len() - 1]
            .iter()
            .map(|c| c.volume)
            .collect();
        let volume_z = stats::z_score(current.volume, &prior_volumes);
        if volume_z <= params.squeeze_volume_z {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volatility,
                format!("band breach without volume (z {volume_z:.2})"),
            ));
        }

        let depth = if squeeze_floor > 0.0 {
            ((squeeze_floor - current_width) / squeeze_floor).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let volume_strength = (volume_z / VOLUME_Z_CEILING).clamp(0.0, 1.0);
        let score =
            (BASE_POINTS + depth * DEPTH_POINTS + volume_strength * VOLUME_POINTS).min(100.0);

        Ok(Verdict::new(
            NAME,
            DetectorFamily::Volatility,
            direction,
            score,
            format!(
                "squeeze expansion {} through the {} band, width {:.5} vs floor {:.5}, volume z {:.2}",
                direction,
                if direction == Direction::Long { "upper" } else { "lower" },
                current_width,
                squeeze_floor,
                volume_z
            ),
        )
        .with_metadata("band_width", current_width)
        .with_metadata("squeeze_floor", squeeze_floor)
        .with_metadata("volume_z", volume_z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::Candle;

    fn bar(close: f64, volume: f64) -> Candle {
        Candle::new(Utc::now(), close, close + 0.1, close - 0.1, close, volume)
    }

    fn snapshot_with(bars: Vec<Candle>) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());
        snapshot.candles.insert(Timeframe::M15, bars);
        snapshot
    }

    /// Early history noisy, recent window nearly flat: width contracts
    /// into its own bottom decile
    fn squeezed_series() -> Vec<Candle> {
        let mut bars = Vec::new();
        for i in 0..60 {
            let wiggle = if i % 2 == 0 { 2.0 } else { -2.0 };
            let volume = if i % 2 == 0 { 950.0 } else { 1050.0 };
            bars.push(bar(100.0 + wiggle, volume));
        }
        for i in 0..25 {
            let wiggle = if i % 2 == 0 { 0.05 } else { -0.05 };
            let volume = if i % 2 == 0 { 950.0 } else { 1050.0 };
            bars.push(bar(100.0 + wiggle, volume));
        }
        bars
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let snapshot = snapshot_with((0..20).map(|_| bar(100.0, 1000.0)).collect());
        let result = VolatilitySqueeze.detect(&snapshot, &DetectorParams::default());
        assert!(matches!(result, Err(DetectorError::InsufficientData { .. })));
    }

    #[test]
    fn test_squeeze_breakout_with_volume_goes_long() {
        let mut bars = squeezed_series();
        // pierce the collapsed upper band on a volume surge
        bars.push(bar(101.0, 4000.0));
        let snapshot = snapshot_with(bars);

        let verdict =
            VolatilitySqueeze.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Long);
        assert!(verdict.score > 0.0);
        assert!(verdict.metadata_value("volume_z").unwrap() > 0.5);
    }

    #[test]
    fn test_squeeze_breakdown_goes_short() {
        let mut bars = squeezed_series();
        bars.push(bar(99.0, 4000.0));
        let snapshot = snapshot_with(bars);

        let verdict =
            VolatilitySqueeze.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Short);
    }

    #[test]
    fn test_squeeze_without_breach_is_neutral() {
        let snapshot = snapshot_with(squeezed_series());
        let verdict =
            VolatilitySqueeze.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
    }

    #[test]
    fn test_expanding_bands_are_neutral() {
        // volatility expanding, not contracting: width sits above its
        // own history, so no squeeze
        let bars: Vec<Candle> = (0..80)
            .map(|i| {
                let amplitude = if i < 55 { 0.5 } else { 3.0 };
                let wiggle = if i % 2 == 0 { amplitude } else { -amplitude };
                bar(100.0 + wiggle, 1000.0)
            })
            .collect();
        let snapshot = snapshot_with(bars);

        let verdict =
            VolatilitySqueeze.detect(&snapshot, &DetectorParams::default()).unwrap();
        assert_eq!(verdict.direction, Direction::Neutral);
        assert!(verdict.reason.contains("squeeze floor"));
    }
}
