//! Volume spike detector
//!
//! A volume z-score past the threshold on the current 15m bar, read
//! through the bar's direction. A spike on a doji carries no direction
//! and stays neutral: volume alone is not a signal.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::stats;

const NAME: &str = "volume_spike";

/// Score per unit of volume z-score
const Z_SCORE_SCALE: f64 = 25.0;

pub struct VolumeSpike;

impl Detector for VolumeSpike {
    fn name(&self) -> &'static str {
        NAME
    }

    fn family(&self) -> DetectorFamily {
        DetectorFamily::Volume
    }

    fn detect(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectorParams,
    ) -> Result<Verdict, DetectorError> {
        let bars = snapshot.candles(Timeframe::M15);
        let needed = params.volume_lookback + 1;
        if bars.len() < needed {
            return Err(DetectorError::InsufficientData { needed, got: bars.len() });
        }

        let current = bars[bars.len() - 1];
        let prior_volumes: Vec<f64> = bars
            [bars.len() - 1 - params.volume_lookback..bars.len() - 1]
            .iter()
            .map(|c| c.volume)
            .collect();
        let volume_z = stats::z_score(current.volume, &prior_volumes);

        if volume_z <= params.volume_spike_z {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volume,
                format!("volume z {volume_z:.2} below spike threshold"),
            ));
        }

        let direction = if current.is_bullish() {
            Direction::Long
        } else if current.is_bearish() {
            Direction::Short
        } else {
            // qualifying spike, but nothing to read a direction from
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volume,
                format!("volume spike (z {volume_z:.2}) without a directional candle"),
            )
            .with_metadata("volume_z", volume_z));
        };

        Ok(Verdict::new(
            NAME,
            DetectorFamily::Volume,
            direction,
            (volume_z * Z_SCORE_SCALE).min(100.0),
            format!(
                "volume spike z {:.2} on a {} bar",
                volume_z,
                if direction == Direction::Long { "bullish" } else { "bearish" }
            ),
        )
        .with_metadata("volume_z", volume_z))
    }
}
