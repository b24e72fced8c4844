//! Dual-timeframe RSI detector
//!
//! Requires the 15m and 1h RSI to agree before taking a side: both
//! oversold reads long (exhaustion bounce), both overbought reads
//! short. One timeframe alone is noise and stays neutral.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::rsi;

const NAME: &str = "rsi_momentum";

/// Score per point of average distance past the threshold
const DISTANCE_SCORE_SCALE: f64 = 5.0;

pub struct RsiMomentum;

impl Detector for RsiMomentum {
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
        let closes_15m = snapshot.closes(Timeframe::M15);
        let closes_1h = snapshot.closes(Timeframe::H1);
        let needed = params.rsi_period + 1;
        if closes_15m.len() < needed || closes_1h.len() < needed {
            return Err(DetectorError::InsufficientData {
                needed,
                got: closes_15m.len().min(closes_1h.len()),
            });
        }

        let rsi_15m = rsi(&closes_15m, params.rsi_period);
        let rsi_1h = rsi(&closes_1h, params.rsi_period);

        let verdict = if rsi_15m < params.rsi_oversold && rsi_1h < params.rsi_oversold {
            let distance =
                ((params.rsi_oversold - rsi_15m) + (params.rsi_oversold - rsi_1h)) / 2.0;
            Verdict::new(
                NAME,
                DetectorFamily::Momentum,
                Direction::Long,
                (distance * DISTANCE_SCORE_SCALE).min(100.0),
                format!("oversold on both timeframes (15m {rsi_15m:.1}, 1h {rsi_1h:.1})"),
            )
        } else if rsi_15m > params.rsi_overbought && rsi_1h > params.rsi_overbought {
            let distance =
                ((rsi_15m - params.rsi_overbought) + (rsi_1h - params.rsi_overbought)) / 2.0;
            Verdict::new(
                NAME,
                DetectorFamily::Momentum,
                Direction::Short,
                (distance * DISTANCE_SCORE_SCALE).min(100.0),
                format!("overbought on both timeframes (15m {rsi_15m:.1}, 1h {rsi_1h:.1})"),
            )
        } else {
            Verdict::neutral(
                NAME,
                DetectorFamily::Momentum,
                format!("no dual-timeframe alignment (15m {rsi_15m:.1}, 1h {rsi_1h:.1})"),
            )
        };

        Ok(verdict
            .with_metadata("rsi_15m", rsi_15m)
            .with_metadata("rsi_1h", rsi_1h))
    }
}
