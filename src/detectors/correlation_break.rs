//! Correlation/regime break detector
//!
//! Compares the volatility of recent 1h returns against the full return
//! history; a recent burst past the configured multiple flags a regime
//! break. The verdict is deliberately non-directional: a volatility
//! regime change says "something changed", not which way. It scores, it
//! never votes long or short.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Timeframe, Verdict};
use crate::indicators::stats;

const NAME: &str = "correlation_break";

/// Score at exactly the break ratio; scales linearly with the ratio
const RATIO_SCORE_SCALE: f64 = 50.0;

pub struct CorrelationBreak;

impl Detector for CorrelationBreak {
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
        let closes = snapshot.closes(Timeframe::H1);
        let returns: Vec<f64> = closes
            .windows(2)
            .filter(|pair| pair[0].abs() > f64::EPSILON)
            .map(|pair| (pair[1] - pair[0]) / pair[0])
            .collect();

        let needed = params.regime_recent_window * 2;
        if returns.len() < needed {
            return Err(DetectorError::InsufficientData { needed, got: returns.len() });
        }

        let historical_vol = stats::std_dev(&returns, stats::mean(&returns));
        if historical_vol < 1e-12 {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volatility,
                "flat return history carries no regime signal",
            ));
        }

        let recent = &returns[returns.len() - params.regime_recent_window..];
        let recent_vol = stats::std_dev(recent, stats::mean(recent));
        let ratio = recent_vol / historical_vol;

        // shift correlation of the last window against the one before it
        let previous =
            &returns[returns.len() - 2 * params.regime_recent_window..returns.len() - params.regime_recent_window];
        let regime_correlation = stats::pearson_correlation(recent, previous);

        if ratio <= params.regime_break_ratio {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::Volatility,
                format!("volatility within regime ({ratio:.2}x historical)"),
            )
            .with_metadata("volatility_ratio", ratio)
            .with_metadata("regime_correlation", regime_correlation));
        }

        let score = (ratio / params.regime_break_ratio * RATIO_SCORE_SCALE).min(100.0);
        Ok(Verdict::new(
            NAME,
            DetectorFamily::Volatility,
            Direction::Neutral,
            score,
            format!(
                "volatility regime break: recent {:.5} vs historical {:.5} ({ratio:.2}x)",
                recent_vol, historical_vol
            ),
        )
        .with_metadata("volatility_ratio", ratio)
        .with_metadata("regime_correlation", regime_correlation))
    }
}
