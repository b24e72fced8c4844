//! Average True Range (Wilder smoothing)

use crate::domain::Candle;

pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Wilder-smoothed ATR over `candles`.
///
/// True range per bar is `max(high - low, |high - prev_close|,
/// |low - prev_close|)`. The seed is the mean of the first `period`
/// true ranges, then `atr = (atr * (period - 1) + tr) / period`.
/// Returns 0 with fewer than `period + 1` candles.
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period + 1 {
        return 0.0;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| true_range(&pair[1], pair[0].close))
        .collect();

    let mut atr = true_ranges[..period].iter().sum::<f64>() / period as f64;
    for tr in &true_ranges[period..] {
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
    }

    if atr.is_finite() && atr >= 0.0 { atr } else { 0.0 }
}

fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    let hl = candle.high - candle.low;
    let hc = (candle.high - prev_close).abs();
    let lc = (candle.low - prev_close).abs();
    hl.max(hc).max(lc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candle(high: f64, low: f64, close: f64) -> Candle {
        Candle::new(Utc::now(), close, high, low, close, 1000.0)
    }

    #[test]
    fn test_atr_insufficient_data_is_zero() {
        let candles: Vec<Candle> = (0..14).map(|_| candle(101.0, 99.0, 100.0)).collect();
        assert_eq!(atr(&candles, 14), 0.0);
        assert_eq!(atr(&[], 14), 0.0);
    }

    #[test]
    fn test_atr_exactly_period_plus_one_is_finite() {
        let candles: Vec<Candle> = (0..15).map(|_| candle(102.0, 98.0, 100.0)).collect();
        let value = atr(&candles, 14);
        assert!(value.is_finite());
        assert!(value >= 0.0);
        // every bar spans 4.0 with unchanged closes, so ATR is the range
        assert!((value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_atr_uses_gap_over_range() {
        // second bar gaps far above the first close: TR must use |high - prev_close|
        let candles = vec![candle(101.0, 99.0, 100.0), candle(111.0, 110.0, 110.5)];
        let value = atr(&candles, 1);
        assert!((value - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_atr_smoothing_converges_toward_recent_range() {
        let mut candles: Vec<Candle> = (0..20).map(|_| candle(101.0, 99.0, 100.0)).collect();
        // widen the range for the last 5 bars
        for _ in 0..5 {
            candles.push(candle(105.0, 95.0, 100.0));
        }
        let value = atr(&candles, 14);
        assert!(value > 2.0 && value < 10.0, "atr = {value}");
    }
}
