//! Volume-weighted average price

use crate::domain::Candle;

/// VWAP over the given candles, weighting each bar's typical price
/// `(h + l + c) / 3` by its volume. Returns 0 for empty input or a
/// window with no traded volume.
pub fn vwap(candles: &[Candle]) -> f64 {
    let total_volume: f64 = candles.iter().map(|c| c.volume).sum();
    if candles.is_empty() || total_volume <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = candles.iter().map(|c| c.typical_price() * c.volume).sum();
    let value = weighted / total_volume;
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candle(high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(Utc::now(), close, high, low, close, volume)
    }

    #[test]
    fn test_vwap_empty_is_zero() {
        assert_eq!(vwap(&[]), 0.0);
    }

    #[test]
    fn test_vwap_zero_volume_is_zero() {
        let candles = vec![candle(101.0, 99.0, 100.0, 0.0)];
        assert_eq!(vwap(&candles), 0.0);
    }

    #[test]
    fn test_vwap_single_bar_is_typical_price() {
        let candles = vec![candle(102.0, 96.0, 102.0, 500.0)];
        assert!((vwap(&candles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_vwap_weights_by_volume() {
        // typical prices 100 and 200, volumes 3:1 -> 125
        let candles = vec![candle(100.0, 100.0, 100.0, 300.0), candle(200.0, 200.0, 200.0, 100.0)];
        assert!((vwap(&candles) - 125.0).abs() < 1e-9);
    }
}
