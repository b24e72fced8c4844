//! Relative Strength Index (Wilder smoothing)

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Neutral midpoint returned whenever RSI cannot be computed.
/// Uncertain reads as "no signal", never as an error.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Standard Wilder RSI over the close series.
///
/// Returns [`RSI_NEUTRAL`] on insufficient data (< period + 1 closes) or
/// any numeric fault. A loss-free window saturates at 100, a gain-free
/// window at 0, and a flat window stays at the neutral midpoint.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in closes[..=period].windows(2) {
        let delta = pair[1] - pair[0];
        if delta >= 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }
    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;

    for pair in closes[period..].windows(2) {
        let delta = pair[1] - pair[0];
        let (gain, loss) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
    }

    if avg_loss < f64::EPSILON {
        return if avg_gain < f64::EPSILON { RSI_NEUTRAL } else { 100.0 };
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    if value.is_finite() { value } else { RSI_NEUTRAL }
}
