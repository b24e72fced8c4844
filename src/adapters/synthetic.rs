//! Synthetic snapshot generation
//!
//! Seeded random-walk OHLCV tape aggregated into every timeframe the
//! engine consumes, with an optional breakout tail. Lets the full
//! pipeline run end-to-end with no market access; the same seed always
//! produces the same snapshot.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{BookLevel, Candle, MarketSnapshot, OrderBook, Ticker, Timeframe};

/// Per-minute volatility of the synthetic walk
const STEP_SIGMA: f64 = 0.0008;

const BASE_VOLUME: f64 = 1_000.0;

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub symbol: String,
    /// Number of 1m bars to generate
    pub bars: usize,
    pub seed: u64,
    pub start_price: f64,
    /// Append a high-volume breakout over the final 15 minutes
    pub breakout: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC-USDT".to_string(),
            bars: 1440,
            seed: 7,
            start_price: 100.0,
            breakout: false,
        }
    }
}

/// Build a full snapshot from the synthetic walk
pub fn generate_snapshot(config: &SyntheticConfig) -> MarketSnapshot {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut base = walk(&mut rng, config);

    if config.breakout {
        apply_breakout(&mut base, &mut rng);
    }

    let last_close = base.last().map(|c| c.close).unwrap_or(config.start_price);

    let mut snapshot = MarketSnapshot::new(config.symbol.clone(), Utc::now());
    snapshot.candles.insert(Timeframe::M1, base.clone());
    snapshot.candles.insert(Timeframe::M15, aggregate(&base, 15));
    snapshot.candles.insert(Timeframe::H1, aggregate(&base, 60));
    snapshot.candles.insert(Timeframe::H4, aggregate(&base, 240));
    snapshot.order_book = book_around(last_close, &mut rng, config.breakout);
    snapshot.ticker = Ticker { last: last_close };
    snapshot
}

fn walk(rng: &mut StdRng, config: &SyntheticConfig) -> Vec<Candle> {
    let start = Utc::now() - Duration::minutes(config.bars as i64);
    let mut price = config.start_price;
    let mut candles = Vec::with_capacity(config.bars);

    for i in 0..config.bars {
        let open = price;
        let drift: f64 = rng.gen_range(-STEP_SIGMA..STEP_SIGMA);
        let close = open * (1.0 + drift);
        let span = open.abs() * rng.gen_range(0.0..STEP_SIGMA);
        let high = open.max(close) + span;
        let low = open.min(close) - span;
        let volume = BASE_VOLUME * rng.gen_range(0.7..1.3);

        candles.push(Candle::new(
            start + Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
            volume,
        ));
        price = close;
    }
    candles
}

/// Rewrite the final 15 minutes into a strong, high-volume push above
/// the trailing range
fn apply_breakout(candles: &mut [Candle], rng: &mut StdRng) {
    let len = candles.len();
    if len < 30 {
        return;
    }

    let recent_high = candles[..len - 15].iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let target = recent_high * 1.02;

    let mut price = candles[len - 16].close;
    let step = (target - price) / 15.0;
    for (i, candle) in candles[len - 15..].iter_mut().enumerate() {
        let open = price;
        let close = open + step * rng.gen_range(0.9..1.1);
        candle.open = open;
        candle.close = close;
        candle.high = open.max(close) * 1.0005;
        candle.low = open.min(close) * 0.9995;
        candle.volume = BASE_VOLUME * (2.0 + i as f64 * 0.2);
        price = close;
    }
}

fn aggregate(base: &[Candle], factor: usize) -> Vec<Candle> {
    base.chunks(factor)
        .filter(|chunk| chunk.len() == factor)
        .map(|chunk| {
            Candle::new(
                chunk[0].timestamp,
                chunk[0].open,
                chunk.iter().map(|c| c.high).fold(f64::MIN, f64::max),
                chunk.iter().map(|c| c.low).fold(f64::MAX, f64::min),
                chunk[chunk.len() - 1].close,
                chunk.iter().map(|c| c.volume).sum(),
            )
        })
        .collect()
}

fn book_around(price: f64, rng: &mut StdRng, bid_heavy: bool) -> OrderBook {
    let tick = price * 0.0005;
    let bid_scale = if bid_heavy { 3.0 } else { 1.0 };
    OrderBook {
        bids: (1..=5)
            .map(|i| BookLevel {
                price: price - tick * i as f64,
                size: bid_scale * rng.gen_range(1.0..4.0),
            })
            .collect(),
        asks: (1..=5)
            .map(|i| BookLevel {
                price: price + tick * i as f64,
                size: rng.gen_range(1.0..4.0),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_tape() {
        let config = SyntheticConfig { bars: 200, ..SyntheticConfig::default() };
        let a = generate_snapshot(&config);
        let b = generate_snapshot(&config);
        let closes_a: Vec<f64> = a.candles(Timeframe::M1).iter().map(|c| c.close).collect();
        let closes_b: Vec<f64> = b.candles(Timeframe::M1).iter().map(|c| c.close).collect();
        assert_eq!(closes_a, closes_b);
    }

    #[test]
    fn test_all_candles_are_valid() {
        let config = SyntheticConfig { bars: 480, breakout: true, ..SyntheticConfig::default() };
        let snapshot = generate_snapshot(&config);
        for &tf in &Timeframe::ALL {
            for candle in snapshot.candles(tf) {
                assert!(candle.is_valid(), "invalid candle on {tf}");
            }
        }
    }

    #[test]
    fn test_aggregation_counts() {
        let config = SyntheticConfig { bars: 1440, ..SyntheticConfig::default() };
        let snapshot = generate_snapshot(&config);
        assert_eq!(snapshot.candles(Timeframe::M1).len(), 1440);
        assert_eq!(snapshot.candles(Timeframe::M15).len(), 96);
        assert_eq!(snapshot.candles(Timeframe::H1).len(), 24);
        assert_eq!(snapshot.candles(Timeframe::H4).len(), 6);
    }

    #[test]
    fn test_breakout_lifts_the_tail() {
        let config = SyntheticConfig { bars: 480, breakout: true, ..SyntheticConfig::default() };
        let snapshot = generate_snapshot(&config);
        let m15 = snapshot.candles(Timeframe::M15);
        let last = m15.last().unwrap();
        let prior_high =
            m15[..m15.len() - 1].iter().map(|c| c.high).fold(f64::MIN, f64::max);
        assert!(last.close > prior_high, "breakout tail should clear the range");
        assert!(snapshot.ticker.last > 0.0);
    }
}
