//! Market snapshot value types
//!
//! A `MarketSnapshot` is the single input to one analysis pass: bounded
//! candle history per timeframe, an order-book snapshot, and a ticker.
//! Timeframes may be short or missing entirely; consumers are expected to
//! degrade to neutral rather than fault.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle timeframes carried by a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl Timeframe {
    /// All timeframes a snapshot may carry, shortest first
    pub const ALL: [Timeframe; 4] = [Self::M1, Self::M15, Self::H1, Self::H4];

    /// Bar duration in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M15 => 15,
            Self::H1 => 60,
            Self::H4 => 240,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::M1 => write!(f, "1m"),
            Self::M15 => write!(f, "15m"),
            Self::H1 => write!(f, "1h"),
            Self::H4 => write!(f, "4h"),
        }
    }
}

/// OHLCV candle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self { timestamp, open, high, low, close, volume }
    }

    /// Validate OHLC data integrity
    pub fn is_valid(&self) -> bool {
        self.high >= self.low
            && self.close >= self.low
            && self.close <= self.high
            && self.open >= self.low
            && self.open <= self.high
            && self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
            && self.volume >= 0.0
    }

    /// Typical price `(h + l + c) / 3`
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Bar midpoint `(h + l) / 2`
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// One price level of the order book
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub size: f64,
}

/// Order-book snapshot: bids best-first, asks best-first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Summed size of the top `depth` bid levels
    pub fn bid_volume(&self, depth: usize) -> f64 {
        self.bids.iter().take(depth).map(|l| l.size).sum()
    }

    /// Summed size of the top `depth` ask levels
    pub fn ask_volume(&self, depth: usize) -> f64 {
        self.asks.iter().take(depth).map(|l| l.size).sum()
    }
}

/// Last-trade ticker
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Ticker {
    pub last: f64,
}

/// Per-symbol market state for one analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub candles: HashMap<Timeframe, Vec<Candle>>,
    #[serde(default)]
    pub order_book: OrderBook,
    #[serde(default)]
    pub ticker: Ticker,
}

impl MarketSnapshot {
    pub fn new(symbol: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            captured_at,
            candles: HashMap::new(),
            order_book: OrderBook::default(),
            ticker: Ticker::default(),
        }
    }

    /// Candles for a timeframe; empty slice when the timeframe is missing
    pub fn candles(&self, timeframe: Timeframe) -> &[Candle] {
        self.candles.get(&timeframe).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Close series for a timeframe
    pub fn closes(&self, timeframe: Timeframe) -> Vec<f64> {
        self.candles(timeframe).iter().map(|c| c.close).collect()
    }

    /// Volume series for a timeframe
    pub fn volumes(&self, timeframe: Timeframe) -> Vec<f64> {
        self.candles(timeframe).iter().map(|c| c.volume).collect()
    }

    /// Last traded price from the ticker
    pub fn last_price(&self) -> f64 {
        self.ticker.last
    }
}
