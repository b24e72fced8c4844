//! Indicator Library - pure numeric primitives
//!
//! Deterministic, side-effect-free building blocks shared by the
//! detector suite and the levels generator. Every primitive defines an
//! explicit fallback for degenerate input (0, the RSI midpoint, or
//! `None`) so that short or constant history degrades to "no signal"
//! instead of NaN or a panic.

pub mod atr;
pub mod bollinger;
pub mod rsi;
pub mod stats;
pub mod vwap;

pub use atr::{atr, DEFAULT_ATR_PERIOD};
pub use bollinger::{bollinger, BollingerBands, DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_STD_DEV};
pub use rsi::{rsi, DEFAULT_RSI_PERIOD, RSI_NEUTRAL};
pub use stats::{mean, pearson_correlation, percentile, std_dev, z_score};
pub use vwap::vwap;
