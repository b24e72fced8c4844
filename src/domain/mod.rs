//! Domain Layer - Core value types for the ensemble engine
//!
//! Pure data with no external dependencies beyond serialization. Every
//! entity here is constructed fresh per analysis pass from one snapshot;
//! nothing in this layer holds long-lived state.

pub mod decision;
pub mod market;
pub mod verdict;

pub use decision::{
    AgreementStats, Decision, Explain, PositionSizing, Recommendation, TradeCall, TradeLevels,
};
pub use market::{BookLevel, Candle, MarketSnapshot, OrderBook, Ticker, Timeframe};
pub use verdict::{DetectorFamily, Direction, Verdict};
