//! Ensemble Layer - verdict aggregation and decision policy
//!
//! - `aggregator`: material-agreement tally, weighted meta-score with
//!   confluence bonus, and the final trade/no-trade policy
//! - `time_of_day`: named session schedule scaling the meta-score

pub mod aggregator;
pub mod time_of_day;

pub use aggregator::{EnsembleAggregator, EnsembleConfig, DEFAULT_MATERIAL_SCORE_FLOOR};
pub use time_of_day::{SessionSchedule, TradingSession};
