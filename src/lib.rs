#![allow(dead_code, unused_imports)]
//! Quorum - Ensemble Technical-Analysis Decision Engine Library
//!
//! Seven independent detectors score a market snapshot; an aggregator
//! blends their verdicts into one directional decision with levels and
//! position sizing.
//!
//! # Modules
//!
//! - `domain`: Core value types (MarketSnapshot, Verdict, Decision)
//! - `indicators`: Pure numeric primitives (ATR, VWAP, RSI, Bollinger, z-score)
//! - `detectors`: The seven-detector suite and its fault barrier
//! - `ensemble`: Agreement stats, meta-score and decision policy
//! - `levels`: Entry/stop/target generation from multi-timeframe volatility
//! - `sizing`: Risk-account position sizing
//! - `ports`: Trait abstractions (SnapshotProvider, Clock)
//! - `adapters`: File snapshot source, synthetic tape, CLI definitions
//! - `config`: Configuration loading and validation
//! - `application`: AnalysisEngine facade wiring it all together

pub mod adapters;
pub mod application;
pub mod config;
pub mod detectors;
pub mod domain;
pub mod ensemble;
pub mod indicators;
pub mod levels;
pub mod ports;
pub mod sizing;
