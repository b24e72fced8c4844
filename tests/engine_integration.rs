//! End-to-end pipeline tests: snapshot in, decision out.

use std::sync::Arc;

use chrono::Utc;

use quorum::adapters::{generate_snapshot, SyntheticConfig};
use quorum::application::AnalysisEngine;
use quorum::config::Config;
use quorum::domain::{
    BookLevel, Candle, Direction, MarketSnapshot, OrderBook, Ticker, TradeCall, Timeframe,
};
use quorum::ensemble::TradingSession;
use quorum::ports::FixedClock;

fn engine_at(hour: u32) -> AnalysisEngine {
    AnalysisEngine::from_config(&Config::default(), Arc::new(FixedClock(hour)))
}

/// 15m range bars around 100 with enough volume variance for z-scores
fn range_bars(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let wiggle = if i % 2 == 0 { 0.2 } else { -0.2 };
            let volume = if i % 2 == 0 { 900.0 } else { 1100.0 };
            Candle::new(Utc::now(), 100.0, 100.5, 99.5, 100.0 + wiggle, volume)
        })
        .collect()
}

/// Snapshot where the final 15m bar breaks the trailing range on heavy
/// volume, with a bid-heavy book backing it up
fn breakout_snapshot() -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());

    let mut m15 = range_bars(30);
    m15.push(Candle::new(Utc::now(), 100.4, 103.0, 100.2, 102.8, 3000.0));
    snapshot.candles.insert(Timeframe::M15, m15);

    let h1: Vec<Candle> = (0..20)
        .map(|i| {
            let wiggle = if i % 2 == 0 { 0.3 } else { -0.3 };
            Candle::new(Utc::now(), 100.0, 100.6, 99.4, 100.0 + wiggle, 5000.0)
        })
        .collect();
    snapshot.candles.insert(Timeframe::H1, h1);

    snapshot.order_book = OrderBook {
        bids: (0..3).map(|i| BookLevel { price: 102.7 - i as f64 * 0.1, size: 3.0 }).collect(),
        asks: (0..3).map(|i| BookLevel { price: 102.9 + i as f64 * 0.1, size: 1.0 }).collect(),
    };
    snapshot.ticker = Ticker { last: 102.8 };
    snapshot
}

#[test]
fn breakout_snapshot_produces_long_trade_with_levels_and_sizing() {
    let engine = engine_at(12);
    let recommendation = engine.recommend(&breakout_snapshot());
    let decision = &recommendation.decision;

    assert_eq!(decision.direction, TradeCall::Long);
    assert!(decision.confidence >= 60, "confidence {}", decision.confidence);
    assert!(decision.explain.rejections.is_empty());
    assert_eq!(decision.explain.verdicts.len(), 7);

    // momentum and volume both fire long on this tape
    let breakout = decision
        .explain
        .verdicts
        .iter()
        .find(|v| v.detector == "momentum_breakout")
        .unwrap();
    assert_eq!(breakout.direction, Direction::Long);
    let spike =
        decision.explain.verdicts.iter().find(|v| v.detector == "volume_spike").unwrap();
    assert_eq!(spike.direction, Direction::Long);

    let levels = decision.levels.expect("trade must carry levels");
    assert!(levels.stop_loss < levels.entry);
    assert!(levels.take_profit > levels.entry);
    // strong momentum agreement widens the 1.5R target by 10%
    assert!((levels.risk_reward - 1.65).abs() < 1e-9, "rr {}", levels.risk_reward);
    // entry nudged 0.1% toward the breakout extreme
    assert!((levels.entry - 102.8 * 1.001).abs() < 1e-9);

    let sizing = recommendation.sizing.expect("trade must carry sizing");
    assert!((sizing.max_loss - 100.0).abs() < 1e-9);
    assert!(sizing.size > 0.0);
}

#[test]
fn degraded_snapshot_yields_fully_populated_no_trade() {
    let mut snapshot = MarketSnapshot::new("BTC-USDT", Utc::now());
    // a handful of bars on one timeframe, nothing else
    snapshot.candles.insert(Timeframe::M15, range_bars(5));
    snapshot.ticker = Ticker { last: 100.0 };

    let decision = engine_at(12).analyze(&snapshot);

    assert_eq!(decision.direction, TradeCall::NoTrade);
    assert!(decision.levels.is_none());
    assert_eq!(decision.explain.verdicts.len(), 7);
    assert!(!decision.explain.rejections.is_empty());
    for verdict in &decision.explain.verdicts {
        assert_eq!(verdict.direction, Direction::Neutral);
        assert_eq!(verdict.score, 0.0);
        assert!(!verdict.reason.is_empty());
    }
}

#[test]
fn overnight_session_discount_rejects_the_same_breakout() {
    let mut config = Config::default();
    config.ensemble.sessions = vec![TradingSession {
        name: "asia-overnight".to_string(),
        start_hour: 23,
        end_hour: 4,
        multiplier: 0.3,
    }];

    let daytime = AnalysisEngine::from_config(&config, Arc::new(FixedClock(12)));
    assert_eq!(daytime.analyze(&breakout_snapshot()).direction, TradeCall::Long);

    let overnight = AnalysisEngine::from_config(&config, Arc::new(FixedClock(2)));
    let decision = overnight.analyze(&breakout_snapshot());
    assert_eq!(decision.direction, TradeCall::NoTrade);
    assert_eq!(decision.explain.time_multiplier, 0.3);
    assert_eq!(decision.explain.session.as_deref(), Some("asia-overnight"));
}

#[test]
fn synthetic_breakout_tape_flows_through_the_whole_pipeline() {
    let snapshot = generate_snapshot(&SyntheticConfig {
        bars: 1440,
        breakout: true,
        ..SyntheticConfig::default()
    });

    // snapshot survives a JSON round trip, like one loaded from disk
    let json = serde_json::to_string(&snapshot).unwrap();
    let snapshot: MarketSnapshot = serde_json::from_str(&json).unwrap();

    let decision = engine_at(12).analyze(&snapshot);

    let breakout = decision
        .explain
        .verdicts
        .iter()
        .find(|v| v.detector == "momentum_breakout")
        .unwrap();
    assert_eq!(breakout.direction, Direction::Long);
    assert!(breakout.score > 0.0);

    assert_eq!(decision.direction, TradeCall::Long);
    assert!(decision.levels.is_some());
}

#[test]
fn detector_order_never_changes_the_outcome() {
    // two engines over the same snapshot agree bit-for-bit
    let snapshot = breakout_snapshot();
    let a = engine_at(12).analyze(&snapshot);
    let b = engine_at(12).analyze(&snapshot);

    assert_eq!(a.direction, b.direction);
    assert_eq!(a.confidence, b.confidence);
    assert_eq!(
        serde_json::to_string(&a.explain.agreement).unwrap(),
        serde_json::to_string(&b.explain.agreement).unwrap()
    );
}
