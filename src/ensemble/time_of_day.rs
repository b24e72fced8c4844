//! Time-of-day multiplier schedule
//!
//! Named hour ranges scale the meta-score by session: quiet overnight
//! hours can be discounted, prime liquidity hours left at par. Ranges
//! may wrap midnight ("23-04").

use serde::{Deserialize, Serialize};

/// One named hour range with its score multiplier. Hours are inclusive
/// on both ends; `start_hour > end_hour` wraps midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSession {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub multiplier: f64,
}

impl TradingSession {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour <= self.end_hour
        } else {
            // wraparound range, e.g. 23-04
            hour >= self.start_hour || hour <= self.end_hour
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(format!(
                "session '{}' has an hour outside 0-23 ({}-{})",
                self.name, self.start_hour, self.end_hour
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(format!(
                "session '{}' multiplier must be > 0, got {}",
                self.name, self.multiplier
            ));
        }
        Ok(())
    }
}

/// Ordered session list; the first matching range wins, everything else
/// runs at 1.0
#[derive(Debug, Clone, Default)]
pub struct SessionSchedule {
    sessions: Vec<TradingSession>,
}

impl SessionSchedule {
    pub fn new(sessions: Vec<TradingSession>) -> Self {
        Self { sessions }
    }

    /// Multiplier and matched session name for the given local hour
    pub fn multiplier_for(&self, hour: u32) -> (f64, Option<&str>) {
        self.sessions
            .iter()
            .find(|s| s.contains(hour % 24))
            .map(|s| (s.multiplier, Some(s.name.as_str())))
            .unwrap_or((1.0, None))
    }

    pub fn validate(&self) -> Result<(), String> {
        for session in &self.sessions {
            session.validate()?;
        }
        Ok(())
    }
}
