//! Position sizing
//!
//! Converts the risk account (balance, risk percent) and a set of trade
//! levels into a trade size and the capital at risk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PositionSizing, TradeLevels};

#[derive(Debug, Clone, Error)]
pub enum RiskAccountError {
    #[error("Invalid balance: {0} (must be > 0)")]
    InvalidBalance(f64),
    #[error("Invalid risk percent: {0} (must be 0 < pct <= 100)")]
    InvalidRiskPercent(f64),
}

/// Account-level risk configuration, immutable for the life of the engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAccount {
    /// Account balance in quote currency
    pub balance: f64,
    /// Percent of balance risked per trade
    pub risk_percent: f64,
}

impl Default for RiskAccount {
    fn default() -> Self {
        Self { balance: 10_000.0, risk_percent: 1.0 }
    }
}

impl RiskAccount {
    pub fn validate(&self) -> Result<(), RiskAccountError> {
        if !self.balance.is_finite() || self.balance <= 0.0 {
            return Err(RiskAccountError::InvalidBalance(self.balance));
        }
        if !self.risk_percent.is_finite()
            || self.risk_percent <= 0.0
            || self.risk_percent > 100.0
        {
            return Err(RiskAccountError::InvalidRiskPercent(self.risk_percent));
        }
        Ok(())
    }

    /// Size a trade against its levels
    pub fn size_for(&self, levels: &TradeLevels) -> PositionSizing {
        position_size(self.balance, self.risk_percent, levels.entry, levels.stop_loss)
    }
}

/// `size = (balance * risk_pct / 100) / |entry - stop_loss|`.
///
/// A zero stop distance cannot be sized: returns `{size: 0, max_loss: 0}`
/// rather than dividing by zero. Non-positive balance or risk percent is
/// treated the same way.
pub fn position_size(balance: f64, risk_pct: f64, entry: f64, stop_loss: f64) -> PositionSizing {
    let distance = (entry - stop_loss).abs();
    if balance <= 0.0 || risk_pct <= 0.0 || distance < f64::EPSILON || !distance.is_finite() {
        return PositionSizing { size: 0.0, max_loss: 0.0 };
    }

    let risk_capital = balance * risk_pct / 100.0;
    PositionSizing { size: risk_capital / distance, max_loss: risk_capital }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_stop_distance_sizes_to_zero() {
        let sizing = position_size(1000.0, 2.0, 100.0, 100.0);
        assert_eq!(sizing, PositionSizing { size: 0.0, max_loss: 0.0 });
    }

    #[test]
    fn test_basic_sizing() {
        // risk 2% of 1000 = 20, stop 2 away -> 10 units
        let sizing = position_size(1000.0, 2.0, 100.0, 98.0);
        assert_relative_eq!(sizing.size, 10.0, epsilon = 1e-9);
        assert_relative_eq!(sizing.max_loss, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_sizing_uses_absolute_distance() {
        let long = position_size(5000.0, 1.0, 100.0, 98.0);
        let short = position_size(5000.0, 1.0, 100.0, 102.0);
        assert_relative_eq!(long.size, short.size, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_account_sizes_to_zero() {
        assert_eq!(position_size(0.0, 2.0, 100.0, 98.0).size, 0.0);
        assert_eq!(position_size(1000.0, 0.0, 100.0, 98.0).size, 0.0);
    }

    #[test]
    fn test_account_validation() {
        assert!(RiskAccount::default().validate().is_ok());

        let bad = RiskAccount { balance: -1.0, risk_percent: 1.0 };
        assert!(matches!(bad.validate(), Err(RiskAccountError::InvalidBalance(_))));

        let bad = RiskAccount { balance: 1000.0, risk_percent: 101.0 };
        assert!(matches!(bad.validate(), Err(RiskAccountError::InvalidRiskPercent(_))));
    }

    #[test]
    fn test_account_sizes_levels() {
        let account = RiskAccount { balance: 10_000.0, risk_percent: 2.0 };
        let levels = TradeLevels { entry: 50.0, stop_loss: 49.0, take_profit: 51.5, risk_reward: 1.5 };
        let sizing = account.size_for(&levels);
        assert_relative_eq!(sizing.max_loss, 200.0, epsilon = 1e-9);
        assert_relative_eq!(sizing.size, 200.0, epsilon = 1e-9);
    }
}
