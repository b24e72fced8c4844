//! Bollinger Bands

use super::stats;

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STD_DEV: f64 = 2.0;

/// Upper/middle/lower band over the last window of closes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Band width relative to the middle band; 0 when the middle is
    /// degenerate
    pub fn width(&self) -> f64 {
        if self.middle.abs() < f64::EPSILON {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle
    }
}

/// Bands over the trailing `period` closes with `std_mult` standard
/// deviations; `None` with insufficient data.
pub fn bollinger(closes: &[f64], period: usize, std_mult: f64) -> Option<BollingerBands> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = stats::mean(window);
    let sd = stats::std_dev(window, middle);

    Some(BollingerBands {
        upper: middle + std_mult * sd,
        middle,
        lower: middle - std_mult * sd,
    })
}
