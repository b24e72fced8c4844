//! Rolling statistics primitives
//!
//! Z-score, Pearson correlation and percentile over bounded windows.
//! Every function defines an explicit fallback for degenerate input
//! (empty windows, zero variance) instead of returning NaN or infinity.

use statrs::statistics::{Data, OrderStatistics};

/// Variance below this is treated as a constant series
const VARIANCE_FLOOR: f64 = 1e-10;

/// Arithmetic mean; 0 for an empty series
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Population standard deviation around a precomputed mean
pub fn std_dev(series: &[f64], mean: f64) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let variance = series
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / series.len() as f64;
    variance.sqrt()
}

/// Standardized deviation of `value` from the series mean.
///
/// A constant series carries no signal: returns 0 rather than dividing
/// by a zero standard deviation.
pub fn z_score(value: f64, series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let m = mean(series);
    let sd = std_dev(series, m);
    if sd < VARIANCE_FLOOR {
        return 0.0;
    }
    let z = (value - m) / sd;
    if z.is_finite() { z } else { 0.0 }
}

/// Pearson correlation coefficient.
///
/// Requires equal-length series of at least 2 points; anything else,
/// including a zero-variance side, yields 0.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a < VARIANCE_FLOOR || var_b < VARIANCE_FLOOR {
        return 0.0;
    }
    let r = cov / (var_a.sqrt() * var_b.sqrt());
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Empirical percentile (0-100) of a series; 0 for an empty series
pub fn percentile(series: &[f64], p: usize) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let mut data = Data::new(series.to_vec());
    data.percentile(p.min(100))
}
