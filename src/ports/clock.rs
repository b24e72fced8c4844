//! Time source port
//!
//! The aggregator only ever needs the local hour of day for the session
//! schedule. Keeping it behind a trait makes decisions reproducible in
//! tests and from the CLI's `--hour` override.

use chrono::Timelike;

pub trait Clock: Send + Sync {
    /// Local hour of day, 0-23
    fn local_hour(&self) -> u32;
}

/// Wall-clock hours from the host timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Pinned hour for tests and deterministic replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0 % 24
    }
}
