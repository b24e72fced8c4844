//! Ports Layer - trait seams to the outside world
//!
//! The engine itself is synchronous and pure; these traits are where
//! the wider system plugs in:
//! - Snapshot acquisition (`SnapshotProvider`)
//! - Local time for the session schedule (`Clock`)

pub mod clock;
pub mod market_data;
pub mod mocks;

pub use clock::{Clock, FixedClock, SystemClock};
pub use market_data::{SnapshotError, SnapshotProvider};
pub use mocks::MockSnapshots;
