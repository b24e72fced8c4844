//! Adapters Layer - implementations of the port traits
//!
//! - CLI: command-line surface of the engine binary
//! - Snapshot file: JSON-file implementation of `SnapshotProvider`
//! - Synthetic: seeded snapshot generation for offline smoke tests

pub mod cli;
pub mod snapshot_file;
pub mod synthetic;

pub use cli::CliApp;
pub use snapshot_file::FileSnapshotSource;
pub use synthetic::{generate_snapshot, SyntheticConfig};
