//! CLI Adapter
//!
//! Command definitions live here; the handlers stay in `main.rs`.

pub mod commands;

pub use commands::{
    AnalyzeCmd, CheckConfigCmd, CliApp, Command, GenSnapshotCmd, VerdictsCmd,
};
