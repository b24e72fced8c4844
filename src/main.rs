//! Quorum - Ensemble Technical-Analysis Decision Engine
//!
//! Runs seven technical-analysis detectors over a market snapshot and
//! blends their verdicts into one confluence-weighted trade decision.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use quorum::adapters::cli::{
    AnalyzeCmd, CheckConfigCmd, CliApp, Command, GenSnapshotCmd, VerdictsCmd,
};
use quorum::adapters::{generate_snapshot, FileSnapshotSource, SyntheticConfig};
use quorum::application::AnalysisEngine;
use quorum::config::load_config;
use quorum::domain::Recommendation;
use quorum::ports::{Clock, FixedClock, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Analyze(cmd) => analyze_command(cmd).await,
        Command::Verdicts(cmd) => verdicts_command(cmd).await,
        Command::CheckConfig(cmd) => check_config_command(cmd),
        Command::GenSnapshot(cmd) => gen_snapshot_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).init();
}

fn expand(path: &Path) -> String {
    shellexpand::tilde(&path.to_string_lossy().into_owned()).into_owned()
}

fn clock_for(hour: Option<u32>) -> Arc<dyn Clock> {
    match hour {
        Some(h) => Arc::new(FixedClock(h)),
        None => Arc::new(SystemClock),
    }
}

async fn analyze_command(cmd: AnalyzeCmd) -> Result<()> {
    if let Some(hour) = cmd.hour {
        if hour > 23 {
            bail!("--hour must be 0-23, got {hour}");
        }
    }

    let mut config =
        load_config(expand(&cmd.config)).context("Failed to load configuration")?;
    if let Some(balance) = cmd.balance {
        config.risk.balance = balance;
    }
    if let Some(risk_percent) = cmd.risk_percent {
        config.risk.risk_percent = risk_percent;
    }
    config.risk.validate().context("Invalid risk overrides")?;

    let snapshot = FileSnapshotSource::new(expand(&cmd.snapshot))
        .load()
        .await
        .context("Failed to load snapshot")?;
    tracing::info!(symbol = %snapshot.symbol, "analyzing snapshot");

    let engine = AnalysisEngine::from_config(&config, clock_for(cmd.hour));
    let recommendation = engine.recommend(&snapshot);

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&recommendation)?),
        "text" => print_recommendation(&recommendation),
        other => bail!("unknown output format '{other}' (expected text or json)"),
    }
    Ok(())
}

async fn verdicts_command(cmd: VerdictsCmd) -> Result<()> {
    let config = load_config(expand(&cmd.config)).context("Failed to load configuration")?;
    let snapshot = FileSnapshotSource::new(expand(&cmd.snapshot))
        .load()
        .await
        .context("Failed to load snapshot")?;

    let engine = AnalysisEngine::from_config(&config, Arc::new(SystemClock));
    let verdicts = engine.run_detectors(&snapshot);

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&verdicts)?),
        "text" => {
            println!("Verdicts for {}:", snapshot.symbol);
            for v in &verdicts {
                println!(
                    "  {:<20} {:<8} {:>6.1}  (w {:.1})  {}",
                    v.detector, v.direction.to_string(), v.score, v.weight, v.reason
                );
            }
        }
        other => bail!("unknown output format '{other}' (expected text or json)"),
    }
    Ok(())
}

fn check_config_command(cmd: CheckConfigCmd) -> Result<()> {
    let config = load_config(expand(&cmd.config)).context("Configuration is invalid")?;
    println!("Configuration OK");
    println!("  min_confidence:         {}", config.ensemble.min_confidence);
    println!("  min_detector_agreement: {}", config.ensemble.min_detector_agreement);
    println!("  material_score_floor:   {}", config.ensemble.material_score_floor);
    println!("  weighted detectors:     {}", config.ensemble.weights.len());
    println!("  sessions:               {}", config.ensemble.sessions.len());
    println!(
        "  risk:                   {:.2} balance, {:.2}% per trade",
        config.risk.balance, config.risk.risk_percent
    );
    Ok(())
}

async fn gen_snapshot_command(cmd: GenSnapshotCmd) -> Result<()> {
    if cmd.bars < 30 {
        bail!("--bars must be at least 30, got {}", cmd.bars);
    }
    if !(cmd.start_price > 0.0) {
        bail!("--start-price must be > 0");
    }

    let snapshot = generate_snapshot(&SyntheticConfig {
        symbol: cmd.symbol,
        bars: cmd.bars,
        seed: cmd.seed,
        start_price: cmd.start_price,
        breakout: cmd.breakout,
    });

    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(&cmd.output, json)
        .await
        .with_context(|| format!("Failed to write {}", cmd.output.display()))?;

    tracing::info!(
        path = %cmd.output.display(),
        symbol = %snapshot.symbol,
        bars = cmd.bars,
        "snapshot written"
    );
    println!("Wrote {} ({} 1m bars)", cmd.output.display(), cmd.bars);
    Ok(())
}

fn print_recommendation(recommendation: &Recommendation) {
    let decision = &recommendation.decision;
    println!("Symbol:     {}", decision.symbol);
    println!("Decision:   {} (confidence {})", decision.direction, decision.confidence);
    println!("Reason:     {}", decision.reason);

    if let Some(levels) = &decision.levels {
        println!("Entry:      {:.4}", levels.entry);
        println!("Stop loss:  {:.4}", levels.stop_loss);
        println!("Target:     {:.4}", levels.take_profit);
        println!("R/R:        {:.2}", levels.risk_reward);
    }
    if let Some(sizing) = &recommendation.sizing {
        println!("Size:       {:.6} (max loss {:.2})", sizing.size, sizing.max_loss);
    }

    let explain = &decision.explain;
    if let Some(session) = &explain.session {
        println!("Session:    {} (x{:.2})", session, explain.time_multiplier);
    }
    println!(
        "Agreement:  {} long / {} short / {} quiet (ratio {:.2})",
        explain.agreement.long_count,
        explain.agreement.short_count,
        explain.agreement.neutral_count,
        explain.agreement.agreement_ratio
    );
    println!("Detectors:");
    for v in &explain.verdicts {
        println!(
            "  {:<20} {:<8} {:>6.1}  {}",
            v.detector,
            v.direction.to_string(),
            v.score,
            v.reason
        );
    }
}
