//! Headless battle client.
//!
//! Composition root that assembles:
//! 1. Content (templates and scenario) via `ContentFactory`
//! 2. Runtime (simulation worker, event bus, hooks) via `RuntimeBuilder`
//! 3. A seeded random charge planner standing in for player input
//!
//! ```bash
//! BATTLE_CYCLES=5 BATTLE_SEED=7 RUST_LOG=debug cargo run -p battle-client
//! ```
mod config;
mod logging;
mod planner;

use anyhow::{Context, Result};
use battle_content::ContentFactory;
use battle_core::SimEvent;
use runtime::{Runtime, RuntimeConfig, Topic};

use crate::config::ClientConfig;
use crate::planner::RandomPlanner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!(
        content_dir = %config.content_dir.display(),
        cycles = config.cycles,
        tick_ms = config.tick.as_millis() as u64,
        "Starting battle client"
    );

    let factory = ContentFactory::new(&config.content_dir);
    let mut sim_config = factory.load_config().context("loading config.toml")?;
    if let Some(seed) = config.seed {
        sim_config.seed = seed;
    }
    let sim = factory
        .build(sim_config.clone())
        .with_context(|| format!("loading content from {}", config.content_dir.display()))?;

    let planner = RandomPlanner::new(sim_config.seed, 0.2, sim_config.charge_max);
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            sim: sim_config,
            ..RuntimeConfig::default()
        })
        .simulation(sim)
        .planner(planner)
        .build()
        .await?;

    let handle = runtime.handle();
    let combat_log = tokio::spawn(log_combat(handle.subscribe(Topic::Combat)));

    for _ in 0..config.cycles {
        let report = runtime
            .play_cycle(config.dt(), ClientConfig::MAX_TICKS_PER_CYCLE)
            .await?;
        println!(
            "cycle {:>3}  ticks {:>5}  base {:>4}  score {:>6}  enemies {:>3}",
            report.cycle, report.ticks, report.base_hp, report.score, report.enemies_left
        );

        if report.base_hp <= 0 {
            tracing::warn!(cycle = report.cycle, "base destroyed");
            break;
        }
        if report.enemies_left == 0 {
            tracing::info!(cycle = report.cycle, "all enemies destroyed");
            break;
        }
    }

    let snapshot = handle.query_snapshot().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    drop(handle);
    runtime.shutdown().await?;
    combat_log.await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

/// Logs notable combat events until the runtime shuts down.
async fn log_combat(mut rx: tokio::sync::broadcast::Receiver<runtime::Event>) {
    use tokio::sync::broadcast::error::RecvError;

    loop {
        match rx.recv().await {
            Ok(event) => match event.payload {
                SimEvent::EnemySpawned {
                    id,
                    parent: Some(parent),
                    template,
                } => tracing::info!(%id, %parent, %template, "enemy spawned a child"),
                SimEvent::EnemyDestroyed { id } => tracing::info!(%id, "enemy destroyed"),
                SimEvent::BaseDamaged { amount, remaining } => {
                    tracing::info!(amount, remaining, "base damaged")
                }
                _ => {}
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "combat log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
