//! Evaluation entry point for the Orchard Co-op environment.
//!
//! Loads the driver configuration from the environment, evaluates the
//! selected stock policy over several episodes, and prints the summary as
//! JSON on stdout.

use anyhow::Context;
use orchard_runner::{RunnerConfig, evaluate};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration fails to load or any episode fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("orchard-runner starting");

    let config = RunnerConfig::from_env().context("loading runner configuration")?;
    let engine = config
        .load_engine_config()
        .context("loading engine configuration")?;
    info!(
        config_path = ?config.engine_config,
        episodes = config.episodes,
        policy = config.policy.name(),
        concurrency = config.concurrency,
        grid_size = engine.world.grid_size,
        agents = engine.world.agents,
        "configuration loaded"
    );

    let summary = evaluate(&engine, config.policy, config.episodes, config.concurrency)
        .await
        .context("evaluating policy")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
