//! Simulator entry point.
//!
//! Runs one match between the default combatants and logs the report.

use arena_judge::{Judge, PromptEngine, create_backend};
use arena_sim::{SimConfig, Simulator, default_pair};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the API key is missing or the judge cannot be set up.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = SimConfig::from_env()
        .inspect_err(|e| error!(error = %e, "cannot start simulation"))?;
    let (agent_a, agent_b) = default_pair();
    info!(
        agent_a = agent_a.name,
        agent_b = agent_b.name,
        model = config.judge_backend.model,
        turns = config.settings.max_turns,
        "starting simulation"
    );

    let prompts = PromptEngine::load(config.templates_dir.as_deref())?;
    let judge = Judge::new(
        create_backend(&config.judge_backend),
        prompts,
        config.pricing,
        config.judge_timeout,
    );

    let mut rng = config
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    let simulator = Simulator::new(judge, config.settings);
    let report = simulator.run(agent_a, agent_b, &mut rng).await;

    info!("\n{report}");
    info!(costs = %simulator.judge().cost_summary(), "simulation finished");
    Ok(())
}
