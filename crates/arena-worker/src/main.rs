//! Tick worker entry point.
//!
//! Loads configuration, wires the backend client and the judge together,
//! and ticks until Ctrl-C.

use arena_judge::{Judge, PromptEngine, create_backend};
use arena_worker::config::JUDGE_ENV_PREFIX;
use arena_worker::{BackendClient, TickWorker, WorkerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, templates, or the HTTP client cannot
/// be set up.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("arena-worker starting");

    let config = WorkerConfig::from_env()?;
    info!(
        backend_url = config.backend_url,
        tick_interval_ms = config.tick_interval.as_millis(),
        judge_timeout_ms = config.judge_timeout.as_millis(),
        auto_play = config.auto_play,
        "configuration loaded"
    );

    if !config.judge_backend.has_api_key() {
        warn!(
            variable = format!("{JUDGE_ENV_PREFIX}_API_KEY"),
            "judge API key not set, LLM calls will fail"
        );
    }

    let prompts = PromptEngine::load(config.templates_dir.as_deref())?;
    let backend = create_backend(&config.judge_backend);
    info!(
        backend = backend.name(),
        model = backend.model(),
        "judge backend configured"
    );

    let judge = Judge::new(
        backend,
        prompts,
        config.judge_pricing,
        config.judge_timeout,
    );
    let client = BackendClient::new(&config.backend_url, config.backend_timeout)?;
    let worker = TickWorker::new(client, judge, config.tick_interval, config.auto_play);

    worker
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!(costs = %worker.judge().cost_summary(), "arena-worker stopped");
    Ok(())
}
