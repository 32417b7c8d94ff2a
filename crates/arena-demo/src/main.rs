//! Demo agent for Agent Arena's strategy mode.
//!
//! Registers two agents, starts a battle between them, submits a template
//! strategy for each, and logs the outcome. Point it at a running backend
//! with `ARENA_URL` (default `http://localhost:8000`).

mod client;
mod strategy;

use anyhow::Result;
use arena_types::StrategyReceipt;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::client::ArenaClient;
use crate::strategy::{generate_strategy, preview};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let base_url =
        std::env::var("ARENA_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned());
    info!(base_url, "arena-demo starting (strategy mode)");

    let client = ArenaClient::new(&base_url);
    let mut rng = rand::rng();

    let name_a = format!("DemoBot_A_{}", rng.random_range(1000..=9999));
    let name_b = format!("DemoBot_B_{}", rng.random_range(1000..=9999));
    let agent_a = client
        .register(&name_a, "Aggressive hacker bot", "Aggressive hacker")
        .await?;
    let agent_b = client
        .register(&name_b, "Defensive mage bot", "Defensive mage")
        .await?;
    info!(name = name_a, agent_id = agent_a.agent_id.short(), "agent A registered");
    info!(name = name_b, agent_id = agent_b.agent_id.short(), "agent B registered");

    let battle = client
        .start_battle(&agent_a.agent_id, &agent_b.agent_id)
        .await?;
    let arena = &battle.arena;
    info!(
        battle_id = battle.battle_id.short(),
        arena = arena.name.as_deref().unwrap_or("Unknown"),
        description = preview(arena.description.as_deref().unwrap_or_default(), 80),
        hazards = arena.hazards.join(", "),
        "battle started"
    );

    let items_a = client.get_inventory(&agent_a.agent_id).await?.deck_words;
    let items_b = client.get_inventory(&agent_b.agent_id).await?.deck_words;

    let strategy_a = generate_strategy(&items_a, arena, &mut rng);
    let strategy_b = generate_strategy(&items_b, arena, &mut rng);
    info!(strategy = preview(&strategy_a, 150), "agent A strategy");
    info!(strategy = preview(&strategy_b, 150), "agent B strategy");

    let receipt_a = client
        .submit_strategy(&battle.battle_id, &agent_a.agent_id, &strategy_a)
        .await?;
    info!(status = receipt_a.status, "agent A strategy submitted");

    let receipt_b = client
        .submit_strategy(&battle.battle_id, &agent_b.agent_id, &strategy_b)
        .await?;
    info!(status = receipt_b.status, "agent B strategy submitted");

    report(&receipt_b);
    info!("demo complete");
    Ok(())
}

/// Log the battle outcome carried by the final receipt.
fn report(receipt: &StrategyReceipt) {
    let Some(result) = receipt.result.as_ref().filter(|_| receipt.is_completed()) else {
        info!(status = receipt.status, "battle not completed yet");
        return;
    };

    let hp = |value: Option<u32>| value.map_or_else(|| "?".to_owned(), |v| v.to_string());
    info!(
        winner = result.winner.as_deref().unwrap_or("Unknown"),
        final_hp_a = hp(result.final_hp_a),
        final_hp_b = hp(result.final_hp_b),
        total_rounds = hp(result.total_rounds),
        "battle result"
    );
    info!(
        summary = result.summary.as_deref().unwrap_or("No summary"),
        "battle summary"
    );

    for round in result.narrative.iter().take(3) {
        info!(
            round = hp(round.round),
            action_a = preview(round.action_a.as_deref().unwrap_or("Unknown"), 60),
            action_b = preview(round.action_b.as_deref().unwrap_or("Unknown"), 60),
            result = preview(round.result.as_deref().unwrap_or("Unknown"), 80),
            "round"
        );
    }
    if let Some(more) = result.narrative.len().checked_sub(3).filter(|n| *n > 0) {
        info!(more, "more rounds not shown");
    }

    for highlight in result.highlights.iter().take(2) {
        info!(highlight, "highlight");
    }
}
