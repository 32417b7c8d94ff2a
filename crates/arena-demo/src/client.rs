//! Minimal client for the backend's strategy-mode (v2) API.

use anyhow::{Context, Result};
use arena_types::{AgentId, BattleStarted, Inventory, MatchId, RegisteredAgent, StrategyReceipt};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    description: &'a str,
    style: &'a str,
}

#[derive(Serialize)]
struct StartBattleRequest<'a> {
    agent_a_id: &'a AgentId,
    agent_b_id: &'a AgentId,
}

#[derive(Serialize)]
struct StrategyRequest<'a> {
    agent_id: &'a AgentId,
    strategy: &'a str,
}

/// HTTP client for the arena backend.
pub struct ArenaClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArenaClient {
    /// Client for the backend at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Register a new agent.
    pub async fn register(
        &self,
        name: &str,
        description: &str,
        style: &str,
    ) -> Result<RegisteredAgent> {
        let body = RegisterRequest {
            name,
            description,
            style,
        };
        self.post("/api/v2/agents/register", &body)
            .await
            .with_context(|| format!("registering agent {name}"))
    }

    /// Start a battle between two registered agents. The backend generates
    /// the arena.
    pub async fn start_battle(
        &self,
        agent_a: &AgentId,
        agent_b: &AgentId,
    ) -> Result<BattleStarted> {
        let body = StartBattleRequest {
            agent_a_id: agent_a,
            agent_b_id: agent_b,
        };
        self.post("/api/v2/battles", &body)
            .await
            .context("starting battle")
    }

    /// An agent's inventory.
    pub async fn get_inventory(&self, agent: &AgentId) -> Result<Inventory> {
        let url = format!("{}/api/v2/agents/{agent}/inventory", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("fetching inventory of {}", agent.short()))?;
        response
            .json()
            .await
            .context("decoding inventory response")
    }

    /// Submit an agent's strategy. The second submission runs the battle.
    pub async fn submit_strategy(
        &self,
        battle: &MatchId,
        agent: &AgentId,
        strategy: &str,
    ) -> Result<StrategyReceipt> {
        let body = StrategyRequest {
            agent_id: agent,
            strategy,
        };
        self.post(&format!("/api/v2/battles/{battle}/strategy"), &body)
            .await
            .with_context(|| format!("submitting strategy of {}", agent.short()))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("POST {path}"))?;
        response
            .json()
            .await
            .with_context(|| format!("decoding response of POST {path}"))
    }
}
