//! Configuration for the simulator.
//!
//! Loaded from environment variables like the worker's. Unlike the worker,
//! the simulator refuses to start without an API key: every turn needs the
//! judge.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use arena_judge::{BackendDefaults, LlmBackendConfig, Pricing};
use rust_decimal::Decimal;

use crate::error::SimError;

/// Environment prefix of the judge backend variables (`OPENAI_API_KEY`, ...).
pub const JUDGE_ENV_PREFIX: &str = "OPENAI";

/// Default arena description given to the judge.
pub const DEFAULT_ARENA_CONTEXT: &str = "A neon-lit cyberpunk rooftop in continuous rain.";

/// Complete simulator configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Judge LLM backend.
    pub judge_backend: LlmBackendConfig,
    /// Per-million-token rates for the cost report.
    pub pricing: Pricing,
    /// Deadline for a single judge call.
    pub judge_timeout: Duration,
    /// Directory with prompt template overrides.
    pub templates_dir: Option<String>,
    /// Match parameters.
    pub settings: SimSettings,
    /// Seed for the action generator; random when unset.
    pub seed: Option<u64>,
}

/// Parameters of one simulated match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimSettings {
    /// Turn limit.
    pub max_turns: u32,
    /// Pause after each turn.
    pub tick_interval: Duration,
    /// Arena description given to the judge.
    pub arena_context: String,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            max_turns: 5,
            tick_interval: Duration::from_secs(2),
            arena_context: DEFAULT_ARENA_CONTEXT.to_owned(),
        }
    }
}

impl SimConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `OPENAI_API_KEY` -- judge API key
    ///
    /// Optional variables:
    /// - `OPENAI_BACKEND`, `OPENAI_API_URL`, `OPENAI_MODEL`,
    ///   `OPENAI_TEMPERATURE`, `OPENAI_MAX_TOKENS` -- judge backend
    ///   (default `gpt-4o-mini` at temperature 0.7)
    /// - `SIM_MAX_TURNS` -- turn limit (default 5)
    /// - `SIM_TICK_INTERVAL_MS` -- pause between turns (default 2000)
    /// - `SIM_ARENA_CONTEXT` -- arena description
    /// - `SIM_JUDGE_TIMEOUT_MS` -- judge call deadline (default 30000)
    /// - `SIM_INPUT_RATE`, `SIM_OUTPUT_RATE` -- USD per million tokens (default 0.15 / 0.60)
    /// - `SIM_SEED` -- generator seed
    /// - `TEMPLATES_DIR` -- prompt template overrides
    pub fn from_env() -> Result<Self, SimError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SimError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let judge_backend =
            LlmBackendConfig::from_lookup(JUDGE_ENV_PREFIX, &BackendDefaults::OPENAI, &lookup)?;
        if !judge_backend.has_api_key() {
            return Err(SimError::MissingApiKey(format!("{JUDGE_ENV_PREFIX}_API_KEY")));
        }

        let defaults = SimSettings::default();
        let max_turns: u32 = parse_or(&lookup, "SIM_MAX_TURNS", defaults.max_turns)?;
        let tick_interval_ms: u64 = parse_or(&lookup, "SIM_TICK_INTERVAL_MS", 2000)?;
        let arena_context = lookup("SIM_ARENA_CONTEXT")
            .filter(|context| !context.trim().is_empty())
            .unwrap_or(defaults.arena_context);
        let judge_timeout_ms: u64 = parse_or(&lookup, "SIM_JUDGE_TIMEOUT_MS", 30_000)?;

        let pricing = Pricing {
            input_rate: parse_or(&lookup, "SIM_INPUT_RATE", Pricing::GPT_4O_MINI.input_rate)?,
            output_rate: parse_or(&lookup, "SIM_OUTPUT_RATE", Pricing::GPT_4O_MINI.output_rate)?,
        };
        if pricing.input_rate < Decimal::ZERO || pricing.output_rate < Decimal::ZERO {
            return Err(SimError::Config("token rates must not be negative".to_owned()));
        }

        let seed = lookup("SIM_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| SimError::Config(format!("invalid SIM_SEED: {e}")))
            })
            .transpose()?;

        Ok(Self {
            judge_backend,
            pricing,
            judge_timeout: Duration::from_millis(judge_timeout_ms),
            templates_dir: lookup("TEMPLATES_DIR").filter(|dir| !dir.trim().is_empty()),
            settings: SimSettings {
                max_turns,
                tick_interval: Duration::from_millis(tick_interval_ms),
                arena_context,
            },
            seed,
        })
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, SimError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| SimError::Config(format!("invalid {name}: {e}")))
    })
}
